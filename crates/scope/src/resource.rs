//! Object-style resources with paired open/close operations.

use async_trait::async_trait;

/// A collaborator with an explicit connect/disconnect lifecycle
///
/// Database pools, caches, and broker clients fit this shape. Use
/// [`ResourceSpec::from_resource`](crate::ResourceSpec::from_resource) to put
/// one into a group; the opened resource itself becomes the handle.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Error: std::error::Error + Send + 'static;

    /// Establish the resource. Called at most once per group.
    async fn open(&mut self) -> Result<(), Self::Error>;

    /// Release the resource. Called exactly once after a successful `open`.
    async fn close(&mut self) -> Result<(), Self::Error>;

    /// Whether the resource is currently usable
    fn is_open(&self) -> bool;
}
