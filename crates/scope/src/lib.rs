//! Scoped acquisition of several resources with guaranteed release.
//!
//! A unit of work often needs a handful of independent resources (a database
//! connection, a cache client, a broker channel) that must all be closed
//! afterwards, whatever happens in between. This crate runs such a unit of
//! work inside a [`ScopedResourceGroup`]:
//!
//! 1. openers run in declaration order (or all at once, see
//!    [`AcquireStrategy`]), stopping at the first failure;
//! 2. the body receives a read-only name→handle [`Resources`] view;
//! 3. every handle that was opened is closed exactly once, most recent first,
//!    even if a later opener failed, the body failed or panicked, the run was
//!    cancelled, or another closer failed.
//!
//! ## Result precedence
//!
//! An acquisition failure wins over everything, then a body failure. Teardown
//! failures are only returned (aggregated, as [`ScopeError::Teardown`]) when
//! both of those succeeded; otherwise they are logged and the primary failure
//! is returned unchanged. Nothing is retried. A closer that panics does not
//! stop the others; its panic resumes once every closer has settled.
//!
//! ## Key Components
//!
//! - **`group`**: [`ScopedResourceGroup`], the builder and engine.
//! - **`spec`**: [`ResourceSpec`], a named opener/closer pair.
//! - **`resource`**: the [`Resource`] trait for objects with their own
//!   open/close lifecycle.
//! - **`error`**: [`ScopeError`] and [`TeardownFailures`].

pub mod error;
pub mod group;
pub mod resource;
pub mod resources;
pub mod spec;
pub mod strategy;
mod undo;

pub use error::{ScopeError, TeardownFailures};
pub use group::ScopedResourceGroup;
pub use resource::Resource;
pub use resources::Resources;
pub use spec::ResourceSpec;
pub use strategy::{AcquireStrategy, ReleaseStrategy};

use futures::future::BoxFuture;

/// Run `body` with every resource in `specs`, opened one by one and closed in
/// reverse order
pub async fn run_scoped<H, E, T, F>(
    specs: impl IntoIterator<Item = ResourceSpec<H, E>>,
    body: F,
) -> Result<T, ScopeError<E>>
where
    H: Send + Sync + 'static,
    E: std::error::Error + Send + 'static,
    F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>>,
{
    ScopedResourceGroup::from_specs(specs).run(body).await
}

/// Like [`run_scoped`], but independent resources are opened and closed
/// concurrently
pub async fn run_scoped_concurrent<H, E, T, F>(
    specs: impl IntoIterator<Item = ResourceSpec<H, E>>,
    body: F,
) -> Result<T, ScopeError<E>>
where
    H: Send + Sync + 'static,
    E: std::error::Error + Send + 'static,
    F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>>,
{
    ScopedResourceGroup::from_specs(specs)
        .acquire(AcquireStrategy::Concurrent)
        .release(ReleaseStrategy::Concurrent)
        .run(body)
        .await
}
