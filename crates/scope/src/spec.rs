//! Declarations of the resources a group acquires.

use crate::resource::Resource;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;

pub(crate) type Opener<H, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<H, E>> + Send>;
pub(crate) type Closer<H, E> = Box<dyn FnOnce(H) -> BoxFuture<'static, Result<(), E>> + Send>;

/// A named opener/closer pair
///
/// The opener produces a handle or fails. The closer consumes the handle it
/// was given; a group calls it exactly once for every handle the opener
/// produced, and never for an opener that failed.
pub struct ResourceSpec<H, E> {
    pub(crate) name: String,
    pub(crate) opener: Opener<H, E>,
    pub(crate) closer: Closer<H, E>,
}

impl<H, E> ResourceSpec<H, E>
where
    H: Send + 'static,
    E: Send + 'static,
{
    pub fn new<O, OFut, C, CFut>(name: impl Into<String>, opener: O, closer: C) -> Self
    where
        O: FnOnce() -> OFut + Send + 'static,
        OFut: Future<Output = Result<H, E>> + Send + 'static,
        C: FnOnce(H) -> CFut + Send + 'static,
        CFut: Future<Output = Result<(), E>> + Send + 'static,
    {
        Self {
            name: name.into(),
            opener: Box::new(move || opener().boxed()),
            closer: Box::new(move |handle| closer(handle).boxed()),
        }
    }

    /// Name the handle will be exposed under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R> ResourceSpec<R, R::Error>
where
    R: Resource,
{
    /// Adapt a [`Resource`] into a spec whose handle is the opened resource
    pub fn from_resource(name: impl Into<String>, resource: R) -> Self {
        Self::new(
            name,
            move || async move {
                let mut resource = resource;
                resource.open().await?;
                Ok(resource)
            },
            |mut resource: R| async move { resource.close().await },
        )
    }
}

impl<H, E> fmt::Debug for ResourceSpec<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSpec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
