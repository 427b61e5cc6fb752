//! Drop-time cleanup for async resources
//!
//! `Drop` cannot await, so a guard that still holds its cleanup future when it
//! is dropped hands that future to the current tokio runtime. Outside of a
//! runtime the future is driven to completion on a private current-thread
//! runtime before `drop` returns.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::runtime::Handle;

use crate::async_runtime::AsyncRuntime;

/// RAII guard owning an async cleanup future
///
/// Awaiting the guard drives the cleanup in place and yields its output. If
/// the guard is dropped first, even after it was polled part way, whatever is
/// left of the cleanup finishes in the background via [`spawn_cleanup`] and
/// the output is discarded.
pub struct AsyncCleanup<T = ()>
where
    T: Send + 'static,
{
    description: String,
    cleanup: Option<BoxFuture<'static, T>>,
}

impl<T> AsyncCleanup<T>
where
    T: Send + 'static,
{
    pub fn new<F>(description: impl Into<String>, cleanup: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            description: description.into(),
            cleanup: Some(cleanup.boxed()),
        }
    }
}

impl<T> Future for AsyncCleanup<T>
where
    T: Send + 'static,
{
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let Some(cleanup) = self.cleanup.as_mut() else {
            panic!("AsyncCleanup polled after completion");
        };
        let output = ready!(cleanup.as_mut().poll(cx));
        self.cleanup = None;
        Poll::Ready(output)
    }
}

impl<T> Drop for AsyncCleanup<T>
where
    T: Send + 'static,
{
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            spawn_cleanup(&self.description, cleanup.map(drop));
        }
    }
}

/// Run a cleanup future without awaiting it
///
/// Inside a tokio runtime the future is spawned as a background task. Outside
/// of one it is driven to completion on a fresh current-thread runtime.
pub fn spawn_cleanup<F>(description: &str, cleanup: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        ::tracing::debug!(cleanup = %description, "spawning deferred cleanup");
        handle.spawn(cleanup);
        return;
    }

    ::tracing::debug!(cleanup = %description, "running deferred cleanup on private runtime");
    let mut runtime = AsyncRuntime::new();
    match runtime.block_on(cleanup) {
        Ok(()) => {}
        Err(e) => {
            ::tracing::error!(
                cleanup = %description,
                error = %e,
                "failed to build runtime for deferred cleanup, resources may leak"
            );
        }
    }
}
