//! The scoped resource group: acquire all, run the body, release all.

use crate::error::{ScopeError, TeardownFailures};
use crate::resources::Resources;
use crate::spec::{Opener, ResourceSpec};
use crate::strategy::{AcquireStrategy, ReleaseStrategy};
use crate::undo::{Failures, UndoList};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use indexmap::IndexMap;
use rescope_core::ResourceName;
use rescope_utils::tracing as log;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// A set of resources acquired for exactly one unit of work
///
/// Built from [`ResourceSpec`]s, then consumed by [`run`](Self::run) or
/// [`spawn`](Self::spawn). Every handle an opener produced is closed exactly
/// once, on success, on failure, on panic, and on cancellation.
///
/// ```rust,no_run
/// use futures::FutureExt;
/// use rescope_core::Error;
/// use rescope_scope::{ResourceSpec, ScopedResourceGroup};
///
/// # async fn example() -> Result<(), rescope_scope::ScopeError<Error>> {
/// let total = ScopedResourceGroup::new()
///     .resource(ResourceSpec::new(
///         "db",
///         || async { Ok::<_, Error>(40) },
///         |_| async { Ok(()) },
///     ))
///     .resource(ResourceSpec::new(
///         "cache",
///         || async { Ok(2) },
///         |_| async { Ok(()) },
///     ))
///     .run(|res| async move { Ok(res["db"] + res["cache"]) }.boxed())
///     .await?;
/// assert_eq!(total, 42);
/// # Ok(())
/// # }
/// ```
pub struct ScopedResourceGroup<H, E> {
    specs: Vec<ResourceSpec<H, E>>,
    acquire: AcquireStrategy,
    release: ReleaseStrategy,
    open_timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

enum Outcome<T, E>
where
    E: std::error::Error + 'static,
{
    Completed(T),
    Failed(ScopeError<E>),
    Panicked(Box<dyn Any + Send>),
}

impl<H, E> ScopedResourceGroup<H, E>
where
    H: Send + Sync + 'static,
    E: std::error::Error + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            acquire: AcquireStrategy::default(),
            release: ReleaseStrategy::default(),
            open_timeout: None,
            cancel: None,
        }
    }

    /// Build a group from specs in acquisition order
    pub fn from_specs(specs: impl IntoIterator<Item = ResourceSpec<H, E>>) -> Self {
        let mut group = Self::new();
        group.specs.extend(specs);
        group
    }

    /// Append a resource; it is opened after every resource added before it
    #[must_use]
    pub fn resource(mut self, spec: ResourceSpec<H, E>) -> Self {
        self.push(spec);
        self
    }

    pub fn push(&mut self, spec: ResourceSpec<H, E>) {
        self.specs.push(spec);
    }

    #[must_use]
    pub fn acquire(mut self, strategy: AcquireStrategy) -> Self {
        self.acquire = strategy;
        self
    }

    #[must_use]
    pub fn release(mut self, strategy: ReleaseStrategy) -> Self {
        self.release = strategy;
        self
    }

    /// Fail acquisition when a single opener takes longer than `after`
    #[must_use]
    pub fn open_timeout(mut self, after: Duration) -> Self {
        self.open_timeout = Some(after);
        self
    }

    /// Stop the run when `token` fires
    ///
    /// Acquisition stops, or the body is dropped at its next suspension
    /// point, then every acquired resource is released and
    /// [`ScopeError::Cancelled`] is returned.
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Acquire every resource, run `body` with them, then release them
    ///
    /// Runs on the caller's task. If this future is dropped part way, the
    /// resources still open are closed on a background task of the current
    /// runtime; use [`spawn`](Self::spawn) to keep the caller waiting for
    /// that teardown instead.
    pub async fn run<T, F>(self, body: F) -> Result<T, ScopeError<E>>
    where
        F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>>,
    {
        let span = log::scope_span(self.specs.len(), &self.acquire.to_string());
        self.run_inner(body).instrument(span).await
    }

    /// Like [`run`](Self::run), but on its own tokio task
    ///
    /// Dropping the returned future does not interrupt the scope: acquisition,
    /// body and teardown carry on to completion on the spawned task. A panic
    /// in the body is resumed here after teardown.
    pub async fn spawn<T, F>(self, body: F) -> Result<T, ScopeError<E>>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>> + Send + 'static,
    {
        match tokio::spawn(self.run(body)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(ScopeError::Cancelled),
        }
    }

    async fn run_inner<T, F>(self, body: F) -> Result<T, ScopeError<E>>
    where
        F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>>,
    {
        let Self {
            specs,
            acquire,
            release,
            open_timeout,
            cancel,
        } = self;

        let names = validate_names(&specs)?;
        let mut undo = UndoList::with_capacity(specs.len());

        let acquired = match acquire {
            AcquireStrategy::Sequential => {
                acquire_sequential(specs, names, &mut undo, open_timeout, cancel.as_ref()).await
            }
            AcquireStrategy::Concurrent => {
                acquire_concurrent(specs, names, &mut undo, open_timeout, cancel.as_ref()).await
            }
        };

        let outcome = match acquired {
            Ok(()) => run_body(body, undo.handles(), cancel.as_ref()).await,
            Err(err) => Outcome::Failed(err),
        };

        let failures = match release {
            ReleaseStrategy::Reverse => undo.release_reverse().await,
            ReleaseStrategy::Concurrent => undo.release_concurrent().await,
        };

        resolve(outcome, failures)
    }
}

impl<H, E> Default for ScopedResourceGroup<H, E>
where
    H: Send + Sync + 'static,
    E: std::error::Error + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E> fmt::Debug for ScopedResourceGroup<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResourceGroup")
            .field("specs", &self.specs)
            .field("acquire", &self.acquire)
            .field("release", &self.release)
            .field("open_timeout", &self.open_timeout)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

fn validate_names<H, E>(specs: &[ResourceSpec<H, E>]) -> Result<Vec<ResourceName>, ScopeError<E>>
where
    E: std::error::Error + 'static,
{
    let mut seen = HashSet::with_capacity(specs.len());
    specs
        .iter()
        .map(|spec| {
            let name = ResourceName::new(spec.name.as_str()).map_err(|e| {
                ScopeError::InvalidName {
                    name: spec.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !seen.insert(name.clone()) {
                return Err(ScopeError::DuplicateName {
                    name: name.into_string(),
                });
            }
            Ok(name)
        })
        .collect()
}

async fn acquire_sequential<H, E>(
    specs: Vec<ResourceSpec<H, E>>,
    names: Vec<ResourceName>,
    undo: &mut UndoList<H, E>,
    open_timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<(), ScopeError<E>>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    for (spec, name) in specs.into_iter().zip(names) {
        let ResourceSpec { opener, closer, .. } = spec;
        let started = Instant::now();
        let handle = open_one(&name, opener, open_timeout, cancel).await?;
        log::resource_opened(&name, started.elapsed().as_millis());
        undo.push(name, handle, closer);
    }
    Ok(())
}

/// Launch every opener at once and wait for all of them
///
/// Handles are pushed in completion order so that reverse release still
/// undoes the most recent acquisition first. The first failure to settle is
/// the one reported.
async fn acquire_concurrent<H, E>(
    specs: Vec<ResourceSpec<H, E>>,
    names: Vec<ResourceName>,
    undo: &mut UndoList<H, E>,
    open_timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<(), ScopeError<E>>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let mut pending: FuturesUnordered<_> = specs
        .into_iter()
        .zip(names)
        .map(|(spec, name)| {
            let ResourceSpec { opener, closer, .. } = spec;
            async move {
                let started = Instant::now();
                let result = open_one(&name, opener, open_timeout, cancel).await;
                (name, closer, started.elapsed(), result)
            }
        })
        .collect();

    let mut first_failure = None;
    while let Some((name, closer, elapsed, result)) = pending.next().await {
        match result {
            Ok(handle) => {
                log::resource_opened(&name, elapsed.as_millis());
                undo.push(name, handle, closer);
            }
            Err(err) if first_failure.is_none() => first_failure = Some(err),
            Err(err) => {
                log::debug!(resource = %name, error = %err, "additional acquisition failure");
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn open_one<H, E>(
    name: &ResourceName,
    opener: Opener<H, E>,
    open_timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<H, ScopeError<E>>
where
    E: std::error::Error + 'static,
{
    let opening = async {
        let opened = opener();
        match open_timeout {
            Some(after) => match tokio::time::timeout(after, opened).await {
                Ok(result) => result.map_err(|source| ScopeError::Acquisition {
                    name: name.clone(),
                    source,
                }),
                Err(_) => Err(ScopeError::OpenTimedOut {
                    name: name.clone(),
                    after,
                }),
            },
            None => opened.await.map_err(|source| ScopeError::Acquisition {
                name: name.clone(),
                source,
            }),
        }
    };

    let result = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ScopeError::Cancelled),
                result = opening => result,
            }
        }
        None => opening.await,
    };

    if let Err(err) = &result {
        if !err.is_cancelled() {
            log::resource_open_failed(name, err);
        }
    }
    result
}

async fn run_body<H, E, T, F>(
    body: F,
    handles: &IndexMap<ResourceName, H>,
    cancel: Option<&CancellationToken>,
) -> Outcome<T, E>
where
    E: std::error::Error + 'static,
    F: for<'a> FnOnce(Resources<'a, H>) -> BoxFuture<'a, Result<T, E>>,
{
    let view = Resources::new(handles);
    let work = match std::panic::catch_unwind(AssertUnwindSafe(|| body(view))) {
        Ok(work) => AssertUnwindSafe(work).catch_unwind(),
        Err(payload) => return Outcome::Panicked(payload),
    };

    let settled = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::debug!("body cancelled, releasing resources");
                    return Outcome::Failed(ScopeError::Cancelled);
                }
                settled = work => settled,
            }
        }
        None => work.await,
    };

    match settled {
        Ok(Ok(value)) => Outcome::Completed(value),
        Ok(Err(e)) => Outcome::Failed(ScopeError::Body(e)),
        Err(payload) => Outcome::Panicked(payload),
    }
}

fn resolve<T, E>(outcome: Outcome<T, E>, failures: Failures<E>) -> Result<T, ScopeError<E>>
where
    E: std::error::Error + 'static,
{
    match outcome {
        Outcome::Completed(value) if failures.is_empty() => Ok(value),
        Outcome::Completed(_) => Err(ScopeError::Teardown(TeardownFailures::new(failures))),
        Outcome::Failed(err) => {
            demote(&failures, err.kind());
            Err(err)
        }
        Outcome::Panicked(payload) => {
            demote(&failures, "panic");
            std::panic::resume_unwind(payload)
        }
    }
}

fn demote<E: std::error::Error>(failures: &[(ResourceName, E)], primary: &str) {
    for (name, e) in failures {
        log::teardown_failure_demoted(name, e, primary);
    }
}

