//! The undo list: handles that were opened and still need closing.

use crate::spec::Closer;
use futures::future::join_all;
use futures::FutureExt;
use indexmap::IndexMap;
use rescope_core::ResourceName;
use rescope_utils::tracing as log;
use rescope_utils::{spawn_cleanup, AsyncCleanup};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Successfully opened handles plus their closers, in acquisition order
///
/// Only handles whose opener returned successfully are ever pushed, and a
/// name appears at most once. A closer that has started is owned by an
/// [`AsyncCleanup`] guard until it finishes, so dropping the owning future
/// never abandons it: an in-flight close completes in the background, and
/// anything still queued is closed after it in reverse order.
pub(crate) struct UndoList<H, E>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    handles: IndexMap<ResourceName, H>,
    closers: Vec<Closer<H, E>>,
    in_flight: Option<(ResourceName, Closing<E>)>,
}

pub(crate) type Failures<E> = Vec<(ResourceName, E)>;

type Panic = Box<dyn Any + Send>;

/// How one closer ended: cleanly, with an error, or by panicking
type CloseOutcome<E> = Result<Option<(ResourceName, E)>, (ResourceName, Panic)>;

type Closing<E> = AsyncCleanup<CloseOutcome<E>>;

impl<H, E> UndoList<H, E>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: IndexMap::with_capacity(capacity),
            closers: Vec::with_capacity(capacity),
            in_flight: None,
        }
    }

    pub(crate) fn push(&mut self, name: ResourceName, handle: H, closer: Closer<H, E>) {
        debug_assert!(!self.handles.contains_key(&name));
        self.handles.insert(name, handle);
        self.closers.push(closer);
    }

    pub(crate) fn handles(&self) -> &IndexMap<ResourceName, H> {
        &self.handles
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    /// Remove the most recently acquired entry
    fn pop(&mut self) -> Option<(ResourceName, H, Closer<H, E>)> {
        let (name, handle) = self.handles.pop()?;
        let closer = self.closers.pop()?;
        Some((name, handle, closer))
    }

    /// Drain every entry, most recently acquired first
    fn drain_reverse(&mut self) -> Vec<(ResourceName, H, Closer<H, E>)> {
        let mut entries = Vec::with_capacity(self.len());
        while let Some(entry) = self.pop() {
            entries.push(entry);
        }
        entries
    }

    /// Close entries one at a time, last acquired first
    ///
    /// Every closer runs even if an earlier one failed or panicked. The first
    /// panic is resumed once the list is empty.
    pub(crate) async fn release_reverse(&mut self) -> Failures<E> {
        let mut released = Released::default();
        while let Some((name, handle, closer)) = self.pop() {
            let (_, closing) = self
                .in_flight
                .insert((name.clone(), start_close(name, handle, closer)));
            let outcome = closing.await;
            self.in_flight = None;
            released.record(outcome);
        }
        released.finish()
    }

    /// Close every entry at once; failures are reported in reverse
    /// acquisition order
    ///
    /// A panicking closer does not stop its siblings. The first panic is
    /// resumed after all of them have settled.
    pub(crate) async fn release_concurrent(&mut self) -> Failures<E> {
        let closing: Vec<_> = self
            .drain_reverse()
            .into_iter()
            .map(|(name, handle, closer)| start_close(name, handle, closer))
            .collect();

        let mut released = Released::default();
        for outcome in join_all(closing).boxed().await {
            released.record(outcome);
        }
        released.finish()
    }
}

/// Start closing one handle under a guard that finishes the close in the
/// background if it is dropped
fn start_close<H, E>(name: ResourceName, handle: H, closer: Closer<H, E>) -> Closing<E>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let label = name.clone();
    AsyncCleanup::new(
        format!("close {name}"),
        AssertUnwindSafe(close_one(name, handle, closer))
            .catch_unwind()
            .map(move |settled| settled.map_err(|payload| (label, payload))),
    )
}

async fn close_one<H, E>(
    name: ResourceName,
    handle: H,
    closer: Closer<H, E>,
) -> Option<(ResourceName, E)>
where
    E: std::error::Error,
{
    match closer(handle).await {
        Ok(()) => {
            log::resource_closed(&name, None);
            None
        }
        Err(e) => {
            log::resource_closed(&name, Some(&e));
            Some((name, e))
        }
    }
}

/// Failures collected while releasing, plus the first closer panic
struct Released<E> {
    failures: Failures<E>,
    panic: Option<Panic>,
}

impl<E> Default for Released<E> {
    fn default() -> Self {
        Self {
            failures: Vec::new(),
            panic: None,
        }
    }
}

impl<E> Released<E> {
    fn record(&mut self, outcome: CloseOutcome<E>) {
        match outcome {
            Ok(None) => {}
            Ok(Some(failure)) => self.failures.push(failure),
            Err((name, payload)) => {
                log::closer_panicked(&name);
                if self.panic.is_none() {
                    self.panic = Some(payload);
                }
            }
        }
    }

    fn finish(self) -> Failures<E> {
        if let Some(payload) = self.panic {
            std::panic::resume_unwind(payload);
        }
        self.failures
    }
}

impl<H, E> Drop for UndoList<H, E>
where
    H: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    fn drop(&mut self) {
        let in_flight = self.in_flight.take();
        if in_flight.is_none() && self.handles.is_empty() {
            return;
        }

        let entries = self.drain_reverse();
        let names: Vec<String> = in_flight
            .iter()
            .map(|(name, _)| name.to_string())
            .chain(entries.iter().map(|(name, _, _)| name.to_string()))
            .collect();
        log::warn!(
            resources = ?names,
            "scope dropped before teardown finished, releasing in background"
        );

        spawn_cleanup("scope teardown after cancellation", async move {
            let queued = entries
                .into_iter()
                .map(|(name, handle, closer)| start_close(name, handle, closer));
            for closing in in_flight.map(|(_, closing)| closing).into_iter().chain(queued) {
                match closing.await {
                    Ok(None) => {}
                    Ok(Some((name, e))) => log::teardown_failure_demoted(&name, &e, "cancelled"),
                    Err((name, _)) => log::closer_panicked(&name),
                }
            }
        });
    }
}
