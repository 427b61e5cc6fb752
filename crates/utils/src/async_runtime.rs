use rescope_core::{Error, Result};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// Lazily built current-thread runtime for driving async work from sync code
pub struct AsyncRuntime {
    runtime: Option<Runtime>,
}

impl AsyncRuntime {
    /// Create a new async runtime manager
    #[must_use]
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Get or create a runtime
    fn get_or_create_runtime(&mut self) -> Result<&Runtime> {
        if self.runtime.is_none() {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    return Err(Error::configuration(format!(
                        "failed to create tokio runtime: {e}"
                    )));
                }
            };
            self.runtime = Some(runtime);
        }

        self.runtime.as_ref().ok_or_else(|| {
            Error::internal("runtime unexpectedly missing after initialization")
        })
    }

    /// Drive a future to completion on this runtime
    ///
    /// Must not be called from inside another runtime.
    ///
    /// The future's own output is returned untouched; only failure to build
    /// the runtime is reported through the outer `Result`.
    pub fn block_on<F>(&mut self, future: F) -> Result<F::Output>
    where
        F: Future,
    {
        let runtime = self.get_or_create_runtime()?;
        Ok(runtime.block_on(future))
    }
}

impl Default for AsyncRuntime {
    fn default() -> Self {
        Self::new()
    }
}
