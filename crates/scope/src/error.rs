//! Failure taxonomy for scoped runs.

use rescope_core::ResourceName;
use std::fmt;
use std::time::Duration;

/// Why a scoped run did not produce the body's value
///
/// `Acquisition`, `OpenTimedOut`, and `Body` always win over teardown
/// failures; those are logged instead. `Teardown` is only returned when every
/// opener and the body succeeded.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError<E>
where
    E: std::error::Error + 'static,
{
    /// An opener failed before every resource was ready
    #[error("failed to acquire resource '{name}': {source}")]
    Acquisition {
        name: ResourceName,
        #[source]
        source: E,
    },

    /// An opener did not settle within the configured open timeout
    #[error("acquiring resource '{name}' timed out after {after:?}")]
    OpenTimedOut { name: ResourceName, after: Duration },

    /// The unit of work itself failed; the cause is passed through untouched
    #[error(transparent)]
    Body(E),

    /// One or more closers failed after an otherwise successful run
    #[error("{0}")]
    Teardown(TeardownFailures<E>),

    /// Two specs in one group share a name
    #[error("resource name '{name}' is declared more than once")]
    DuplicateName { name: String },

    /// A spec name is empty or otherwise unusable as a key
    #[error("invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The group's cancellation token fired; every acquired resource was
    /// released before this was returned
    #[error("scoped run was cancelled")]
    Cancelled,
}

impl<E> ScopeError<E>
where
    E: std::error::Error + 'static,
{
    /// Whether acquisition stopped the run (failure or timeout)
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            ScopeError::Acquisition { .. } | ScopeError::OpenTimedOut { .. }
        )
    }

    pub fn is_body(&self) -> bool {
        matches!(self, ScopeError::Body(_))
    }

    pub fn is_teardown(&self) -> bool {
        matches!(self, ScopeError::Teardown(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScopeError::Cancelled)
    }

    /// Name of the resource whose opener failed, if acquisition failed
    pub fn failed_resource(&self) -> Option<&ResourceName> {
        match self {
            ScopeError::Acquisition { name, .. } | ScopeError::OpenTimedOut { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Unwrap the body's own error
    pub fn into_body(self) -> Option<E> {
        match self {
            ScopeError::Body(e) => Some(e),
            _ => None,
        }
    }

    /// Short label used when logging demoted teardown failures
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ScopeError::Acquisition { .. } => "acquisition",
            ScopeError::OpenTimedOut { .. } => "open_timeout",
            ScopeError::Body(_) => "body",
            ScopeError::Teardown(_) => "teardown",
            ScopeError::DuplicateName { .. } | ScopeError::InvalidName { .. } => "invalid_spec",
            ScopeError::Cancelled => "cancelled",
        }
    }
}

/// Every closer failure collected during one teardown, in the order the
/// closers ran
#[derive(Debug)]
pub struct TeardownFailures<E> {
    failures: Vec<(ResourceName, E)>,
}

impl<E> TeardownFailures<E> {
    pub(crate) fn new(failures: Vec<(ResourceName, E)>) -> Self {
        Self { failures }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceName, &E)> {
        self.failures.iter().map(|(name, e)| (name, e))
    }

    /// Names of the resources whose closer failed
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|(name, _)| name.as_str())
    }

    pub fn into_inner(self) -> Vec<(ResourceName, E)> {
        self.failures
    }
}

impl<E: fmt::Display> fmt::Display for TeardownFailures<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 {
            "resource"
        } else {
            "resources"
        };
        write!(f, "failed to release {} {noun}", self.failures.len())?;
        for (i, (name, e)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}'{name}': {e}")?;
        }
        Ok(())
    }
}
