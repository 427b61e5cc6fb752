//! How a group opens and closes its members.

use std::fmt;

/// Order in which openers are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireStrategy {
    /// One opener at a time, in declaration order; stops at the first failure
    #[default]
    Sequential,
    /// All openers launched together; the group waits for every one to settle
    Concurrent,
}

/// Order in which closers are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseStrategy {
    /// One closer at a time, reverse of acquisition order
    #[default]
    Reverse,
    /// All closers launched together
    Concurrent,
}

impl fmt::Display for AcquireStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireStrategy::Sequential => f.write_str("sequential"),
            AcquireStrategy::Concurrent => f.write_str("concurrent"),
        }
    }
}

impl fmt::Display for ReleaseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseStrategy::Reverse => f.write_str("reverse"),
            ReleaseStrategy::Concurrent => f.write_str("concurrent"),
        }
    }
}
