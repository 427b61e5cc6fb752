//! Shared utilities for rescope
//!
//! Logging setup, drop-time cleanup guards, and the bridge used to drive
//! async code from synchronous callers.

pub mod async_runtime;
pub mod cleanup;
pub mod tracing;

pub use async_runtime::*;
pub use cleanup::*;
