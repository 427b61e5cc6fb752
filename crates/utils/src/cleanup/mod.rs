//! Resource cleanup that must survive early exits.
//!
//! ## Key Components
//!
//! - **`handler`**: `AsyncCleanup`, an RAII guard that owns an async cleanup
//!   future and makes sure it runs even when the owner is dropped mid-flight
//!   (for example when a caller cancels the future holding it).

pub mod handler;

pub use handler::{spawn_cleanup, AsyncCleanup};
