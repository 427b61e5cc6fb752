//! Core domain types, errors, and constants for `rescope`.
//!
//! ## Key Components
//!
//! - **`errors`**: The shared `Error` enum and `Result` alias used by every
//!   crate in the workspace, plus builder constructors and `ResultExt`.
//! - **`types`**: Validated newtypes such as `ResourceName`.
//! - **`constants`**: Environment variable names and defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt, Validate},
    types::*,
};
