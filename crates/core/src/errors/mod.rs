//! Error types and result extensions for rescope operations

mod builders;
mod conversions;
mod display;
mod extensions;
mod types;
mod validate;

pub use builders::*;
pub use extensions::*;
pub use types::{Error, Result};
pub use validate::Validate;
