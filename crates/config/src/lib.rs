//! Configuration for rescope
//!
//! Settings come from three layers, later ones winning: built-in defaults, an
//! optional JSON file, then `RESCOPE_*` environment variables.

pub mod loader;
pub mod settings;

pub use loader::SettingsLoader;
pub use settings::{AcquireMode, Settings};
