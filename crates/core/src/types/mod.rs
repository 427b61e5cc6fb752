//! Domain newtypes shared across the workspace.

pub mod newtypes;

pub use newtypes::ResourceName;
