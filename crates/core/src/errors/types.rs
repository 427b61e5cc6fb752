//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for rescope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rescope operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    Configuration { message: String },

    /// A resource could not be opened or closed
    Connection { resource: String, message: String },

    /// A resource was used while it was not open
    NotConnected { resource: String },

    /// Input validation errors
    Validation { field: String, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Anything that should never surface to a caller
    Internal { message: String },
}
