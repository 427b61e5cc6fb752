//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error for a named resource
    #[must_use]
    pub fn connection(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Connection {
            resource: resource.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_connected(resource: impl Into<String>) -> Self {
        Error::NotConnected {
            resource: resource.into(),
        }
    }

    /// Create a validation error for a single field
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Name of the resource this error concerns, if any
    pub fn resource(&self) -> Option<&str> {
        match self {
            Error::Connection { resource, .. } | Error::NotConnected { resource } => {
                Some(resource)
            }
            _ => None,
        }
    }
}
