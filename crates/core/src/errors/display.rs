//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Connection { resource, message } => {
                write!(f, "connection error for '{resource}': {message}")
            }
            Error::NotConnected { resource } => {
                write!(f, "resource '{resource}' is not connected")
            }
            Error::Validation { field, message } => {
                write!(f, "invalid value for '{field}': {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::Internal { message } => {
                write!(f, "internal error: {message}")
            }
        }
    }
}
