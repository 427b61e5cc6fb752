//! Extension traits for error handling

use super::types::{Error, Result};

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", f(), base_error),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let result: std::result::Result<(), serde_json::Error> =
            serde_json::from_str::<()>("{").map(|_| ());
        let err = result
            .with_context(|| "invalid settings file rescope.json".to_string())
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("configuration error: invalid settings file rescope.json:"));
    }

    #[test]
    fn test_with_context_is_lazy_on_success() {
        let result: std::result::Result<u8, Error> = Ok(7);
        let value = result
            .with_context(|| panic!("context closure must not run"))
            .unwrap();
        assert_eq!(value, 7);
    }
}
