//! Settings loader
//!
//! Resolves the settings file, parses it, and applies environment overrides
//! on top. Each step fails with a configuration error that names the file or
//! variable at fault.

use crate::settings::{AcquireMode, Settings};
use rescope_core::{
    constants::{
        RESCOPE_ACQUIRE_VAR, RESCOPE_BIND_VAR, RESCOPE_CONFIG_VAR, RESCOPE_LATENCY_MS_VAR,
        RESCOPE_LOG_VAR, RESCOPE_OPEN_TIMEOUT_MS_VAR,
    },
    Error, Result, ResultExt,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder that produces [`Settings`]
pub struct SettingsLoader {
    /// Explicit settings file; takes priority over `RESCOPE_CONFIG`
    file: Option<PathBuf>,
    /// Whether `RESCOPE_*` variables are applied
    env_overrides: bool,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_overrides: true,
        }
    }

    /// Read settings from this file instead of `RESCOPE_CONFIG`
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip the environment override layer
    pub fn env_overrides(mut self, enabled: bool) -> Self {
        self.env_overrides = enabled;
        self
    }

    /// Resolve the final settings
    pub fn load(self) -> Result<Settings> {
        let mut settings = match self.settings_file() {
            Some(path) => Self::read_file(&path)?,
            None => Settings::default(),
        };

        if self.env_overrides {
            Self::apply_env(&mut settings)?;
        }

        settings.validate()?;
        tracing::debug!(
            bind = %settings.bind,
            latency_ms = %settings.latency.as_millis(),
            acquire = %settings.acquire,
            "settings loaded"
        );
        Ok(settings)
    }

    fn settings_file(&self) -> Option<PathBuf> {
        self.file.clone().or_else(|| {
            std::env::var(RESCOPE_CONFIG_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
    }

    fn read_file(path: &Path) -> Result<Settings> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read settings file", e))?;
        Settings::from_json(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    fn apply_env(settings: &mut Settings) -> Result<()> {
        if let Some(filter) = env_value(RESCOPE_LOG_VAR) {
            settings.log_filter = filter;
        }
        if let Some(bind) = env_value(RESCOPE_BIND_VAR) {
            settings.bind = parse_env(RESCOPE_BIND_VAR, &bind)?;
        }
        if let Some(ms) = env_value(RESCOPE_LATENCY_MS_VAR) {
            settings.latency = Duration::from_millis(parse_env(RESCOPE_LATENCY_MS_VAR, &ms)?);
        }
        if let Some(ms) = env_value(RESCOPE_OPEN_TIMEOUT_MS_VAR) {
            let ms: u64 = parse_env(RESCOPE_OPEN_TIMEOUT_MS_VAR, &ms)?;
            settings.open_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(mode) = env_value(RESCOPE_ACQUIRE_VAR) {
            settings.acquire = parse_env::<AcquireMode>(RESCOPE_ACQUIRE_VAR, &mode)?;
        }
        Ok(())
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(var: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::configuration(format!("{var}: invalid value '{raw}': {e}")))
}
