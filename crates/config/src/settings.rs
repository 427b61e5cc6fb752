//! The runtime settings shared by every rescope command.

use rescope_core::{
    Error, Result, Validate, DEFAULT_BIND_ADDRESS, DEFAULT_LATENCY_MS, DEFAULT_LOG_FILTER,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// How a scope should open its resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquireMode {
    #[default]
    Sequential,
    Concurrent,
}

impl FromStr for AcquireMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(AcquireMode::Sequential),
            "concurrent" => Ok(AcquireMode::Concurrent),
            other => Err(Error::validation(
                "acquire",
                format!("expected 'sequential' or 'concurrent', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for AcquireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireMode::Sequential => write!(f, "sequential"),
            AcquireMode::Concurrent => write!(f, "concurrent"),
        }
    }
}

/// Fully resolved settings
///
/// Durations are written as milliseconds in the JSON file
/// (`latency_ms`, `open_timeout_ms`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `EnvFilter` directive used when neither `RESCOPE_LOG` nor `RUST_LOG` is set
    pub log_filter: String,

    /// Address the HTTP collaborator listens on
    pub bind: SocketAddr,

    /// Simulated latency of every open, close and query
    #[serde(rename = "latency_ms", with = "millis")]
    pub latency: Duration,

    /// Per-opener timeout; `None` waits forever
    #[serde(rename = "open_timeout_ms", with = "optional_millis")]
    pub open_timeout: Option<Duration>,

    pub acquire: AcquireMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            bind: default_bind(),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            open_timeout: None,
            acquire: AcquireMode::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or `RESCOPE_CONFIG`) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut loader = crate::SettingsLoader::new();
        if let Some(path) = path {
            loader = loader.file(path);
        }
        loader.load()
    }

    /// Parse settings from a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        Validate::not_empty(&self.log_filter, "log_filter")?;
        if let Some(timeout) = self.open_timeout {
            Validate::with_predicate(
                timeout,
                |t| !t.is_zero(),
                "open_timeout_ms",
                "must be greater than zero",
            )?;
        }
        Ok(())
    }
}

fn default_bind() -> SocketAddr {
    DEFAULT_BIND_ADDRESS
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8000)))
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}
