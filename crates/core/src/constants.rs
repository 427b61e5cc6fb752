/// Constants used throughout the rescope codebase
// Environment variable names
pub const RESCOPE_LOG_VAR: &str = "RESCOPE_LOG";
pub const RESCOPE_CONFIG_VAR: &str = "RESCOPE_CONFIG";
pub const RESCOPE_BIND_VAR: &str = "RESCOPE_BIND";
pub const RESCOPE_LATENCY_MS_VAR: &str = "RESCOPE_LATENCY_MS";
pub const RESCOPE_OPEN_TIMEOUT_MS_VAR: &str = "RESCOPE_OPEN_TIMEOUT_MS";
pub const RESCOPE_ACQUIRE_VAR: &str = "RESCOPE_ACQUIRE";

// Defaults
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_LATENCY_MS: u64 = 100;

// Resource names used by the HTTP collaborator
pub const MAIN_DB_RESOURCE: &str = "db";
pub const CACHE_RESOURCE: &str = "cache";
