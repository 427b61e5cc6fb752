use rescope_core::{DEFAULT_LOG_FILTER, RESCOPE_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use ::tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter is taken from `RESCOPE_LOG`, then `RUST_LOG`, then
/// `default_filter`. Output goes to stderr so that command output on stdout
/// stays clean. Calling this twice returns an error instead of panicking.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = build_filter(default_filter)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn build_filter(default_filter: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    if let Ok(directives) = std::env::var(RESCOPE_LOG_VAR) {
        return EnvFilter::try_new(directives);
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) if default_filter.is_empty() => EnvFilter::try_new(DEFAULT_LOG_FILTER),
        Err(_) => EnvFilter::try_new(default_filter),
    }
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one scoped run
pub fn scope_span(resource_count: usize, strategy: &str) -> Span {
    span!(Level::INFO, "scope", resources = %resource_count, strategy = %strategy)
}

/// Emit a structured event for a successful open
pub fn resource_opened(name: &str, elapsed_ms: u128) {
    debug!(resource = %name, elapsed_ms = %elapsed_ms, "resource_opened");
}

/// Emit a structured event for a failed open
pub fn resource_open_failed(name: &str, error: &dyn std::fmt::Display) {
    warn!(resource = %name, error = %error, "resource_open_failed");
}

/// Emit a structured event for a completed close
pub fn resource_closed(name: &str, error: Option<&dyn std::fmt::Display>) {
    match error {
        None => debug!(resource = %name, "resource_closed"),
        Some(error) => warn!(resource = %name, error = %error, "resource_close_failed"),
    }
}

/// Record a closer that panicked; the panic is resumed once teardown is done
pub fn closer_panicked(name: &str) {
    error!(resource = %name, "resource_closer_panicked");
}

/// Record a teardown failure that is not raised because an earlier failure
/// already decides the outcome of the scope
pub fn teardown_failure_demoted(name: &str, error: &dyn std::fmt::Display, primary: &str) {
    warn!(
        resource = %name,
        error = %error,
        primary = %primary,
        "teardown_failure_demoted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_filter_prefers_rescope_log() {
        std::env::set_var(RESCOPE_LOG_VAR, "rescope_scope=trace");
        let filter = build_filter("warn").unwrap();
        std::env::remove_var(RESCOPE_LOG_VAR);
        assert!(filter.to_string().contains("rescope_scope=trace"));
    }

    #[test]
    #[serial]
    fn test_filter_rejects_garbage_directive() {
        std::env::set_var(RESCOPE_LOG_VAR, "rescope=notalevel");
        let result = build_filter("info");
        std::env::remove_var(RESCOPE_LOG_VAR);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_filter_falls_back_to_default() {
        std::env::remove_var(RESCOPE_LOG_VAR);
        std::env::remove_var("RUST_LOG");
        let filter = build_filter("debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }
}
