//! Diagnostic logging setup
//!
//! Logs go to stderr so they never mix with the report on stdout.
//! `FINFO_LOG` takes an `EnvFilter` directive and wins over `--verbose`.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "FINFO_LOG";

/// Pick the filter directive: environment first, then verbosity.
pub fn filter_directive(env_value: Option<&str>, verbose: bool) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ if verbose => "debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose);

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
