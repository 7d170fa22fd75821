//! Log subscriber setup: plain single-line records on stdout, each one
//! `[YYYY-MM-DD HH:MM:SS] message` in UTC.

use std::ffi::OsString;

use anyhow::{anyhow, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "backup_tagger=info";
const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";
const LIB_BACKTRACE_VAR: &str = "RUST_LIB_BACKTRACE";

/// Turns on backtrace capture for `anyhow` errors unless the operator has
/// already chosen a setting. Call before any other thread starts.
pub fn enable_error_backtraces() {
    if let Some(value) = backtrace_override(std::env::var_os(LIB_BACKTRACE_VAR)) {
        std::env::set_var(LIB_BACKTRACE_VAR, value);
    }
}

fn backtrace_override(current: Option<OsString>) -> Option<&'static str> {
    match current {
        Some(_) => None,
        None => Some("1"),
    }
}

pub fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing::subscriber::set_global_default(subscriber(filter, std::io::stdout))
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_ansi(false)
        .with_level(false)
        .with_target(false)
        .finish()
}
