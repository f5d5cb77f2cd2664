//! Telemetry initialisation for the hexseal CLI.
//!
//! Logs are structured JSON on **stderr**. Stdout belongs to results: a
//! one-shot command prints exactly one line there and `batch` prints one JSON
//! line per request, so a caller can pipe stdout into another program while
//! stderr goes to a log collector or `/dev/null`. A log record on stdout
//! would corrupt that stream.
//!
//! # Telemetry invariants
//!
//! - Key material, nonces, plaintexts and ciphertexts never appear in any log
//!   field. Operations are logged by name and failures by error code.
//! - `RUST_LOG` overrides `HEXSEAL_LOG_LEVEL`. An unparsable filter in either
//!   is a startup error rather than a silently dropped directive.

use anyhow::{anyhow, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if a filter does not parse or a global subscriber has
/// already been set.
pub fn init(log_level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    subscriber(filter(log_level, rust_log.as_deref())?, std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise hexseal tracing subscriber: {e}"))
}

/// Pick the filter: a non-empty `RUST_LOG` wins over the configured level.
fn filter(log_level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow!("invalid {}: {e}", EnvFilter::DEFAULT_ENV)),
        None => EnvFilter::try_new(log_level)
            .map_err(|e| anyhow!("invalid HEXSEAL_LOG_LEVEL {log_level:?}: {e}")),
    }
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .json()
        .with_writer(writer)
        .with_env_filter(filter)
        .finish()
}
