//! Logging setup
//!
//! Installs a global `tracing` subscriber. The library itself only emits
//! events; binaries and tests decide whether to call `init_logging`.
//!
//! Environment:
//! - `RUST_LOG` - filter directives (default `authorizator=info`)
//! - `AUTHORIZATOR_LOG_FORMAT=json` - JSON lines instead of plain text
//! - `AUTHORIZATOR_LOG_DIR` - write to a daily rolling file in this directory

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "authorizator=info";

/// Log file name prefix inside `AUTHORIZATOR_LOG_DIR`
pub const LOG_FILE_PREFIX: &str = "authorizator.log";

/// Initialize the global subscriber from the environment
pub fn init_logging() -> Result<()> {
    let json = std::env::var("AUTHORIZATOR_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let dir = std::env::var("AUTHORIZATOR_LOG_DIR").ok();

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let result = match (dir, json) {
        (Some(dir), true) => builder
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (Some(dir), false) => builder
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (None, true) => builder.json().with_writer(std::io::stderr).try_init(),
        (None, false) => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

/// Filter from `RUST_LOG`, falling back to `DEFAULT_FILTER`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
