//! Logging setup for the CLI.
//!
//! Diagnostics go to stderr so the rendered calendar on stdout stays clean.
//! The filter comes from `HOLICAL_LOG` (e.g. `HOLICAL_LOG=holical=debug`).

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::{Error, Result};

pub const LOG_ENV_VAR: &str = "HOLICAL_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))
}
