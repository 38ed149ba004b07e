//! Error type shared by the store, loaders, configuration and CLI.
//!
//! The layout engine itself never fails; these cover everything around it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid event kind '{0}' (must be national, company, pto, or event)")]
    InvalidKind(String),

    #[error("Invalid visible slot cap: {0} (must be at least 1)")]
    InvalidSlotCap(usize),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Event record {0} not found")]
    NotFound(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Args(String),
}

pub type Result<T> = std::result::Result<T, Error>;
