// src/errors.rs

//! Crate-wide error type.
//!
//! Configuration and launch errors are fatal: they stop the process before
//! (or while) the monitoring loop runs. A `TransformError` only concerns one
//! asset and is recorded in the error ledger instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MashError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(
        "there isn't a .mash file at {root:?}; create one listing the directories to monitor"
    )]
    MissingConfig { root: PathBuf },

    #[error("Could not launch compressor: {0}")]
    LaunchError(String),

    #[error("Error minifying {path:?}: {reason}")]
    TransformError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MashError {
    /// Whether this error must abort the whole monitoring run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MashError::TransformError { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MashError>;
