//! Unified error types for the stratum workspace.
//!
//! Higher-level crates define their own domain-specific error enum that wraps
//! these common variants when appropriate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StratumError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The mount table could not be read or parsed.
    #[error("failed to read mount table {path}: {message}")]
    MountTable {
        /// Mount table that was read.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// An external command exited unsuccessfully.
    #[error("command `{command}` failed: {status}")]
    CommandFailed {
        /// Command line that was executed.
        command: String,
        /// Exit status or failure description.
        status: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StratumError>;
