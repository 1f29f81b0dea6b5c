//! Errors raised by the mount drivers.

use std::path::PathBuf;

use nix::errno::Errno;
use stratum_common::error::StratumError;
use thiserror::Error;

/// Failure of a mount or unmount operation.
#[derive(Debug, Error)]
pub enum MountError {
    /// The request was rejected before touching the filesystem.
    #[error("invalid mount request: {reason}")]
    InvalidArgument {
        /// Which part of the request is missing.
        reason: &'static str,
    },

    /// The overlay work directory could not be created; nothing was mounted.
    #[error("failed to create work directory {path}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The `mount(2)` call itself failed.
    #[error("error creating overlay mount to {target}: {source}")]
    MountSyscall {
        /// Mount point of the failed mount.
        target: PathBuf,
        /// Error reported by the kernel.
        source: Errno,
    },

    /// The forced unmount failed.
    #[error("failed to unmount {target}: {source}")]
    Unmount {
        /// Mount point that could not be detached.
        target: PathBuf,
        /// Error reported by the kernel.
        source: Errno,
    },

    /// The target is a live mount point and will not be deleted.
    #[error("refusing to remove {target}: it is an active mount point")]
    ActiveMount {
        /// Mount point that was left in place.
        target: PathBuf,
    },

    /// Copying layer content in the fallback driver failed.
    #[error("failed to copy {path}: {source}")]
    Copy {
        /// Path being copied or removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A shared workspace error.
    #[error(transparent)]
    Common(#[from] StratumError),
}

/// Convenience alias for driver results.
pub type Result<T> = std::result::Result<T, MountError>;
