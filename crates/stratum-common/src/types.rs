//! Domain value types exchanged between the mount drivers and their callers.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Ordered read-only layer directories, base layer first.
///
/// Callers always think bottom-to-top; the kernel's `lowerdir=` list is
/// top-to-bottom. [`LayerStack::kernel_order`] and
/// [`LayerStack::from_kernel_order`] convert between the two and are exact
/// inverses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStack(Vec<PathBuf>);

impl LayerStack {
    /// Creates a stack from layers listed bottom-to-top.
    #[must_use]
    pub fn new<I, P>(layers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(layers.into_iter().map(Into::into).collect())
    }

    /// Rebuilds a stack from a top-to-bottom list as the kernel reports it.
    #[must_use]
    pub fn from_kernel_order<I, P>(layers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut layers: Vec<PathBuf> = layers.into_iter().map(Into::into).collect();
        layers.reverse();
        Self(layers)
    }

    /// Iterates the layers top-to-bottom.
    pub fn kernel_order(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().rev().map(PathBuf::as_path)
    }

    /// Iterates the layers bottom-to-top.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the stack holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a driver needs to assemble one merged view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    /// Merged mount point; `target/work` becomes the overlay work directory.
    pub target: PathBuf,
    /// Writable layer.
    pub upper_dir: PathBuf,
    /// Read-only layers, bottom-to-top.
    pub layers: LayerStack,
}

impl MountRequest {
    /// Creates a request without validating it; drivers validate on mount.
    #[must_use]
    pub fn new(target: impl Into<PathBuf>, upper_dir: impl Into<PathBuf>, layers: LayerStack) -> Self {
        Self {
            target: target.into(),
            upper_dir: upper_dir.into(),
            layers,
        }
    }

    /// Returns why the request cannot be mounted, if anything.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.target.as_os_str().is_empty() {
            Some("target cannot be empty")
        } else if self.layers.is_empty() {
            Some("layers cannot be empty")
        } else {
            None
        }
    }
}

/// Layer composition recovered from a mount-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Mount point the entry was looked up by.
    pub target: PathBuf,
    /// Writable layer.
    pub upper: PathBuf,
    /// Read-only layers, bottom-to-top.
    pub lowers: LayerStack,
}

impl fmt::Display for MountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (upper {}, {} layers)",
            self.target.display(),
            self.upper.display(),
            self.lowers.len()
        )
    }
}
