//! Overlay mount data construction.

use std::fmt;
use std::path::{Path, PathBuf};

use stratum_common::constants::WORK_DIR_NAME;
use stratum_common::types::MountRequest;

/// Data string handed to `mount(2)` for an overlay mount.
///
/// Renders as `[index=off,]lowerdir=<top>:...:<base>,upperdir=<upper>,workdir=<target>/work`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
    index_flag: Option<&'static str>,
    lowers: Vec<PathBuf>,
    upper_dir: PathBuf,
    work_dir: PathBuf,
}

impl MountOptions {
    /// Builds the options for `request`, optionally prefixed by a capability flag.
    #[must_use]
    pub fn new(request: &MountRequest, index_flag: Option<&'static str>) -> Self {
        Self {
            index_flag,
            lowers: request.layers.kernel_order().map(Path::to_path_buf).collect(),
            upper_dir: request.upper_dir.clone(),
            work_dir: work_dir(&request.target),
        }
    }

    /// Returns the work directory named in the options.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the `lowerdir=` value, topmost layer first.
    #[must_use]
    pub fn lowerdir(&self) -> String {
        self.lowers
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for MountOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(flag) = self.index_flag {
            write!(f, "{flag},")?;
        }
        write!(
            f,
            "lowerdir={},upperdir={},workdir={}",
            self.lowerdir(),
            self.upper_dir.display(),
            self.work_dir.display()
        )
    }
}

/// Returns the overlay work directory for a mount target.
#[must_use]
pub fn work_dir(target: &Path) -> PathBuf {
    target.join(WORK_DIR_NAME)
}
