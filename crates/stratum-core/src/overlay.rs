//! `OverlayFS` driver for layered build directories.
//!
//! Stacks the read-only layers of a [`MountRequest`] beneath a writable
//! upper directory and mounts the merged view on the request target.

use std::path::{Path, PathBuf};

use nix::mount::MsFlags;
use stratum_common::config::StratumConfig;
use stratum_common::constants::OVERLAY_FS_TYPE;
use stratum_common::types::MountRequest;

use crate::driver::LayerMount;
use crate::error::{MountError, Result};
use crate::options::{self, MountOptions};
use crate::{probe, syscall};

/// Driver issuing real overlay mounts.
#[derive(Debug, Clone)]
pub struct OverlayDriver {
    index_param_path: PathBuf,
}

impl OverlayDriver {
    /// Creates a driver that consults the configured `index` parameter file.
    #[must_use]
    pub fn new(config: &StratumConfig) -> Self {
        Self {
            index_param_path: config.index_param_path.clone(),
        }
    }

    /// Builds the mount data for `request` against the current kernel.
    #[must_use]
    pub fn options_for(&self, request: &MountRequest) -> MountOptions {
        MountOptions::new(request, probe::index_option(&self.index_param_path))
    }
}

impl Default for OverlayDriver {
    fn default() -> Self {
        Self::new(&StratumConfig::default())
    }
}

impl LayerMount for OverlayDriver {
    /// Mounts the merged view of `request`.
    ///
    /// Creates `target/work` first and removes it again if `mount(2)`
    /// fails. On success the work directory stays in place.
    fn mount(&self, request: &MountRequest) -> Result<()> {
        if let Some(reason) = request.invalid_reason() {
            return Err(MountError::InvalidArgument { reason });
        }

        let work_dir = options::work_dir(&request.target);
        std::fs::create_dir_all(&work_dir).map_err(|e| MountError::DirectoryCreation {
            path: work_dir.clone(),
            source: e,
        })?;

        let data = self.options_for(request).to_string();
        tracing::debug!(mount_point = %request.target.display(), data = %data, "overlay mount data");

        if let Err(source) = syscall::mount_fs(
            OVERLAY_FS_TYPE,
            &request.target,
            Some(OVERLAY_FS_TYPE),
            MsFlags::empty(),
            Some(data.as_str()),
        ) {
            remove_work_dir(&work_dir);
            return Err(MountError::MountSyscall {
                target: request.target.clone(),
                source,
            });
        }

        tracing::info!(
            mount_point = %request.target.display(),
            layers = request.layers.len(),
            "overlayfs mounted"
        );
        Ok(())
    }

    /// Force-detaches the overlay; the work directory is left to the caller.
    fn unmount(&self, target: &Path) -> Result<()> {
        syscall::force_unmount(target).map_err(|source| MountError::Unmount {
            target: target.to_path_buf(),
            source,
        })?;
        tracing::info!(mount_point = %target.display(), "overlayfs unmounted");
        Ok(())
    }
}

fn remove_work_dir(work_dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(work_dir) {
        tracing::debug!(path = %work_dir.display(), error = %e, "work directory cleanup failed");
    }
}
