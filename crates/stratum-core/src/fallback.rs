//! Copy-based driver for hosts without overlay support.
//!
//! Materializes the merged view by copying each layer into the target,
//! base layer first, then the upper directory, so later layers win.

use std::path::Path;

use stratum_common::types::MountRequest;

use crate::driver::LayerMount;
use crate::error::{MountError, Result};
use crate::mountinfo::is_mount_point;

/// Driver that flattens layers into the target directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDriver;

impl LayerMount for FallbackDriver {
    fn mount(&self, request: &MountRequest) -> Result<()> {
        if let Some(reason) = request.invalid_reason() {
            return Err(MountError::InvalidArgument { reason });
        }

        std::fs::create_dir_all(&request.target).map_err(|e| MountError::DirectoryCreation {
            path: request.target.clone(),
            source: e,
        })?;

        for layer in request.layers.iter() {
            copy_tree(layer, &request.target)?;
        }
        if request.upper_dir.is_dir() {
            copy_tree(&request.upper_dir, &request.target)?;
        }

        tracing::info!(
            mount_point = %request.target.display(),
            layers = request.layers.len(),
            "layers copied into target"
        );
        Ok(())
    }

    /// Removes the flattened tree. A target that is already gone is fine;
    /// a target that is a live mount point is left untouched.
    fn unmount(&self, target: &Path) -> Result<()> {
        if target.symlink_metadata().is_err() {
            tracing::debug!(mount_point = %target.display(), "nothing to remove");
            return Ok(());
        }
        if is_mount_point(target)? {
            return Err(MountError::ActiveMount {
                target: target.to_path_buf(),
            });
        }
        match std::fs::remove_dir_all(target) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(MountError::Copy {
                    path: target.to_path_buf(),
                    source: e,
                });
            }
        }
        tracing::info!(mount_point = %target.display(), "flattened layers removed");
        Ok(())
    }
}

/// Recursively copies the contents of `src` into `dst`, overwriting files.
///
/// Symlinks are recreated, never followed.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    use walkdir::WalkDir;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            MountError::Copy {
                path,
                source: e.into(),
            }
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let to = dst.join(relative);
        let copy_err = |path: &Path| {
            let path = path.to_path_buf();
            move |e: std::io::Error| MountError::Copy { path, source: e }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if to.symlink_metadata().is_ok_and(|m| !m.is_dir()) {
                std::fs::remove_file(&to).map_err(copy_err(&to))?;
            }
            std::fs::create_dir_all(&to).map_err(copy_err(&to))?;
        } else if file_type.is_symlink() {
            let link = std::fs::read_link(entry.path()).map_err(copy_err(entry.path()))?;
            remove_existing(&to)?;
            std::os::unix::fs::symlink(&link, &to).map_err(copy_err(&to))?;
        } else {
            remove_existing(&to)?;
            let _bytes = std::fs::copy(entry.path(), &to).map_err(copy_err(entry.path()))?;
        }
    }
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|e| MountError::Copy {
        path: path.to_path_buf(),
        source: e,
    })
}
