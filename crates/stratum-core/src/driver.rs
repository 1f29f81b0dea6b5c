//! Mount driver selection.
//!
//! [`MountDriver`] is decided once at construction: the overlay driver when
//! the kernel supports it, the copy-based fallback otherwise. Callers only
//! see the [`LayerMount`] capability set.

use std::fmt;
use std::path::Path;

use stratum_common::config::StratumConfig;
use stratum_common::types::MountRequest;

use crate::error::Result;
use crate::fallback::FallbackDriver;
use crate::overlay::OverlayDriver;
use crate::probe;

/// Operations every mount strategy provides.
pub trait LayerMount {
    /// Assembles the merged view described by `request` at its target.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the merge fails.
    fn mount(&self, request: &MountRequest) -> Result<()>;

    /// Tears down whatever [`LayerMount::mount`] assembled at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the teardown fails.
    fn unmount(&self, target: &Path) -> Result<()>;
}

/// Which strategy a [`MountDriver`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Kernel overlay mounts.
    Overlay,
    /// Layers copied into the target.
    Fallback,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => write!(f, "overlay"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The mount strategy selected for this host.
#[derive(Debug, Clone)]
pub enum MountDriver {
    /// Overlay-capable host.
    Overlay(OverlayDriver),
    /// Host without overlay support.
    Fallback(FallbackDriver),
}

impl MountDriver {
    /// Probes the host with default settings and picks a driver.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&StratumConfig::default())
    }

    /// Probes the host described by `config` and picks a driver.
    ///
    /// The probe runs on every call; the result is not cached.
    #[must_use]
    pub fn from_config(config: &StratumConfig) -> Self {
        let driver = if probe::supports_overlay(config) {
            Self::Overlay(OverlayDriver::new(config))
        } else {
            Self::Fallback(FallbackDriver)
        };
        tracing::debug!(kind = %driver.kind(), "mount driver selected");
        driver
    }

    /// Returns the selected strategy.
    #[must_use]
    pub const fn kind(&self) -> DriverKind {
        match self {
            Self::Overlay(_) => DriverKind::Overlay,
            Self::Fallback(_) => DriverKind::Fallback,
        }
    }
}

impl Default for MountDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerMount for MountDriver {
    fn mount(&self, request: &MountRequest) -> Result<()> {
        match self {
            Self::Overlay(d) => d.mount(request),
            Self::Fallback(d) => d.mount(request),
        }
    }

    fn unmount(&self, target: &Path) -> Result<()> {
        match self {
            Self::Overlay(d) => d.unmount(target),
            Self::Fallback(d) => d.unmount(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config_with_registry(dir: &Path, registry: &str) -> StratumConfig {
        let filesystems_path: PathBuf = dir.join("filesystems");
        std::fs::write(&filesystems_path, registry).expect("write failed");
        StratumConfig {
            filesystems_path,
            module_loader: Vec::new(),
            ..StratumConfig::default()
        }
    }

    #[test]
    fn overlay_registry_selects_overlay_driver() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let config = config_with_registry(dir.path(), "nodev\tproc\nnodev\toverlay\n");
        assert_eq!(MountDriver::from_config(&config).kind(), DriverKind::Overlay);
    }

    #[test]
    fn registry_without_overlay_selects_fallback() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let config = config_with_registry(dir.path(), "nodev\tproc\n\text4\n");
        assert_eq!(MountDriver::from_config(&config).kind(), DriverKind::Fallback);
    }

    #[test]
    fn selection_is_recomputed_per_construction() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let config = config_with_registry(dir.path(), "\text4\n");
        assert_eq!(MountDriver::from_config(&config).kind(), DriverKind::Fallback);

        std::fs::write(&config.filesystems_path, "nodev\toverlay\n").expect("write failed");
        assert_eq!(MountDriver::from_config(&config).kind(), DriverKind::Overlay);
    }

    #[test]
    fn fallback_variant_delegates_mount() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let base = dir.path().join("base");
        std::fs::create_dir_all(&base).expect("mkdir failed");
        std::fs::write(base.join("hello"), "hi").expect("write failed");
        let target = dir.path().join("merged");

        let driver = MountDriver::Fallback(FallbackDriver);
        let request = MountRequest::new(
            &target,
            dir.path().join("upper"),
            stratum_common::types::LayerStack::new([&base]),
        );
        driver.mount(&request).expect("mount failed");
        assert!(target.join("hello").exists());

        driver.unmount(&target).expect("unmount failed");
        assert!(!target.exists());
    }
}
