//! Kernel capability detection for overlay mounts.
//!
//! Every probe reads the host afresh; nothing is cached between calls, so a
//! module loaded or a kernel reconfigured in the meantime is picked up.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use stratum_common::config::StratumConfig;
use stratum_common::constants::{INDEX_OFF_OPTION, OVERLAY_REGISTRY_ENTRY};

/// Returns whether overlay mounts can be used on this host.
///
/// Tries to load the overlay module first; a failed load means "not
/// supported" rather than an error. Then looks for the overlay entry in the
/// filesystem-type registry.
pub fn supports_overlay(config: &StratumConfig) -> bool {
    if !load_overlay_module(&config.module_loader) {
        return false;
    }
    registry_lists_overlay(&config.filesystems_path)
}

/// Runs the module loader, returning `true` when it exits successfully.
///
/// An empty loader counts as success.
pub fn load_overlay_module(loader: &[String]) -> bool {
    let Some((program, args)) = loader.split_first() else {
        return true;
    };
    let program = match which::which(program) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(program = %program, error = %e, "module loader not found");
            return false;
        }
    };
    match Command::new(&program).args(args).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::debug!(program = %program.display(), %status, "module loader failed");
            false
        }
        Err(e) => {
            tracing::debug!(program = %program.display(), error = %e, "module loader did not run");
            false
        }
    }
}

/// Returns whether the registry at `path` has an exact overlay entry.
pub fn registry_lists_overlay(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(registry) => registry.lines().any(|line| line == OVERLAY_REGISTRY_ENTRY),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "filesystem registry unreadable");
            false
        }
    }
}

/// Returns `index=off` when the kernel knows the overlay `index` parameter.
///
/// A missing parameter file means an older kernel and yields `None`. Any
/// other failure is logged as a warning and also yields `None`, so the mount
/// goes ahead without the option.
pub fn index_option(param_path: &Path) -> Option<&'static str> {
    match std::fs::metadata(param_path) {
        Ok(_) => Some(INDEX_OFF_OPTION),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(
                path = %param_path.display(),
                error = %e,
                "unable to detect whether overlay kernel module supports index parameter"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_registry(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("filesystems");
        std::fs::write(&path, content).expect("write failed");
        path
    }

    #[test]
    fn registry_with_overlay_entry_is_detected() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = write_registry(dir.path(), "nodev\tsysfs\nnodev\tproc\n\text4\nnodev\toverlay\n");
        assert!(registry_lists_overlay(&path));
    }

    #[test]
    fn registry_requires_exact_entry() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = write_registry(dir.path(), "nodev\toverlayfs\n\toverlay\nnodev overlay\n");
        assert!(!registry_lists_overlay(&path));
    }

    #[test]
    fn missing_registry_means_unsupported() {
        assert!(!registry_lists_overlay(Path::new("/nonexistent/filesystems")));
    }

    #[test]
    fn empty_loader_counts_as_loaded() {
        assert!(load_overlay_module(&[]));
    }

    #[test]
    fn unknown_loader_means_unsupported() {
        let loader = vec!["stratum-no-such-loader".to_string(), "overlay".to_string()];
        assert!(!load_overlay_module(&loader));
    }

    #[test]
    fn failed_load_short_circuits_registry() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let config = StratumConfig {
            filesystems_path: write_registry(dir.path(), "nodev\toverlay\n"),
            module_loader: vec!["stratum-no-such-loader".to_string()],
            ..StratumConfig::default()
        };
        assert!(!supports_overlay(&config));
    }

    #[test]
    fn supports_overlay_reads_registry_after_load() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let config = StratumConfig {
            filesystems_path: write_registry(dir.path(), "nodev\toverlay\n"),
            module_loader: Vec::new(),
            ..StratumConfig::default()
        };
        assert!(supports_overlay(&config));
    }

    #[test]
    fn index_option_follows_parameter_file() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let param = dir.path().join("index");
        assert_eq!(index_option(&param), None);

        std::fs::write(&param, "Y\n").expect("write failed");
        assert_eq!(index_option(&param), Some("index=off"));
    }

    #[test]
    fn index_option_tolerates_unexpected_errors() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let file = dir.path().join("plain");
        std::fs::write(&file, "").expect("write failed");
        // ENOTDIR rather than ENOENT
        assert_eq!(index_option(&file.join("index")), None);
    }
}
