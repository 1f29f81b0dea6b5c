//! Enumeration of overlay build mounts on this host.

use std::path::{Path, PathBuf};

use procfs::process::{MountInfos, Process};
use procfs::{FromRead, ProcError};
use stratum_common::config::StratumConfig;
use stratum_common::constants::{DEFAULT_MOUNT_TABLE_PATH, OVERLAY_FS_TYPE};
use stratum_common::error::{Result, StratumError};
use stratum_common::types::MountInfo;

use super::lookup;

/// A mounted filesystem as reported by the partition source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Filesystem type, e.g. `overlay` or `ext4`.
    pub fs_type: String,
    /// Where the filesystem is mounted.
    pub mount_point: String,
}

/// Lists every mounted filesystem.
pub trait PartitionSource {
    /// Returns all mounted filesystems in mount-table order.
    ///
    /// # Errors
    ///
    /// Returns an error if the mount table cannot be read.
    fn partitions(&self) -> Result<Vec<Partition>>;
}

/// Partition source backed by a `/proc/<pid>/mountinfo` table.
#[derive(Debug, Clone)]
pub struct ProcMountInfo {
    path: PathBuf,
}

impl ProcMountInfo {
    /// Reads partitions from the mountinfo table at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PartitionSource for ProcMountInfo {
    fn partitions(&self) -> Result<Vec<Partition>> {
        let mounts = MountInfos::from_file(&self.path).map_err(|e| table_error(&self.path, &e))?;
        Ok(mounts
            .into_iter()
            .map(|m| Partition {
                fs_type: m.fs_type,
                mount_point: m.mount_point.to_string_lossy().into_owned(),
            })
            .collect())
    }
}

/// Returns whether `path` is currently a mount point in this process's
/// mount namespace.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the mount table
/// cannot be read.
pub fn is_mount_point(path: &Path) -> Result<bool> {
    let resolved = path.canonicalize().map_err(|e| StratumError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mounts = Process::myself()
        .and_then(|process| process.mountinfo())
        .map_err(|e| table_error(Path::new(DEFAULT_MOUNT_TABLE_PATH), &e))?;
    Ok(mounts.into_iter().any(|m| m.mount_point == resolved))
}

fn table_error(path: &Path, e: &ProcError) -> StratumError {
    StratumError::MountTable {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Collects layer info for every overlay build mount whose path contains `filter`.
///
/// Reads the configured mount table and looks each candidate up locally.
pub fn build_mount_info(config: &StratumConfig, filter: &str) -> Vec<MountInfo> {
    build_mount_info_with(
        &ProcMountInfo::new(&config.mount_table_path),
        &config.build_namespace,
        filter,
        lookup::mount_details,
    )
}

/// Collects layer info for overlay mounts from `source`.
///
/// Keeps mounts of type `overlay` whose mount point contains both
/// `namespace` and `filter`, then resolves each through `lookup` in
/// enumeration order. Mounts that fail to resolve are skipped.
pub fn build_mount_info_with<S, F>(
    source: &S,
    namespace: &str,
    filter: &str,
    mut lookup: F,
) -> Vec<MountInfo>
where
    S: PartitionSource + ?Sized,
    F: FnMut(&str) -> Option<MountInfo>,
{
    let partitions = match source.partitions() {
        Ok(partitions) => partitions,
        Err(e) => {
            tracing::warn!(error = %e, "failed to enumerate mounted filesystems");
            return Vec::new();
        }
    };

    let infos: Vec<MountInfo> = partitions
        .iter()
        .filter(|p| {
            p.fs_type == OVERLAY_FS_TYPE
                && p.mount_point.contains(namespace)
                && p.mount_point.contains(filter)
        })
        .filter_map(|p| lookup(&p.mount_point))
        .collect();
    tracing::debug!(filter, found = infos.len(), "build mounts enumerated");
    infos
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use stratum_common::types::LayerStack;

    use super::*;

    struct FixedPartitions(Vec<Partition>);

    impl PartitionSource for FixedPartitions {
        fn partitions(&self) -> Result<Vec<Partition>> {
            Ok(self.0.clone())
        }
    }

    fn partition(fs_type: &str, mount_point: &str) -> Partition {
        Partition {
            fs_type: fs_type.into(),
            mount_point: mount_point.into(),
        }
    }

    fn info_for(mount_point: &str) -> Option<MountInfo> {
        Some(MountInfo {
            target: PathBuf::from(mount_point),
            upper: PathBuf::from("/upper"),
            lowers: LayerStack::new(["/base"]),
        })
    }

    #[test]
    fn keeps_only_matching_overlay_mounts_in_order() {
        let source = FixedPartitions(vec![
            partition("overlay", "/var/lib/stratum/build-b"),
            partition("ext4", "/var/lib/stratum/build-x"),
            partition("overlay", "/var/lib/docker/build-c"),
            partition("overlay", "/var/lib/stratum/other"),
            partition("overlay", "/var/lib/stratum/build-a"),
        ]);

        let infos = build_mount_info_with(&source, "stratum", "build", info_for);
        let targets: Vec<_> = infos.iter().map(|i| i.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                PathBuf::from("/var/lib/stratum/build-b"),
                PathBuf::from("/var/lib/stratum/build-a"),
            ]
        );
    }

    #[test]
    fn lookup_misses_are_skipped() {
        let source = FixedPartitions(vec![
            partition("overlay", "/stratum/one"),
            partition("overlay", "/stratum/two"),
        ]);
        let infos = build_mount_info_with(&source, "stratum", "", |mp: &str| {
            if mp.ends_with("one") { None } else { info_for(mp) }
        });
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].target, Path::new("/stratum/two"));
    }

    #[test]
    fn unreadable_mount_table_yields_nothing() {
        let source = ProcMountInfo::new("/nonexistent/mountinfo");
        let infos = build_mount_info_with(&source, "stratum", "", info_for);
        assert!(infos.is_empty());
    }

    #[test]
    fn reads_partitions_from_mountinfo_table() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("mountinfo");
        std::fs::write(
            &path,
            "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
98 22 0:51 / /var/lib/stratum/b1 rw,relatime shared:60 - overlay overlay rw,lowerdir=/l2:/l1,upperdir=/u,workdir=/var/lib/stratum/b1/work
",
        )
        .expect("write failed");

        let parts = ProcMountInfo::new(&path).partitions().expect("read failed");
        assert_eq!(
            parts,
            vec![
                partition("ext4", "/"),
                partition("overlay", "/var/lib/stratum/b1"),
            ]
        );
    }

    #[test]
    fn enumerates_overlays_from_mountinfo_table() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("mountinfo");
        std::fs::write(
            &path,
            "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
98 22 0:51 / /var/lib/stratum/b1 rw,relatime shared:60 - overlay overlay rw,lowerdir=/l,upperdir=/u,workdir=/w
99 22 0:52 / /var/lib/other/b2 rw,relatime shared:61 - overlay overlay rw,lowerdir=/l,upperdir=/u,workdir=/w
",
        )
        .expect("write failed");

        let infos = build_mount_info_with(&ProcMountInfo::new(&path), "stratum", "b1", info_for);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].target, Path::new("/var/lib/stratum/b1"));
    }

    #[test]
    fn proc_is_a_mount_point_and_tempdirs_are_not() {
        assert!(is_mount_point(Path::new("/proc")).expect("mountinfo unreadable"));
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let plain = dir.path().join("plain");
        std::fs::create_dir(&plain).expect("mkdir failed");
        assert!(!is_mount_point(&plain).expect("mountinfo unreadable"));
    }
}
