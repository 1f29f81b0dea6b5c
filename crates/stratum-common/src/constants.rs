//! Kernel interface paths, overlay markers, and default settings.

/// Filesystem type name passed to `mount(2)` and reported by the mount table.
pub const OVERLAY_FS_TYPE: &str = "overlay";

/// Line in the filesystem-type registry announcing overlay support.
pub const OVERLAY_REGISTRY_ENTRY: &str = "nodev\toverlay";

/// Kernel registry of known filesystem types.
pub const DEFAULT_FILESYSTEMS_PATH: &str = "/proc/filesystems";

/// Present only when the overlay module understands the `index` parameter.
pub const DEFAULT_INDEX_PARAM_PATH: &str = "/sys/module/overlay/parameters/index";

/// Mount table of the calling process's mount namespace.
pub const DEFAULT_MOUNT_TABLE_PATH: &str = "/proc/self/mountinfo";

/// Option disabling overlay inode indexing.
pub const INDEX_OFF_OPTION: &str = "index=off";

/// Name of the overlay work directory created beneath the mount target.
pub const WORK_DIR_NAME: &str = "work";

/// Marker every build mount point carries in its path.
pub const BUILD_NAMESPACE: &str = "stratum";

/// Default command used to load the overlay kernel module.
pub const DEFAULT_MODULE_LOADER: &[&str] = &["modprobe", "overlay"];

/// Default command prefix used to reach remote hosts.
pub const DEFAULT_REMOTE_SHELL: &[&str] = &["ssh", "-o", "BatchMode=yes"];
