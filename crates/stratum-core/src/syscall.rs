//! Thin wrappers over `mount(2)` and `umount2(2)`.

use std::path::Path;

use nix::mount::{MntFlags, MsFlags};

/// Flags used by every unmount: detach even when the mount is busy.
pub const UNMOUNT_FLAGS: MntFlags = MntFlags::MNT_FORCE.union(MntFlags::MNT_DETACH);

/// Returns whether `flags` describe a read-only bind mount.
///
/// The kernel ignores `MS_RDONLY` on the initial bind, so such mounts need a
/// follow-up remount.
#[must_use]
pub const fn needs_readonly_remount(flags: MsFlags) -> bool {
    flags.contains(MsFlags::MS_BIND) && flags.contains(MsFlags::MS_RDONLY)
}

/// Mounts `source` on `target`.
///
/// Read-only bind mounts are remounted with `MS_REMOUNT` so the read-only
/// flag takes effect.
///
/// # Errors
///
/// Returns the kernel error of whichever `mount(2)` call failed.
pub fn mount_fs(
    source: &str,
    target: &Path,
    fstype: Option<&str>,
    flags: MsFlags,
    data: Option<&str>,
) -> nix::Result<()> {
    nix::mount::mount(Some(source), target, fstype, flags, data)?;
    if needs_readonly_remount(flags) {
        nix::mount::mount(
            Some(source),
            target,
            fstype,
            flags | MsFlags::MS_REMOUNT,
            data,
        )?;
    }
    Ok(())
}

/// Bind-mounts `source` onto `target`, optionally read-only.
///
/// # Errors
///
/// Returns the kernel error if either mount call fails.
pub fn bind_mount(source: &Path, target: &Path, readonly: bool) -> nix::Result<()> {
    let mut flags = MsFlags::MS_BIND;
    if readonly {
        flags |= MsFlags::MS_RDONLY;
    }
    tracing::debug!(
        source = %source.display(),
        mount_point = %target.display(),
        readonly,
        "creating bind mount"
    );
    let source = source.to_string_lossy();
    mount_fs(&source, target, None, flags, None)
}

/// Force-detaches whatever is mounted on `target`.
///
/// # Errors
///
/// Returns the kernel error if `umount2(2)` fails.
pub fn force_unmount(target: &Path) -> nix::Result<()> {
    nix::mount::umount2(target, UNMOUNT_FLAGS)
}
