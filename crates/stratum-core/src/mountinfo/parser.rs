//! Mount-table line parser.
//!
//! Only overlay entries carry the `lowerdir=`/`upperdir=` markers; any other
//! line is reported as not found.

use std::path::PathBuf;

use stratum_common::types::{LayerStack, MountInfo};

const UPPERDIR_MARKER: &str = ",upperdir=";
const LOWERDIR_KEY: &str = "lowerdir=";
const WORKDIR_MARKER: &str = ",workdir=";

/// Parses one mount-table line describing the overlay mounted at `target`.
///
/// Returns `None` when the line does not mention `target` or is not an
/// overlay entry. The lower layers come back bottom-to-top, undoing the
/// reversal applied when the mount options were built.
pub fn parse_mount_line(line: &str, target: &str) -> Option<MountInfo> {
    if !line.contains(target) {
        return None;
    }

    let (head, tail) = line.split_once(UPPERDIR_MARKER)?;
    let lowerdir = lowerdir_field(head)?;
    if lowerdir.is_empty() {
        return None;
    }
    let upper = tail
        .split_once(WORKDIR_MARKER)
        .map_or(tail, |(upper, _)| upper)
        .trim();

    Some(MountInfo {
        target: PathBuf::from(target),
        upper: PathBuf::from(upper),
        lowers: LayerStack::from_kernel_order(lowerdir.split(':')),
    })
}

/// Finds the value of the `lowerdir=` option inside the text preceding
/// `,upperdir=`.
///
/// The key must start an option, so a path that merely ends in `lowerdir=`
/// is not mistaken for it. The kernel escapes commas inside option values,
/// so the value ends at the next comma.
fn lowerdir_field(head: &str) -> Option<&str> {
    let start = head
        .match_indices(LOWERDIR_KEY)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            head[..idx]
                .chars()
                .next_back()
                .is_none_or(|c| c == ',' || c == '(' || c.is_whitespace())
        })?;
    let value = &head[start + LOWERDIR_KEY.len()..];
    Some(value.split_once(',').map_or(value, |(lower, _)| lower))
}
