//! Recovering layer composition from the OS mount table.
//!
//! [`parser`] works on a single mount-table line and never touches the OS.
//! [`lookup`] obtains that line locally or from a remote host, and
//! [`enumerate`] scans every build mount on the host.

pub mod enumerate;
pub mod lookup;
pub mod parser;

pub use enumerate::{Partition, PartitionSource, ProcMountInfo, build_mount_info, is_mount_point};
pub use lookup::{CommandRunner, LocalShell, SshRunner, mount_details, remote_mount_details};
pub use parser::parse_mount_line;
