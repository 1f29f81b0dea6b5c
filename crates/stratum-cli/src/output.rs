//! Formatted output helpers for CLI commands.

use serde::Serialize;
use stratum_common::types::MountInfo;

/// Prints one mount's layers, base layer first.
pub fn print_info(info: &MountInfo) {
    println!("target: {}", info.target.display());
    println!("upper:  {}", info.upper.display());
    for (depth, layer) in info.lowers.iter().enumerate() {
        println!("layer {depth:>3}: {}", layer.display());
    }
}

/// Prints a summary table of mounts.
pub fn print_table(infos: &[MountInfo]) {
    println!("{:<50} {:<40} {:>6}", "TARGET", "UPPER", "LAYERS");
    for info in infos {
        println!("{}", table_row(info));
    }
}

/// Serializes `value` as pretty JSON to stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn table_row(info: &MountInfo) -> String {
    format!(
        "{:<50} {:<40} {:>6}",
        info.target.display().to_string(),
        info.upper.display().to_string(),
        info.lowers.len()
    )
}
