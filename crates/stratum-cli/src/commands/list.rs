//! `strat list` — List every build mount on this host.

use clap::Args;
use stratum_common::config::StratumConfig;
use stratum_core::mountinfo::build_mount_info;

use crate::output;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show mount points containing this substring.
    #[arg(default_value = "")]
    pub filter: String,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `list` command.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn execute(config: &StratumConfig, args: &ListArgs) -> anyhow::Result<()> {
    let infos = build_mount_info(config, &args.filter);
    if args.json {
        return output::print_json(&infos);
    }
    if infos.is_empty() {
        println!("No build mounts found.");
        return Ok(());
    }
    output::print_table(&infos);
    Ok(())
}
