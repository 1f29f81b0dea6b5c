//! `strat inspect` — Show the layer stack mounted at a target.

use clap::Args;
use stratum_common::config::StratumConfig;
use stratum_core::mountinfo::{SshRunner, mount_details, remote_mount_details};

use crate::output;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Mount point to look up.
    pub target: String,

    /// Query this remote host instead of the local mount table.
    #[arg(long)]
    pub host: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `inspect` command.
///
/// A target that is not mounted is reported, not treated as an error.
///
/// # Errors
///
/// Returns an error if the remote shell is misconfigured or output fails.
pub fn execute(config: &StratumConfig, args: &InspectArgs) -> anyhow::Result<()> {
    let info = match &args.host {
        Some(host) => remote_mount_details(&SshRunner::new(config)?, host, &args.target),
        None => mount_details(&args.target),
    };

    if let Some(info) = &info {
        tracing::debug!(%info, "overlay found");
    }
    match info {
        Some(info) if args.json => output::print_json(&info),
        Some(info) => {
            output::print_info(&info);
            Ok(())
        }
        None => {
            tracing::warn!(mount_point = %args.target, "no overlay mounted at target");
            Ok(())
        }
    }
}
