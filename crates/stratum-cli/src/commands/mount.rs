//! `strat mount` — Merge layers onto a target directory.

use std::path::PathBuf;

use clap::Args;
use stratum_common::config::StratumConfig;
use stratum_common::types::{LayerStack, MountRequest};
use stratum_core::driver::{LayerMount, MountDriver};

/// Arguments for the `mount` command.
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Writable upper layer.
    #[arg(long)]
    pub upper: PathBuf,

    /// Merged mount point.
    pub target: PathBuf,

    /// Read-only layers, base layer first.
    #[arg(required = true)]
    pub layers: Vec<PathBuf>,
}

/// Executes the `mount` command.
///
/// # Errors
///
/// Returns an error if the selected driver fails to mount.
pub fn execute(config: &StratumConfig, args: MountArgs) -> anyhow::Result<()> {
    let driver = MountDriver::from_config(config);
    let request = MountRequest::new(args.target, args.upper, LayerStack::new(args.layers));
    tracing::info!(
        driver = %driver.kind(),
        mount_point = %request.target.display(),
        layers = request.layers.len(),
        "mounting layers"
    );
    driver.mount(&request)?;
    Ok(())
}
