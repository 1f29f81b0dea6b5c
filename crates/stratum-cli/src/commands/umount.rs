//! `strat umount` — Tear down a merged target.

use std::path::PathBuf;

use clap::Args;
use stratum_common::config::StratumConfig;
use stratum_core::driver::{LayerMount, MountDriver};
use stratum_core::options::work_dir;

/// Arguments for the `umount` command.
#[derive(Args, Debug)]
pub struct UmountArgs {
    /// Mount point to detach.
    pub target: PathBuf,

    /// Also remove the overlay work directory after detaching.
    #[arg(long)]
    pub clean: bool,
}

/// Executes the `umount` command.
///
/// # Errors
///
/// Returns an error if the unmount or the requested cleanup fails.
pub fn execute(config: &StratumConfig, args: UmountArgs) -> anyhow::Result<()> {
    let driver = MountDriver::from_config(config);
    driver.unmount(&args.target)?;

    let work = work_dir(&args.target);
    if args.clean && work.exists() {
        std::fs::remove_dir_all(&work)?;
        tracing::info!(path = %work.display(), "work directory removed");
    }
    Ok(())
}
