//! `strat probe` — Report which mount driver this host supports.

use stratum_common::config::StratumConfig;
use stratum_core::driver::MountDriver;
use stratum_core::probe;

/// Executes the `probe` command.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(config: &StratumConfig) -> anyhow::Result<()> {
    let driver = MountDriver::from_config(config);
    let index = probe::index_option(&config.index_param_path).unwrap_or("-");
    println!("driver: {}", driver.kind());
    println!("index option: {index}");
    Ok(())
}
