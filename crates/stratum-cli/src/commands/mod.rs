//! CLI command definitions and dispatch.

pub mod inspect;
pub mod list;
pub mod mount;
pub mod probe;
pub mod umount;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stratum_common::config::StratumConfig;

/// stratum — overlay mounts for layered build directories.
#[derive(Parser, Debug)]
#[command(name = "strat", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file overriding host interface paths.
    #[arg(long, global = true, env = "STRATUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge layers onto a target directory.
    Mount(mount::MountArgs),
    /// Tear down a merged target.
    Umount(umount::UmountArgs),
    /// Show the layer stack mounted at a target.
    Inspect(inspect::InspectArgs),
    /// List every build mount on this host.
    List(list::ListArgs),
    /// Report which mount driver this host supports.
    Probe,
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => StratumConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => StratumConfig::default(),
    };

    match cli.command {
        Command::Mount(args) => mount::execute(&config, args),
        Command::Umount(args) => umount::execute(&config, args),
        Command::Inspect(args) => inspect::execute(&config, &args),
        Command::List(args) => list::execute(&config, &args),
        Command::Probe => probe::execute(&config),
    }
}
