//! Global configuration model for the stratum mount drivers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, StratumError};

/// Host interface settings consulted by the probe, drivers, and lookups.
///
/// Every field has a default matching a stock Linux host, so a partial
/// JSON document only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratumConfig {
    /// Registry of filesystem types known to the kernel.
    pub filesystems_path: PathBuf,
    /// Overlay `index` kernel parameter file.
    pub index_param_path: PathBuf,
    /// Mount table scanned when enumerating build mounts.
    pub mount_table_path: PathBuf,
    /// Command (program followed by arguments) that loads the overlay module.
    /// An empty list skips the load attempt.
    pub module_loader: Vec<String>,
    /// Substring every build mount point must contain.
    pub build_namespace: String,
    /// Command prefix used to run queries on a remote host.
    pub remote_shell: Vec<String>,
}

impl Default for StratumConfig {
    fn default() -> Self {
        Self {
            filesystems_path: PathBuf::from(constants::DEFAULT_FILESYSTEMS_PATH),
            index_param_path: PathBuf::from(constants::DEFAULT_INDEX_PARAM_PATH),
            mount_table_path: PathBuf::from(constants::DEFAULT_MOUNT_TABLE_PATH),
            module_loader: to_owned_args(constants::DEFAULT_MODULE_LOADER),
            build_namespace: constants::BUILD_NAMESPACE.to_string(),
            remote_shell: to_owned_args(constants::DEFAULT_REMOTE_SHELL),
        }
    }
}

impl StratumConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// names an empty remote shell.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| StratumError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::Config`] when the remote shell or build
    /// namespace is empty.
    pub fn validate(&self) -> Result<()> {
        if self.remote_shell.is_empty() {
            return Err(StratumError::Config {
                message: "remote_shell must name a program".into(),
            });
        }
        if self.build_namespace.is_empty() {
            return Err(StratumError::Config {
                message: "build_namespace cannot be empty".into(),
            });
        }
        Ok(())
    }
}

fn to_owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}
