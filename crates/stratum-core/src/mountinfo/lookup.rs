//! Mount-table queries against the local host or a remote one.
//!
//! Both paths run the same shell pipeline, `mount | grep -F -- <target>`,
//! and hand the matching line to [`parse_mount_line`]. Any failure along
//! the way means "not mounted" and yields `None`.

use std::process::Command;

use stratum_common::config::StratumConfig;
use stratum_common::error::{Result, StratumError};
use stratum_common::types::MountInfo;

use super::parser::parse_mount_line;

/// Executes shell commands on a host.
pub trait CommandRunner {
    /// Runs `command` on `host` and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits unsuccessfully.
    fn run(&self, host: &str, command: &str) -> Result<Vec<u8>>;
}

/// Runs commands through `sh -c` on this machine, ignoring the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalShell;

impl CommandRunner for LocalShell {
    fn run(&self, _host: &str, command: &str) -> Result<Vec<u8>> {
        let mut cmd = Command::new("sh");
        let _ = cmd.arg("-c").arg(command);
        capture(cmd, command)
    }
}

/// Runs commands on a remote host through the configured remote shell.
#[derive(Debug, Clone)]
pub struct SshRunner {
    shell: Vec<String>,
}

impl SshRunner {
    /// Creates a runner from the configured remote shell command prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::Config`] when the remote shell is empty.
    pub fn new(config: &StratumConfig) -> Result<Self> {
        if config.remote_shell.is_empty() {
            return Err(StratumError::Config {
                message: "remote_shell must name a program".into(),
            });
        }
        Ok(Self {
            shell: config.remote_shell.clone(),
        })
    }
}

impl CommandRunner for SshRunner {
    fn run(&self, host: &str, command: &str) -> Result<Vec<u8>> {
        let Some((program, args)) = self.shell.split_first() else {
            return Err(StratumError::Config {
                message: "remote_shell must name a program".into(),
            });
        };
        let mut cmd = Command::new(program);
        let _ = cmd.args(args).arg(host).arg(command);
        capture(cmd, command)
    }
}

fn capture(mut cmd: Command, command: &str) -> Result<Vec<u8>> {
    let output = cmd.output().map_err(|e| StratumError::Io {
        path: cmd.get_program().into(),
        source: e,
    })?;
    if !output.status.success() {
        return Err(StratumError::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
        });
    }
    Ok(output.stdout)
}

/// Looks up the overlay mounted at `target` on this host.
pub fn mount_details(target: &str) -> Option<MountInfo> {
    remote_mount_details(&LocalShell, "localhost", target)
}

/// Looks up the overlay mounted at `target` on `host`.
pub fn remote_mount_details<R>(runner: &R, host: &str, target: &str) -> Option<MountInfo>
where
    R: CommandRunner + ?Sized,
{
    if target.is_empty() {
        return None;
    }
    let target = normalize(target);
    let output = match runner.run(host, &mount_table_query(target)) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(host, mount_point = target, error = %e, "mount table query found nothing");
            return None;
        }
    };
    let text = String::from_utf8_lossy(&output);
    let line = select_line(&text, target)?;
    parse_mount_line(line, target)
}

/// Shell pipeline listing the mount-table lines that mention `target`.
#[must_use]
pub fn mount_table_query(target: &str) -> String {
    format!("mount | grep -F -- {}", shell_quote(target))
}

/// Picks the first line whose mount point is exactly `target`.
///
/// `grep` matches substrings, so `/builds/a` would also pull in
/// `/builds/ab`; only an exact mount-point match is accepted. Trailing
/// slashes are ignored on both sides.
pub fn select_line<'a>(output: &'a str, target: &str) -> Option<&'a str> {
    let wanted = normalize(target);
    output
        .lines()
        .find(|line| mount_point(line).is_some_and(|mp| normalize(mp) == wanted))
}

/// Extracts the mount point from `mount` output or `/proc/mounts` format.
fn mount_point(line: &str) -> Option<&str> {
    if let Some((_, rest)) = line.split_once(" on ") {
        if let Some((mp, _)) = rest.split_once(" type ") {
            return Some(mp);
        }
    }
    line.split_whitespace().nth(1)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
