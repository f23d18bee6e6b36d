use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Trailing window kept from the update command's stdout and stderr.
pub const OUTPUT_TAIL_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub ok: bool,
    /// `None` when the process was terminated by a signal.
    pub returncode: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Last `n` characters of `s`.
pub fn tail_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    if count <= n {
        return s.to_string();
    }
    s.chars().skip(count - n).collect()
}

/// Run the external reindex job through a login shell and capture its output.
///
/// A non-zero exit is reported in the [`UpdateReport`]; only a failure to
/// spawn the process or hitting `timeout` is an error. The child is killed if
/// the timeout fires.
pub async fn run_update(config: &Config, timeout: Option<Duration>) -> Result<UpdateReport> {
    let mut cmd = Command::new(&config.shell);
    cmd.arg("-lc")
        .arg(&config.update_command)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    tracing::info!(shell = %config.shell, command = %config.update_command, "running update command");

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| anyhow!("update command timed out after {}ms", limit.as_millis()))?,
        None => cmd.output().await,
    }
    .with_context(|| format!("failed to run `{} -lc {}`", config.shell, config.update_command))?;

    let returncode = output.status.code();
    let report = UpdateReport {
        ok: output.status.success(),
        returncode,
        stdout: tail_chars(&String::from_utf8_lossy(&output.stdout), OUTPUT_TAIL_CHARS),
        stderr: tail_chars(&String::from_utf8_lossy(&output.stderr), OUTPUT_TAIL_CHARS),
    };
    if report.ok {
        tracing::info!("update command finished");
    } else {
        tracing::warn!(?returncode, "update command failed");
    }
    Ok(report)
}
