//! Pushing through the system `git` binary.
//!
//! Shelling out inherits the user's credential helpers and SSH agent, which
//! libgit2 does not.

use std::env;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::GitError;

/// Default timeout for a push (2 minutes).
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default push timeout.
pub const PUSH_TIMEOUT_ENV_VAR: &str = "AUTOCOMMIT_PUSH_TIMEOUT";

/// Get the configured push timeout.
///
/// Reads from AUTOCOMMIT_PUSH_TIMEOUT if set, otherwise uses 120 seconds.
/// Logs a warning if the variable is set but not a number.
pub fn get_push_timeout() -> Duration {
    match env::var(PUSH_TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    PUSH_TIMEOUT_ENV_VAR, v, DEFAULT_PUSH_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS),
    }
}

/// Check that a `git` executable is on PATH.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Run `git push <remote> <branch>` inside `root`.
///
/// Terminal credential prompts are disabled so an unattended push fails
/// instead of hanging until the timeout.
pub async fn push(root: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    check_git_installed()?;

    let timeout_duration = get_push_timeout();
    let timeout_secs = timeout_duration.as_secs();
    debug!("Pushing {} to {} (timeout {}s)", branch, remote, timeout_secs);

    let output = timeout(
        timeout_duration,
        Command::new("git")
            .arg("push")
            .arg(remote)
            .arg(branch)
            .current_dir(root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| GitError::Timeout(timeout_secs))?
    .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::PushFailed {
            remote: remote.to_string(),
            branch: branch.to_string(),
            stderr,
        });
    }

    Ok(())
}
