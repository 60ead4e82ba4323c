/// Shell command execution for the terminal panel and the Run action.
use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use super::CommandOutput;

/// Commands are killed after this long. Interactive programs are not
/// supported by the panel anyway — there is no stdin plumbing.
const COMMAND_TIMEOUT_SECS: u64 = 120;

pub async fn run_command(shell: &str, command: &str, cwd: &Path) -> Result<CommandOutput> {
    let fut = Command::new(shell)
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .output();

    let output = match timeout(Duration::from_secs(COMMAND_TIMEOUT_SECS), fut).await {
        Ok(result) => result.with_context(|| format!("failed to run '{command}'"))?,
        Err(_) => {
            anyhow::bail!("timed out after {COMMAND_TIMEOUT_SECS}s — command did not complete")
        }
    };

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let out = run_command("sh", "echo hi", Path::new(".")).await.unwrap();
        assert_eq!(out.stdout, "hi\n");
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn captures_stderr_separately() {
        let out = run_command("sh", "echo oops >&2; exit 3", Path::new("."))
            .await
            .unwrap();
        assert!(out.stdout.is_empty());
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, 3);
    }

    #[tokio::test]
    async fn runs_in_the_given_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_command("sh", "pwd", dir.path()).await.unwrap();
        // Compare canonically — the temp dir may be behind a symlink.
        let reported = std::fs::canonicalize(out.stdout.trim()).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(reported, expected);
    }
}
