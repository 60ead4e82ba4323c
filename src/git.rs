/// Git integration for Slate — status, staging, commits, restore.
///
/// A thin async wrapper over the `git` binary. Detection is fail-soft: a
/// workspace outside a repo (or a machine without git) simply hides the
/// source-control panel; git errors surface as panel text or notices, never
/// as panics.
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use tokio::process::Command;

// ── Data structures ───────────────────────────────────────────────────────────

/// One changed path from `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitChange {
    /// Two-character porcelain status code, e.g. " M", "??", "A ".
    pub status: String,
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct GitRepo {
    /// Absolute path to the repo root (the directory containing `.git/`).
    pub root: PathBuf,
}

// ── Constructor and detection ─────────────────────────────────────────────────

impl GitRepo {
    /// Open a `GitRepo` rooted at the repository containing `path`.
    /// Returns `None` if `path` is not inside a repo or git is not installed.
    pub async fn open(path: &Path) -> Option<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8(output.stdout).ok()?;
        Some(Self {
            root: PathBuf::from(root.trim()),
        })
    }
}

// ── Core operations ───────────────────────────────────────────────────────────

impl GitRepo {
    /// Working-tree changes, porcelain order.
    pub async fn status(&self) -> Result<Vec<GitChange>> {
        let out = self.run_git(&["status", "--porcelain"]).await?;
        Ok(parse_porcelain(&out))
    }

    /// Current branch name, or a short commit hash when detached.
    pub async fn branch(&self) -> Result<String> {
        let name = self.run_git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let name = name.trim();
        if name == "HEAD" {
            let hash = self.run_git(&["rev-parse", "--short", "HEAD"]).await?;
            Ok(hash.trim().to_string())
        } else {
            Ok(name.to_string())
        }
    }

    /// Stage the given paths.
    pub async fn stage(&self, paths: &[String]) -> Result<()> {
        let mut args = vec!["add"];
        args.extend(paths.iter().map(String::as_str));
        self.run_git(&args).await?;
        Ok(())
    }

    /// Stage everything under the repo root.
    pub async fn stage_all(&self) -> Result<()> {
        self.run_git(&["add", "."]).await?;
        Ok(())
    }

    /// Commit staged changes with the given message.
    pub async fn commit(&self, message: &str) -> Result<String> {
        self.run_git(&["commit", "-m", message]).await
    }

    /// Discard working-tree changes for the given paths.
    pub async fn restore(&self, paths: &[String]) -> Result<()> {
        let mut args = vec!["restore"];
        args.extend(paths.iter().map(String::as_str));
        self.run_git(&args).await?;
        Ok(())
    }

    async fn run_git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| anyhow!("failed to run git: {e}"))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(anyhow!("{}", stderr.trim()))
        }
    }
}

// ── Porcelain parsing ─────────────────────────────────────────────────────────

fn parse_porcelain(out: &str) -> Vec<GitChange> {
    out.lines()
        .filter(|line| line.len() >= 4)
        .map(|line| GitChange {
            status: line[..2].to_string(),
            file: line[3..].to_string(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porcelain_lines_split_into_status_and_file() {
        let out = " M src/main.rs\n?? notes.md\nA  new.py\n";
        let changes = parse_porcelain(out);
        assert_eq!(
            changes,
            vec![
                GitChange { status: " M".into(), file: "src/main.rs".into() },
                GitChange { status: "??".into(), file: "notes.md".into() },
                GitChange { status: "A ".into(), file: "new.py".into() },
            ]
        );
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(parse_porcelain("\nM\n").is_empty());
    }
}
