/// Workspace session persistence.
///
/// One JSON file per workspace root in `$XDG_DATA_HOME/slate/sessions/`,
/// recording which tabs were open and which was active. Contents are never
/// persisted — unsaved edits die with the process, and files are re-read
/// from disk on restore.
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ── WorkspaceSession ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSession {
    /// Absolute workspace root this session belongs to.
    pub root: String,
    /// Open tab paths in insertion order.
    pub open_paths: Vec<String>,
    /// The active tab, if any. Must be a member of `open_paths`.
    pub active: Option<String>,
    /// Unix timestamp (seconds) of the last save.
    pub saved_at: i64,
}

// ── Directory helpers ─────────────────────────────────────────────────────────

pub fn sessions_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".local/share")
        })
        .join("slate/sessions")
}

fn root_basename(root: &Path) -> &str {
    root.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("workspace")
}

/// FNV-1a 32-bit hash of the full root path, as 8 hex chars. Two workspaces
/// with the same basename must not share a session file.
fn root_hash(root: &Path) -> String {
    let mut h: u32 = 2166136261;
    for b in root.to_string_lossy().bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    format!("{h:08x}")
}

fn session_file(root: &Path) -> PathBuf {
    sessions_dir().join(format!("{}-{}.json", root_basename(root), root_hash(root)))
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Load the session recorded for `root`, if one exists and parses.
pub fn load_for(root: &Path) -> Option<WorkspaceSession> {
    let raw = std::fs::read_to_string(session_file(root)).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Persist the current open-tab set for `root`.
pub fn save(root: &Path, open_paths: Vec<String>, active: Option<String>) -> Result<()> {
    let dir = sessions_dir();
    std::fs::create_dir_all(&dir)?;
    let session = WorkspaceSession {
        root: root.to_string_lossy().into_owned(),
        open_paths,
        active,
        saved_at: chrono::Utc::now().timestamp(),
    };
    let raw = serde_json::to_string_pretty(&session)?;
    std::fs::write(session_file(root), raw)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_basename_different_roots_get_distinct_files() {
        let a = session_file(Path::new("/home/one/project"));
        let b = session_file(Path::new("/home/two/project"));
        assert_ne!(a, b);
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = WorkspaceSession {
            root: "/tmp/ws".to_string(),
            open_paths: vec!["/tmp/ws/a.py".to_string(), "/tmp/ws/b.js".to_string()],
            active: Some("/tmp/ws/a.py".to_string()),
            saved_at: 1_700_000_000,
        };
        let raw = serde_json::to_string(&session).unwrap();
        let back: WorkspaceSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.open_paths, session.open_paths);
        assert_eq!(back.active, session.active);
    }
}
