/// Backend surface: every data operation the shell performs, one async
/// method per operation.
///
/// This is the seam the UI layer talks through — the TUI never touches the
/// filesystem or spawns processes itself. Each call is single-shot: it
/// resolves once with a complete payload or an error, and the call site owns
/// its own failure handling. Calls are issued from spawned tasks; results
/// come back to the event loop as typed `UiEvent`s.
pub mod assist;
pub mod fsops;
pub mod pattern;
pub mod proc;
pub mod pyinspect;
pub mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::config::ResolvedConfig;
use crate::regexlab::MatchSpan;

// ── Shared payload types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct DirListing {
    pub items: Vec<DirEntry>,
    /// The path the listing was actually taken from ("." resolves to the
    /// workspace root).
    pub current_path: String,
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Bare file name, for the result header.
    pub file: String,
    /// Full path, for opening the hit.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// The matching line, trimmed.
    pub content: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ImportInfo {
    pub name: String,
    /// "stdlib", "installed", "missing", or "local".
    pub status: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FunctionMetric {
    pub name: String,
    pub line: u32,
    pub complexity: u32,
}

// ── Backend handle ────────────────────────────────────────────────────────────

pub struct Backend {
    /// Workspace root; "." and command working directories resolve here.
    pub root: PathBuf,
    pub shell: String,
    pub python: String,
    pub show_hidden: bool,
}

impl Backend {
    pub fn new(resolved: &ResolvedConfig) -> Arc<Self> {
        Arc::new(Self {
            root: resolved.root.clone(),
            shell: resolved.shell.clone(),
            python: resolved.python.clone(),
            show_hidden: resolved.show_hidden,
        })
    }

    /// Resolve "." (and relative paths) against the workspace root.
    fn resolve(&self, path: &str) -> PathBuf {
        if path == "." {
            self.root.clone()
        } else {
            let p = Path::new(path);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                self.root.join(p)
            }
        }
    }

    // ── File system ───────────────────────────────────────────────────────────

    pub async fn list_dir(&self, path: &str) -> Result<DirListing> {
        fsops::list_dir(&self.resolve(path), self.show_hidden).await
    }

    pub async fn read_file(&self, path: &str) -> Result<String> {
        fsops::read_file(&self.resolve(path)).await
    }

    pub async fn save_file(&self, path: &str, content: &str) -> Result<()> {
        fsops::save_file(&self.resolve(path), content).await
    }

    pub async fn create_item(&self, path: &str, is_dir: bool) -> Result<()> {
        fsops::create_item(&self.resolve(path), is_dir).await
    }

    pub async fn delete_item(&self, path: &str) -> Result<()> {
        fsops::delete_item(&self.resolve(path)).await
    }

    // ── Processes ─────────────────────────────────────────────────────────────

    pub async fn run_command(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        proc::run_command(&self.shell, command, cwd.unwrap_or(&self.root)).await
    }

    // ── Search ────────────────────────────────────────────────────────────────

    pub async fn search_in_files(&self, query: &str) -> Result<Vec<SearchHit>> {
        search::search_in_files(self.root.clone(), query.to_string()).await
    }

    // ── Pattern evaluation ────────────────────────────────────────────────────

    pub async fn test_pattern(&self, pattern: &str, subject: &str) -> Result<Vec<MatchSpan>> {
        pattern::evaluate(pattern, subject)
    }

    // ── Assistant ─────────────────────────────────────────────────────────────

    pub async fn ask_ai(&self, query: &str, context: &str, path: &str) -> Result<String> {
        // Simulate thinking, as the host assistant did.
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        Ok(assist::respond(query, context, path))
    }

    // ── Python inspection ─────────────────────────────────────────────────────

    pub async fn analyze_imports(&self, path: &str) -> Result<Vec<ImportInfo>> {
        pyinspect::analyze_imports(&self.python, &self.resolve(path)).await
    }

    pub async fn install_package(&self, name: &str) -> Result<()> {
        pyinspect::install_package(&self.python, name).await
    }

    pub async fn code_metrics(&self, path: &str) -> Result<Vec<FunctionMetric>> {
        pyinspect::code_metrics(&self.python, &self.resolve(path)).await
    }

    pub async fn bytecode(&self, path: &str) -> Result<String> {
        pyinspect::bytecode(&self.python, &self.resolve(path)).await
    }
}
