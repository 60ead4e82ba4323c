/// Workspace text search for the search panel.
///
/// A plain substring scan over text files, capped so pathological queries
/// stay cheap. The walk skips dependency and VCS directories.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::SearchHit;

/// Stop collecting once this many hits are found.
const MAX_RESULTS: usize = 50;

/// Only files with these extensions are scanned.
const TEXT_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "rs", "toml", "css", "html", "json", "md", "txt",
];

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &["node_modules", ".git", "target", "__pycache__"];

pub async fn search_in_files(root: PathBuf, query: String) -> Result<Vec<SearchHit>> {
    // The walk is synchronous std::fs — run it off the event loop.
    let hits = tokio::task::spawn_blocking(move || {
        let mut results = Vec::new();
        walk(&root, &query, &mut results);
        results
    })
    .await?;
    Ok(hits)
}

fn walk(dir: &Path, query: &str, results: &mut Vec<SearchHit>) {
    if results.len() >= MAX_RESULTS {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if results.len() >= MAX_RESULTS {
            return;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            if name.starts_with('.') || SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk(&path, query, results);
        } else if is_text_file(&path) {
            scan_file(&path, &name, query, results);
        }
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
}

fn scan_file(path: &Path, name: &str, query: &str, results: &mut Vec<SearchHit>) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return; // unreadable or not valid UTF-8 — skip quietly
    };
    if !content.contains(query) {
        return;
    }
    for (i, line) in content.lines().enumerate() {
        if line.contains(query) {
            results.push(SearchHit {
                file: name.to_string(),
                path: path.to_string_lossy().into_owned(),
                line: i + 1,
                content: line.trim().to_string(),
            });
            if results.len() >= MAX_RESULTS {
                return;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_lines_with_file_and_line_number() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.py"),
            "import os\n\ndef main():\n    print('needle')\n",
        )
        .unwrap();

        let hits = search_in_files(dir.path().to_path_buf(), "needle".into())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, "app.py");
        assert_eq!(hits[0].line, 4);
        assert_eq!(hits[0].content, "print('needle')");
    }

    #[tokio::test]
    async fn skips_non_text_files_and_vendor_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image.bin"), "needle").unwrap();
        let vendored = dir.path().join("node_modules");
        std::fs::create_dir(&vendored).unwrap();
        std::fs::write(vendored.join("dep.js"), "needle").unwrap();

        let hits = search_in_files(dir.path().to_path_buf(), "needle".into())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn result_count_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let many = "needle\n".repeat(200);
        std::fs::write(dir.path().join("big.txt"), many).unwrap();

        let hits = search_in_files(dir.path().to_path_buf(), "needle".into())
            .await
            .unwrap();
        assert_eq!(hits.len(), MAX_RESULTS);
    }
}
