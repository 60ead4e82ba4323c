/// File-system operations behind the explorer, editor, and palette.
use std::path::Path;

use anyhow::{Context, Result};

use super::{DirEntry, DirListing};

/// List directory entries, directories first, then case-insensitive by name.
pub async fn list_dir(path: &Path, show_hidden: bool) -> Result<DirListing> {
    let mut reader = tokio::fs::read_dir(path)
        .await
        .with_context(|| format!("cannot list '{}'", path.display()))?;

    let mut items = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        items.push(DirEntry {
            path: entry.path().to_string_lossy().into_owned(),
            name,
            is_dir,
        });
    }

    items.sort_by(|a, b| {
        (!a.is_dir, a.name.to_lowercase()).cmp(&(!b.is_dir, b.name.to_lowercase()))
    });

    Ok(DirListing {
        items,
        current_path: path.to_string_lossy().into_owned(),
    })
}

pub async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read '{}'", path.display()))
}

pub async fn save_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("cannot write '{}'", path.display()))
}

/// Create an empty file or a directory (with parents).
pub async fn create_item(path: &Path, is_dir: bool) -> Result<()> {
    if is_dir {
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("cannot create directory '{}'", path.display()))
    } else {
        tokio::fs::write(path, "")
            .await
            .with_context(|| format!("cannot create file '{}'", path.display()))
    }
}

/// Delete a file, or a directory recursively.
pub async fn delete_item(path: &Path) -> Result<()> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("cannot stat '{}'", path.display()))?;
    if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
    .with_context(|| format!("cannot delete '{}'", path.display()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_puts_directories_first_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("Alpha")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();

        let listing = list_dir(dir.path(), false).await.unwrap();
        let names: Vec<&str> = listing.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn hidden_entries_respect_the_toggle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".hidden"), "").unwrap();
        std::fs::write(dir.path().join("shown.txt"), "").unwrap();

        let without = list_dir(dir.path(), false).await.unwrap();
        assert_eq!(without.items.len(), 1);

        let with = list_dir(dir.path(), true).await.unwrap();
        assert_eq!(with.items.len(), 2);
    }

    #[tokio::test]
    async fn read_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        save_file(&path, "hello\n").await.unwrap();
        assert_eq!(read_file(&path).await.unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn read_missing_file_reports_path() {
        let err = read_file(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not/here.txt"));
    }

    #[tokio::test]
    async fn create_and_delete_items() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("new.py");
        let sub = dir.path().join("nested/dir");

        create_item(&file, false).await.unwrap();
        assert!(file.exists());
        create_item(&sub, true).await.unwrap();
        assert!(sub.is_dir());

        delete_item(&file).await.unwrap();
        assert!(!file.exists());
        delete_item(&dir.path().join("nested")).await.unwrap();
        assert!(!sub.exists());
    }
}
