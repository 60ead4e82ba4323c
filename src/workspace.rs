/// Open-file/tab session state for the editor surface.
///
/// `Workspace` owns the ordered set of open files and the active selection.
/// It is a pure state machine: all file I/O happens elsewhere and lands here
/// through `apply_loaded` / `apply_load_error`, keyed by path so completions
/// arriving out of order for different files never cross slots.
///
/// Per-file lifecycle: a freshly opened entry has no content ("loading")
/// until a read completes; a failed read stores a visible error placeholder
/// so the editor pane always has something to render. `dirty` is set on
/// every edit and cleared only by a successful load or save.

// ── Extension tables ──────────────────────────────────────────────────────────

/// Extension → language tag. Lookup table rather than a conditional chain so
/// adding a language is a one-line change.
const LANGUAGES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("rs", "rust"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("toml", "toml"),
    ("md", "markdown"),
];

/// Extension → interpreter for the Run action. Anything not listed here is
/// not runnable and must produce a warning instead of a command.
const RUNNERS: &[(&str, &str)] = &[("py", "python"), ("js", "node")];

fn extension(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}

/// Language tag for a path, defaulting to "plaintext".
pub fn language_for(path: &str) -> &'static str {
    let ext = extension(path);
    LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or("plaintext")
}

/// Shell command that runs `path`, or `None` for unsupported file types.
pub fn run_command_for(path: &str) -> Option<String> {
    let ext = extension(path);
    RUNNERS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, runner)| format!("{runner} \"{path}\""))
}

// ── OpenFile ──────────────────────────────────────────────────────────────────

/// One path's in-memory editing session.
#[derive(Debug, Clone)]
pub struct OpenFile {
    /// Stable identity of the tab. Also the display-name source.
    pub path: String,
    /// Final path component, shown in the tab bar.
    pub name: String,
    /// `None` until a read completes — the pane renders a loading placeholder.
    pub content: Option<String>,
    pub language: &'static str,
    /// True iff edited since the last successful load or save.
    pub dirty: bool,
}

impl OpenFile {
    fn new(path: &str) -> Self {
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_string();
        Self {
            path: path.to_string(),
            name,
            content: None,
            language: language_for(path),
            dirty: false,
        }
    }
}

// ── Workspace (tab session) ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Workspace {
    /// Insertion order, no duplicates by path.
    files: Vec<OpenFile>,
    /// Invariant: `Some` iff `files` is non-empty, and always a member path.
    active: Option<String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[OpenFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_file(&self) -> Option<&OpenFile> {
        self.active.as_deref().and_then(|p| self.get(p))
    }

    pub fn get(&self, path: &str) -> Option<&OpenFile> {
        self.files.iter().find(|f| f.path == path)
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut OpenFile> {
        self.files.iter_mut().find(|f| f.path == path)
    }

    /// True when `path` is open but its content has not arrived yet.
    pub fn needs_load(&self, path: &str) -> bool {
        self.get(path).is_some_and(|f| f.content.is_none())
    }

    /// Open `path`, or re-activate it if already open. Idempotent: repeated
    /// opens never duplicate or reorder the tab sequence. Returns true when a
    /// new entry was created (the caller should kick off a content load).
    pub fn open(&mut self, path: &str) -> bool {
        let fresh = self.get(path).is_none();
        if fresh {
            self.files.push(OpenFile::new(path));
        }
        self.active = Some(path.to_string());
        fresh
    }

    /// Close `path`, discarding its content. Closing the active tab selects
    /// the tab that is now last in the remaining sequence; closing anything
    /// else (or an unknown path) leaves the selection untouched.
    pub fn close(&mut self, path: &str) {
        self.files.retain(|f| f.path != path);
        if self.active.as_deref() == Some(path) {
            self.active = self.files.last().map(|f| f.path.clone());
        }
    }

    /// Activate an already-open path. A path that is not open is a no-op.
    pub fn activate(&mut self, path: &str) {
        if self.get(path).is_some() {
            self.active = Some(path.to_string());
        }
    }

    /// Successful read completion: store content, reset dirty.
    pub fn apply_loaded(&mut self, path: &str, content: String) {
        if let Some(f) = self.get_mut(path) {
            f.content = Some(content);
            f.language = language_for(path);
            f.dirty = false;
        }
    }

    /// Failed read completion: store a visible placeholder so the editor
    /// surface has something to render instead of a stuck spinner.
    pub fn apply_load_error(&mut self, path: &str, error: &str) {
        if let Some(f) = self.get_mut(path) {
            f.content = Some(format!("// Error reading file: {error}"));
            f.dirty = false;
        }
    }

    /// Replace content for an open path and mark it dirty. Last write wins;
    /// a path that is not open is a no-op.
    pub fn edit(&mut self, path: &str, new_content: String) {
        if let Some(f) = self.get_mut(path) {
            f.content = Some(new_content);
            f.dirty = true;
        }
    }

    /// Successful save completion. A failed save must not call this — dirty
    /// state is preserved so the tab still shows unsaved work.
    pub fn mark_saved(&mut self, path: &str) {
        if let Some(f) = self.get_mut(path) {
            f.dirty = false;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_is_none_iff_empty() {
        let mut ws = Workspace::new();
        assert!(ws.active_path().is_none());

        ws.open("a.py");
        ws.open("b.js");
        assert!(ws.active_path().is_some());

        ws.close("a.py");
        ws.close("b.js");
        assert!(ws.is_empty());
        assert!(ws.active_path().is_none());
    }

    #[test]
    fn reopen_activates_without_duplicating_or_reordering() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.open("b.js");
        ws.open("c.md");
        ws.open("a.py");

        let order: Vec<&str> = ws.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["a.py", "b.js", "c.md"]);
        assert_eq!(ws.active_path(), Some("a.py"));
    }

    #[test]
    fn closing_active_selects_new_last() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.open("b.js");
        ws.open("c.md");
        assert_eq!(ws.active_path(), Some("c.md"));

        ws.close("c.md");
        assert_eq!(ws.active_path(), Some("b.js"));
    }

    #[test]
    fn closing_inactive_keeps_selection() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.open("b.js");
        ws.open("c.md");
        ws.activate("b.js");

        ws.close("a.py");
        assert_eq!(ws.active_path(), Some("b.js"));

        // Unknown path is a no-op
        ws.close("nope.txt");
        assert_eq!(ws.active_path(), Some("b.js"));
        assert_eq!(ws.files().len(), 2);
    }

    #[test]
    fn activate_absent_path_is_noop() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.activate("missing.rs");
        assert_eq!(ws.active_path(), Some("a.py"));
    }

    #[test]
    fn edits_are_last_write_wins() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.apply_loaded("a.py", "original".into());

        ws.edit("a.py", "x".into());
        ws.edit("a.py", "y".into());

        let f = ws.get("a.py").unwrap();
        assert!(f.dirty);
        assert_eq!(f.content.as_deref(), Some("y"));
    }

    #[test]
    fn edit_unopened_path_is_noop() {
        let mut ws = Workspace::new();
        ws.edit("ghost.py", "boo".into());
        assert!(ws.is_empty());
    }

    #[test]
    fn save_clears_dirty_only_on_success() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.apply_loaded("a.py", "original".into());
        ws.edit("a.py", "changed".into());
        assert!(ws.get("a.py").unwrap().dirty);

        // A failed save never reaches mark_saved — dirty survives.
        assert!(ws.get("a.py").unwrap().dirty);

        ws.mark_saved("a.py");
        assert!(!ws.get("a.py").unwrap().dirty);
        assert_eq!(ws.get("a.py").unwrap().content.as_deref(), Some("changed"));
    }

    #[test]
    fn load_completions_are_keyed_by_path() {
        let mut ws = Workspace::new();
        ws.open("a.py");
        ws.open("b.py");

        // Completions arrive in the opposite order from the opens.
        ws.apply_loaded("b.py", "content b".into());
        ws.apply_loaded("a.py", "content a".into());

        assert_eq!(ws.get("a.py").unwrap().content.as_deref(), Some("content a"));
        assert_eq!(ws.get("b.py").unwrap().content.as_deref(), Some("content b"));
    }

    #[test]
    fn load_error_stores_placeholder() {
        let mut ws = Workspace::new();
        ws.open("gone.py");
        ws.apply_load_error("gone.py", "No such file");

        let f = ws.get("gone.py").unwrap();
        assert_eq!(
            f.content.as_deref(),
            Some("// Error reading file: No such file")
        );
        assert!(!f.dirty);
    }

    #[test]
    fn open_load_edit_save_walkthrough() {
        let mut ws = Workspace::new();

        ws.open("src/main.py");
        assert!(ws.needs_load("src/main.py"));
        assert_eq!(ws.active_path(), Some("src/main.py"));

        ws.apply_loaded("src/main.py", "print('hi')\n".into());
        let f = ws.get("src/main.py").unwrap();
        assert_eq!(f.language, "python");
        assert!(!f.dirty);

        ws.edit("src/main.py", "print('hello')\n".into());
        assert!(ws.get("src/main.py").unwrap().dirty);

        ws.mark_saved("src/main.py");
        let f = ws.get("src/main.py").unwrap();
        assert!(!f.dirty);
        assert_eq!(f.content.as_deref(), Some("print('hello')\n"));
    }

    #[test]
    fn language_inference() {
        assert_eq!(language_for("src/main.rs"), "rust");
        assert_eq!(language_for("app.jsx"), "javascript");
        assert_eq!(language_for("notes.md"), "markdown");
        assert_eq!(language_for("data.bin"), "plaintext");
        assert_eq!(language_for("Makefile"), "plaintext");
        assert_eq!(language_for(".gitignore"), "plaintext");
    }

    #[test]
    fn run_command_derivation() {
        assert_eq!(run_command_for("a.py").as_deref(), Some("python \"a.py\""));
        assert_eq!(run_command_for("a.js").as_deref(), Some("node \"a.js\""));
        assert_eq!(run_command_for("a.txt"), None);
        assert_eq!(run_command_for("noext"), None);
    }
}
