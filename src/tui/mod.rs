/// Ratatui-based shell for Slate.
///
/// Architecture:
///   main thread:   event loop — crossterm keyboard events + mpsc UiEvent drain
///   backend tasks: tokio::spawn per operation — results flow back as UiEvents
///
/// Layout:
///   ┌──────┬───────────────────────────────────────────┐
///   │ side │  tab bar                                  │
///   │ bar  ├───────────────────────────┬───────────────┤
///   │      │  editor pane              │  tool panel   │
///   │      ├───────────────────────────┴───────────────┤
///   │      │  terminal panel                           │
///   ├──────┴───────────────────────────────────────────┤
///   │  status bar                                      │
///   └──────────────────────────────────────────────────┘
pub mod ai_view;
pub mod editor;
pub mod git_view;
pub mod overlays;
pub mod regex_view;
pub mod render;
pub mod search_view;
pub mod sidebar;
pub mod terminal_view;
pub mod tools_view;

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::backend::{
    Backend, CommandOutput, DirEntry, DirListing, FunctionMetric, ImportInfo, SearchHit,
};
use crate::config::{ConfigFile, ResolvedConfig};
use crate::git::{GitChange, GitRepo};
use crate::regexlab::{MatchSpan, RegexLab};
use crate::session;
use crate::term::TerminalSession;
use crate::workspace::{Workspace, run_command_for};

// ── UiEvent — typed results from backend tasks → event loop ──────────────────

#[derive(Debug)]
pub enum UiEvent {
    /// Directory listing for the explorer (root load or node expansion).
    ExplorerDir { path: String, result: Result<DirListing, String> },
    /// Top-level file list for the quick-open palette.
    PaletteFiles { result: Result<DirListing, String> },
    /// File content for an open tab.
    FileLoaded { path: String, result: Result<String, String> },
    /// Save completion for an open tab.
    FileSaved { path: String, result: Result<(), String> },
    /// create_item finished — `parent` is the directory to re-list.
    ItemCreated { parent: String, result: Result<(), String> },
    /// delete_item finished — `parent` is the directory to re-list.
    ItemDeleted { parent: String, path: String, result: Result<(), String> },
    /// A terminal (or Run) command finished.
    CommandDone { result: Result<CommandOutput, String> },
    /// Workspace search finished.
    SearchDone { result: Result<Vec<SearchHit>, String> },
    /// Pattern evaluation finished. Stale generations are dropped on apply.
    PatternTested { generation: u64, result: Result<Vec<MatchSpan>, String> },
    /// Assistant reply.
    AiReply { result: Result<String, String> },
    /// `git status` refresh.
    GitStatus { result: Result<Vec<GitChange>, String> },
    /// Branch name for the status bar.
    GitBranch { branch: String },
    /// A git mutation (stage/commit/restore) finished.
    GitActionDone { action: &'static str, result: Result<(), String> },
    /// Import analysis for the active Python file.
    ImportsAnalyzed { result: Result<Vec<ImportInfo>, String> },
    /// pip install finished.
    PackageInstalled { name: String, result: Result<(), String> },
    /// Cyclomatic metrics for the active Python file.
    MetricsReady { result: Result<Vec<FunctionMetric>, String> },
    /// Disassembly for the active Python file.
    BytecodeReady { result: Result<String, String> },
}

type UiTx = mpsc::UnboundedSender<UiEvent>;

// ── Modal / focus state ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Palette,  // Ctrl+P quick open
    Settings, // Ctrl+O settings overlay
    Prompt,   // name input / confirmation
}

/// Which surface receives plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Sidebar,
    Terminal,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarView {
    Explorer,
    Search,
    Git,
    Assist,
    Tools,
}

impl SidebarView {
    pub const ALL: [SidebarView; 5] = [
        SidebarView::Explorer,
        SidebarView::Search,
        SidebarView::Git,
        SidebarView::Assist,
        SidebarView::Tools,
    ];
}

/// Right-hand tool panel contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Regex,
    Metrics,
    Imports,
    Bytecode,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Regex,
        ToolKind::Metrics,
        ToolKind::Imports,
        ToolKind::Bytecode,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ToolKind::Regex => "Regex Lab",
            ToolKind::Metrics => "Code X-Ray",
            ToolKind::Imports => "Import Lens",
            ToolKind::Bytecode => "Bytecode Viewer",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            ToolKind::Regex => "Test regex patterns",
            ToolKind::Metrics => "Analyze code complexity",
            ToolKind::Imports => "Manage dependencies",
            ToolKind::Bytecode => "View Python bytecode",
        }
    }

    /// Tools that only make sense against a Python file.
    pub fn needs_python_file(self) -> bool {
        !matches!(self, ToolKind::Regex)
    }
}

// ── Notices ───────────────────────────────────────────────────────────────────

const NOTICE_TTL_SECS: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub at: Instant,
}

// ── Explorer state ────────────────────────────────────────────────────────────

pub struct ExplorerNode {
    pub entry: DirEntry,
    pub depth: usize,
    pub expanded: bool,
}

#[derive(Default)]
pub struct ExplorerState {
    pub nodes: Vec<ExplorerNode>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl ExplorerState {
    /// Install a listing: the root listing replaces everything; a node
    /// listing replaces that node's subtree.
    pub fn apply_listing(&mut self, root: &str, path: &str, items: Vec<DirEntry>) {
        self.loading = false;
        self.error = None;
        if path == root {
            self.nodes = items
                .into_iter()
                .map(|entry| ExplorerNode { entry, depth: 0, expanded: false })
                .collect();
            self.selected = self.selected.min(self.nodes.len().saturating_sub(1));
            return;
        }
        let Some(idx) = self.nodes.iter().position(|n| n.entry.path == path) else {
            return; // parent collapsed (or re-rooted) while the listing was in flight
        };
        let depth = self.nodes[idx].depth;
        self.remove_children(idx);
        self.nodes[idx].expanded = true;
        let children = items.into_iter().map(|entry| ExplorerNode {
            entry,
            depth: depth + 1,
            expanded: false,
        });
        self.nodes.splice(idx + 1..idx + 1, children);
    }

    pub fn collapse(&mut self, idx: usize) {
        self.remove_children(idx);
        self.nodes[idx].expanded = false;
    }

    fn remove_children(&mut self, idx: usize) {
        let depth = self.nodes[idx].depth;
        let end = self.nodes[idx + 1..]
            .iter()
            .position(|n| n.depth <= depth)
            .map(|off| idx + 1 + off)
            .unwrap_or(self.nodes.len());
        self.nodes.drain(idx + 1..end);
        self.selected = self.selected.min(self.nodes.len().saturating_sub(1));
    }
}

// ── Palette state ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct PaletteState {
    /// Top-level files gathered when the palette opened.
    pub files: Vec<DirEntry>,
    pub query: String,
    pub selected: usize,
    pub loading: bool,
}

impl PaletteState {
    pub fn filtered(&self) -> Vec<&DirEntry> {
        let q = self.query.to_lowercase();
        self.files
            .iter()
            .filter(|f| {
                q.is_empty()
                    || f.name.to_lowercase().contains(&q)
                    || f.path.to_lowercase().contains(&q)
            })
            .collect()
    }
}

// ── Search panel state ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Input,
    Results,
}

pub struct SearchState {
    pub input: TextArea<'static>,
    pub focus: SearchFocus,
    pub results: Vec<SearchHit>,
    pub selected: usize,
    pub loading: bool,
    /// True once a search ran, so "no results" can be told from "not asked".
    pub searched: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        let mut input = TextArea::default();
        input.set_placeholder_text("Search");
        Self {
            input,
            focus: SearchFocus::Input,
            results: Vec::new(),
            selected: 0,
            loading: false,
            searched: false,
        }
    }
}

// ── Git panel state ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GitFocus {
    #[default]
    List,
    Message,
}

pub struct GitState {
    pub changes: Vec<GitChange>,
    pub selected: usize,
    pub message: TextArea<'static>,
    pub focus: GitFocus,
    pub error: Option<String>,
    pub loading: bool,
}

impl Default for GitState {
    fn default() -> Self {
        let mut message = TextArea::default();
        message.set_placeholder_text("Message (Enter to commit)");
        Self {
            changes: Vec::new(),
            selected: 0,
            message,
            focus: GitFocus::List,
            error: None,
            loading: false,
        }
    }
}

// ── Assistant panel state ─────────────────────────────────────────────────────

pub enum AssistEntry {
    Question(String),
    Answer(String),
    Failure(String),
}

pub struct AssistState {
    pub entries: Vec<AssistEntry>,
    pub input: TextArea<'static>,
    pub thinking: bool,
}

impl Default for AssistState {
    fn default() -> Self {
        let mut input = TextArea::default();
        input.set_placeholder_text("Ask the assistant");
        Self {
            entries: Vec::new(),
            input,
            thinking: false,
        }
    }
}

// ── Tools state ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub enum ToolData<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Default)]
pub struct ToolsState {
    /// Highlighted row in the tools list.
    pub selected: usize,
    pub metrics: ToolData<Vec<FunctionMetric>>,
    pub imports: ToolData<Vec<ImportInfo>>,
    pub imports_selected: usize,
    /// Package currently being installed from the import lens.
    pub installing: Option<String>,
    pub bytecode: ToolData<String>,
    pub bytecode_scroll: usize,
}

// ── Regex lab panel state (widgets; the tester state lives in RegexLab) ───────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegexField {
    #[default]
    Pattern,
    Subject,
}

pub struct RegexPanelState {
    pub pattern: TextArea<'static>,
    pub subject: TextArea<'static>,
    pub focus: RegexField,
}

impl RegexPanelState {
    fn from_lab(lab: &RegexLab) -> Self {
        let mut pattern = TextArea::new(vec![lab.pattern().to_string()]);
        pattern.set_placeholder_text(r"e.g. \b\w+\b");
        let subject = TextArea::new(lab.subject().lines().map(String::from).collect());
        Self {
            pattern,
            subject,
            focus: RegexField::Pattern,
        }
    }
}

// ── Prompt overlay ────────────────────────────────────────────────────────────

pub enum PromptKind {
    NewFile,
    NewDir,
    ConfirmDelete { path: String },
    ConfirmDiscard { file: String },
    EditShell,
    EditPython,
}

pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    pub title: String,
}

// ── Settings overlay ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SettingsOverlayState {
    pub selected: usize, // 0 tab width, 1 show hidden, 2 shell, 3 python
}

pub const SETTINGS_ROWS: usize = 4;

// ── AppState ──────────────────────────────────────────────────────────────────

pub struct AppState {
    pub workspace: Workspace,
    pub editor: editor::EditorPane,
    pub term: TerminalSession,
    pub term_visible: bool,
    pub term_scroll: usize,
    pub pending_command: Option<String>,
    pub regexlab: RegexLab,
    pub regex_panel: RegexPanelState,

    pub mode: Mode,
    pub focus: Focus,
    pub sidebar_visible: bool,
    pub sidebar_view: SidebarView,
    pub right_panel: Option<ToolKind>,

    pub explorer: ExplorerState,
    pub palette: PaletteState,
    pub search: SearchState,
    pub git: GitState,
    pub assist: AssistState,
    pub tools: ToolsState,
    pub prompt: Option<PromptState>,
    pub settings_overlay: SettingsOverlayState,

    pub notice: Option<Notice>,
    pub repo: Option<GitRepo>,
    pub branch: Option<String>,

    pub config: ConfigFile,
    pub resolved: ResolvedConfig,
    pub backend: Arc<Backend>,
    ui_tx: UiTx,
}

impl AppState {
    fn new(
        config: ConfigFile,
        resolved: ResolvedConfig,
        backend: Arc<Backend>,
        ui_tx: UiTx,
    ) -> Self {
        let regexlab = RegexLab::new();
        let regex_panel = RegexPanelState::from_lab(&regexlab);
        Self {
            workspace: Workspace::new(),
            editor: editor::EditorPane::new(),
            term: TerminalSession::new(),
            term_visible: true,
            term_scroll: 0,
            pending_command: None,
            regexlab,
            regex_panel,
            mode: Mode::Normal,
            focus: Focus::Editor,
            sidebar_visible: true,
            sidebar_view: SidebarView::Explorer,
            right_panel: None,
            explorer: ExplorerState::default(),
            palette: PaletteState::default(),
            search: SearchState::default(),
            git: GitState::default(),
            assist: AssistState::default(),
            tools: ToolsState::default(),
            prompt: None,
            settings_overlay: SettingsOverlayState::default(),
            notice: None,
            repo: None,
            branch: None,
            config,
            resolved,
            backend,
            ui_tx,
        }
    }

    pub fn root_str(&self) -> String {
        self.resolved.root.to_string_lossy().into_owned()
    }

    fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
            at: Instant::now(),
        });
    }

    /// Persist the open-tab set. Best-effort: a failed write is invisible.
    fn persist_session(&self) {
        let paths = self
            .workspace
            .files()
            .iter()
            .map(|f| f.path.clone())
            .collect();
        let active = self.workspace.active_path().map(String::from);
        let _ = session::save(&self.resolved.root, paths, active);
    }

    // ── Backend task spawns ───────────────────────────────────────────────────

    fn spawn_explorer_list(&mut self, path: String) {
        self.explorer.loading = true;
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_dir(&path).await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::ExplorerDir { path, result });
        });
    }

    fn spawn_palette_list(&mut self) {
        self.palette.loading = true;
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_dir(".").await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::PaletteFiles { result });
        });
    }

    fn spawn_load(&self, path: String) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend.read_file(&path).await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::FileLoaded { path, result });
        });
    }

    fn spawn_save(&self, path: String, content: String) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .save_file(&path, &content)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::FileSaved { path, result });
        });
    }

    fn spawn_create(&self, parent: String, path: String, is_dir: bool) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .create_item(&path, is_dir)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::ItemCreated { parent, result });
        });
    }

    fn spawn_delete(&self, parent: String, path: String) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .delete_item(&path)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::ItemDeleted { parent, path, result });
        });
    }

    /// Dispatch a command to the shell. Deliberately not guarded: a manual
    /// entry may race a pending Run command (see term.rs).
    fn spawn_command(&self, command: String) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .run_command(&command, None)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::CommandDone { result });
        });
    }

    fn spawn_search(&mut self, query: String) {
        self.search.loading = true;
        self.search.searched = true;
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .search_in_files(&query)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::SearchDone { result });
        });
    }

    fn spawn_pattern_test(&self, generation: u64, pattern: String, subject: String) {
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .test_pattern(&pattern, &subject)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::PatternTested { generation, result });
        });
    }

    fn spawn_ask_ai(&mut self, query: String) {
        self.assist.thinking = true;
        let (context, path) = match self.workspace.active_file() {
            Some(f) => (
                f.content.clone().unwrap_or_default(),
                f.path.clone(),
            ),
            None => (String::new(), String::new()),
        };
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .ask_ai(&query, &context, &path)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::AiReply { result });
        });
    }

    fn spawn_git_status(&mut self) {
        let Some(repo) = self.repo.clone() else { return };
        self.git.loading = true;
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = repo.status().await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::GitStatus { result });
        });
    }

    fn spawn_git_action(
        &self,
        action: &'static str,
        run: impl std::future::Future<Output = Result<()>> + Send + 'static,
    ) {
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = run.await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::GitActionDone { action, result });
        });
    }

    /// Kick off the fetch behind a Python tool panel, or record the
    /// not-a-Python-file error without issuing any call.
    fn open_tool(&mut self, tool: ToolKind) {
        self.right_panel = Some(tool);
        self.focus = Focus::Panel;

        if !tool.needs_python_file() {
            // First open of the lab evaluates the sample pair.
            if tool == ToolKind::Regex && self.regexlab.matches().is_empty() {
                self.regexlab.arm(Instant::now());
            }
            return;
        }
        let active = self
            .workspace
            .active_path()
            .filter(|p| p.ends_with(".py"))
            .map(String::from);
        let Some(path) = active else {
            let msg = "Please select a Python file.".to_string();
            match tool {
                ToolKind::Metrics => self.tools.metrics = ToolData::Failed(msg),
                ToolKind::Imports => self.tools.imports = ToolData::Failed(msg),
                ToolKind::Bytecode => self.tools.bytecode = ToolData::Failed(msg),
                ToolKind::Regex => {}
            }
            return;
        };

        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        match tool {
            ToolKind::Metrics => {
                self.tools.metrics = ToolData::Loading;
                tokio::spawn(async move {
                    let result = backend.code_metrics(&path).await.map_err(|e| e.to_string());
                    let _ = tx.send(UiEvent::MetricsReady { result });
                });
            }
            ToolKind::Imports => {
                self.tools.imports = ToolData::Loading;
                self.tools.imports_selected = 0;
                tokio::spawn(async move {
                    let result = backend
                        .analyze_imports(&path)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(UiEvent::ImportsAnalyzed { result });
                });
            }
            ToolKind::Bytecode => {
                self.tools.bytecode = ToolData::Loading;
                self.tools.bytecode_scroll = 0;
                tokio::spawn(async move {
                    let result = backend.bytecode(&path).await.map_err(|e| e.to_string());
                    let _ = tx.send(UiEvent::BytecodeReady { result });
                });
            }
            ToolKind::Regex => {}
        }
    }

    fn spawn_install(&mut self, name: String) {
        self.tools.installing = Some(name.clone());
        let backend = self.backend.clone();
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .install_package(&name)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::PackageInstalled { name, result });
        });
    }

    // ── High-level actions ────────────────────────────────────────────────────

    /// Open a file tab (idempotent) and load its content if it is new.
    pub fn open_file(&mut self, path: &str) {
        let fresh = self.workspace.open(path);
        if fresh || self.workspace.needs_load(path) {
            self.spawn_load(path.to_string());
        }
        self.editor.sync(&self.workspace, self.resolved.tab_width);
        self.persist_session();
    }

    fn close_active_tab(&mut self) {
        if let Some(path) = self.workspace.active_path().map(String::from) {
            self.workspace.close(&path);
            self.editor.sync(&self.workspace, self.resolved.tab_width);
            self.persist_session();
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let files = self.workspace.files();
        if files.is_empty() {
            return;
        }
        let idx = self
            .workspace
            .active_path()
            .and_then(|p| files.iter().position(|f| f.path == p))
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % files.len()
        } else {
            (idx + files.len() - 1) % files.len()
        };
        let path = files[next].path.clone();
        self.workspace.activate(&path);
        if self.workspace.needs_load(&path) {
            self.spawn_load(path);
        }
        self.editor.sync(&self.workspace, self.resolved.tab_width);
        self.persist_session();
    }

    fn save_active(&mut self) {
        let Some(file) = self.workspace.active_file() else {
            return;
        };
        let Some(content) = file.content.clone() else {
            return; // still loading — nothing meaningful to write yet
        };
        self.spawn_save(file.path.clone(), content);
    }

    /// The Run action: derive a command from the active file's extension and
    /// feed it to the terminal as a pending command. Unsupported types warn
    /// and dispatch nothing.
    fn run_active(&mut self) {
        let Some(path) = self.workspace.active_path() else {
            return;
        };
        match run_command_for(path) {
            Some(command) => {
                self.pending_command = Some(command);
                self.term_visible = true;
                self.consume_pending_command();
            }
            None => {
                self.notify(NoticeKind::Info, "Unknown file type for running");
            }
        }
    }

    /// Consume the injected command exactly once: echo it, dispatch it, and
    /// clear the slot so redraws cannot resubmit it.
    fn consume_pending_command(&mut self) {
        if !self.term_visible {
            return;
        }
        if let Some(command) = self.pending_command.take() {
            self.term.inject(&command);
            self.term_scroll = 0;
            self.spawn_command(command);
        }
    }

    fn open_palette(&mut self) {
        self.palette = PaletteState::default();
        self.spawn_palette_list();
        self.mode = Mode::Palette;
    }

    /// Re-apply edited settings: persist, rebuild the backend handle, and
    /// refresh surfaces whose behavior they change.
    fn apply_settings(&mut self) {
        self.resolved.tab_width = self.config.tab_width;
        self.resolved.show_hidden = self.config.show_hidden;
        self.resolved.shell = self.config.shell.clone();
        self.resolved.python = self.config.python.clone();
        self.backend = Backend::new(&self.resolved);
        if let Err(e) = self.config.save() {
            self.notify(NoticeKind::Error, format!("Failed to save settings: {e}"));
        }
        let root = self.root_str();
        self.spawn_explorer_list(root);
    }

    // ── Async result application ──────────────────────────────────────────────

    fn apply_event(&mut self, ev: UiEvent) {
        match ev {
            UiEvent::ExplorerDir { path: _, result } => match result {
                Ok(listing) => {
                    let root = self.root_str();
                    self.explorer
                        .apply_listing(&root, &listing.current_path, listing.items);
                }
                Err(e) => {
                    self.explorer.loading = false;
                    self.explorer.error = Some(e);
                }
            },
            UiEvent::PaletteFiles { result } => {
                self.palette.loading = false;
                if let Ok(listing) = result {
                    self.palette.files = listing
                        .items
                        .into_iter()
                        .filter(|i| !i.is_dir)
                        .collect();
                }
            }
            UiEvent::FileLoaded { path, result } => {
                match result {
                    Ok(content) => self.workspace.apply_loaded(&path, content),
                    Err(e) => self.workspace.apply_load_error(&path, &e),
                }
                self.editor.sync(&self.workspace, self.resolved.tab_width);
            }
            UiEvent::FileSaved { path, result } => match result {
                Ok(()) => {
                    self.workspace.mark_saved(&path);
                    self.notify(NoticeKind::Success, "Saved");
                    self.spawn_git_status();
                }
                Err(e) => {
                    // Dirty state is left untouched on failure.
                    self.notify(NoticeKind::Error, format!("Failed to save: {e}"));
                }
            },
            UiEvent::ItemCreated { parent, result } => match result {
                Ok(()) => self.spawn_explorer_list(parent),
                Err(e) => self.notify(NoticeKind::Error, format!("Error: {e}")),
            },
            UiEvent::ItemDeleted { parent, path, result } => match result {
                Ok(()) => {
                    // A deleted file that was open loses its tab too.
                    self.workspace.close(&path);
                    self.editor.sync(&self.workspace, self.resolved.tab_width);
                    self.persist_session();
                    self.spawn_explorer_list(parent);
                }
                Err(e) => self.notify(NoticeKind::Error, format!("Error: {e}")),
            },
            UiEvent::CommandDone { result } => {
                match result {
                    Ok(output) => {
                        self.term.append_output(&output.stdout);
                        self.term.append_output(&output.stderr);
                    }
                    Err(e) => self.term.append_line(&format!("Execution failed: {e}")),
                }
                self.term_scroll = 0;
            }
            UiEvent::SearchDone { result } => {
                self.search.loading = false;
                match result {
                    Ok(hits) => {
                        self.search.results = hits;
                        self.search.selected = 0;
                    }
                    Err(e) => {
                        self.search.results.clear();
                        self.notify(NoticeKind::Error, format!("Search failed: {e}"));
                    }
                }
            }
            UiEvent::PatternTested { generation, result } => {
                self.regexlab.apply(generation, result);
            }
            UiEvent::AiReply { result } => {
                self.assist.thinking = false;
                match result {
                    Ok(answer) => self.assist.entries.push(AssistEntry::Answer(answer)),
                    Err(e) => self.assist.entries.push(AssistEntry::Failure(e)),
                }
            }
            UiEvent::GitStatus { result } => {
                self.git.loading = false;
                match result {
                    Ok(changes) => {
                        self.git.changes = changes;
                        self.git.selected = self
                            .git
                            .selected
                            .min(self.git.changes.len().saturating_sub(1));
                        self.git.error = None;
                    }
                    Err(e) => {
                        self.git.changes.clear();
                        self.git.error = Some(e);
                    }
                }
            }
            UiEvent::GitBranch { branch } => {
                self.branch = Some(branch);
            }
            UiEvent::GitActionDone { action, result } => match result {
                Ok(()) => {
                    if action == "commit" {
                        self.git.message = GitState::default().message;
                        self.notify(NoticeKind::Success, "Committed");
                    }
                    self.spawn_git_status();
                }
                Err(e) => {
                    self.notify(NoticeKind::Error, format!("{action} failed: {e}"));
                }
            },
            UiEvent::ImportsAnalyzed { result } => {
                self.tools.imports = match result {
                    Ok(imports) => ToolData::Ready(imports),
                    Err(e) => ToolData::Failed(e),
                };
            }
            UiEvent::PackageInstalled { name, result } => {
                self.tools.installing = None;
                match result {
                    Ok(()) => {
                        self.notify(NoticeKind::Success, format!("Installed {name}"));
                        // Refresh the lens so the row flips to installed.
                        if self.right_panel == Some(ToolKind::Imports) {
                            self.open_tool(ToolKind::Imports);
                        }
                    }
                    Err(e) => {
                        self.notify(NoticeKind::Error, format!("Failed to install: {e}"));
                    }
                }
            }
            UiEvent::MetricsReady { result } => {
                self.tools.metrics = match result {
                    Ok(metrics) => ToolData::Ready(metrics),
                    Err(e) => ToolData::Failed(e),
                };
            }
            UiEvent::BytecodeReady { result } => {
                self.tools.bytecode = match result {
                    Ok(text) => ToolData::Ready(text),
                    Err(e) => ToolData::Failed(e),
                };
            }
        }
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

// ── Main TUI run loop ─────────────────────────────────────────────────────────

pub async fn run(config: ConfigFile, resolved: ResolvedConfig, fresh: bool) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Panic hook — restore the terminal before printing the panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        orig_hook(info);
    }));

    let result = event_loop(&mut terminal, config, resolved, fresh).await;

    restore_terminal(&mut terminal);
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: ConfigFile,
    resolved: ResolvedConfig,
    fresh: bool,
) -> Result<()> {
    let backend = Backend::new(&resolved);
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut state = AppState::new(config, resolved, backend, ui_tx.clone());

    // Initial explorer listing
    let root = state.root_str();
    state.spawn_explorer_list(root);

    // Git detection — panel and branch indicator only appear inside a repo
    state.repo = GitRepo::open(&state.resolved.root).await;
    if let Some(repo) = state.repo.clone() {
        state.spawn_git_status();
        let tx = ui_tx.clone();
        tokio::spawn(async move {
            if let Ok(branch) = repo.branch().await {
                let _ = tx.send(UiEvent::GitBranch { branch });
            }
        });
    }

    // Restore the previous open-tab set for this workspace
    if !fresh {
        if let Some(saved) = session::load_for(&state.resolved.root) {
            for path in &saved.open_paths {
                state.workspace.open(path);
            }
            if let Some(active) = &saved.active {
                state.workspace.activate(active);
            }
            // Only the visible tab loads eagerly; the rest load on activation.
            if let Some(active) = state.workspace.active_path().map(String::from) {
                state.spawn_load(active);
            }
            state.editor.sync(&state.workspace, state.resolved.tab_width);
        }
    }

    let mut crossterm_events = EventStream::new();
    let mut ticker = tokio::time::interval(tokio::time::Duration::from_millis(100));

    terminal.draw(|f| render::draw(f, &state))?;

    loop {
        tokio::select! {
            // ── Housekeeping tick: debounce deadline + notice expiry ──────────
            _ = ticker.tick() => {
                let now = Instant::now();
                let mut dirty = false;
                if let Some((generation, pattern, subject)) = state.regexlab.take_due(now) {
                    state.spawn_pattern_test(generation, pattern, subject);
                    dirty = true;
                }
                if let Some(notice) = &state.notice {
                    if now.duration_since(notice.at).as_secs() >= NOTICE_TTL_SECS {
                        state.notice = None;
                        dirty = true;
                    }
                }
                if dirty || state.regexlab.busy() {
                    terminal.draw(|f| render::draw(f, &state))?;
                }
            }

            // ── Drain backend results ─────────────────────────────────────────
            Some(ev) = ui_rx.recv() => {
                state.apply_event(ev);
                terminal.draw(|f| render::draw(f, &state))?;
            }

            // ── Keyboard / resize ─────────────────────────────────────────────
            Some(Ok(ev)) = crossterm_events.next() => {
                match ev {
                    Event::Key(key) => {
                        if !handle_key(key, &mut state) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
                terminal.draw(|f| render::draw(f, &state))?;
            }
        }
    }

    state.persist_session();
    Ok(())
}

// ── Key routing ───────────────────────────────────────────────────────────────

/// Returns false when the app should quit.
fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    // Process-wide chords first — these must win over every focused surface.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('p') => {
                if state.mode == Mode::Palette {
                    state.mode = Mode::Normal;
                } else {
                    state.open_palette();
                }
                return true;
            }
            KeyCode::Char('t') => {
                state.term_visible = !state.term_visible;
                state.focus = if state.term_visible {
                    Focus::Terminal
                } else {
                    Focus::Editor
                };
                state.consume_pending_command();
                return true;
            }
            KeyCode::Char('o') => {
                state.mode = if state.mode == Mode::Settings {
                    Mode::Normal
                } else {
                    Mode::Settings
                };
                return true;
            }
            KeyCode::Char('s') => {
                state.save_active();
                return true;
            }
            KeyCode::Char('r') => {
                state.run_active();
                return true;
            }
            KeyCode::Char('w') => {
                state.close_active_tab();
                return true;
            }
            KeyCode::Char('b') => {
                state.sidebar_visible = !state.sidebar_visible;
                if !state.sidebar_visible && state.focus == Focus::Sidebar {
                    state.focus = Focus::Editor;
                }
                return true;
            }
            _ => {}
        }
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        match key.code {
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as u8 - b'1') as usize;
                state.sidebar_view = SidebarView::ALL[idx];
                state.sidebar_visible = true;
                state.focus = Focus::Sidebar;
                if state.sidebar_view == SidebarView::Git {
                    state.spawn_git_status();
                }
                return true;
            }
            KeyCode::Right => {
                state.cycle_tab(true);
                return true;
            }
            KeyCode::Left => {
                state.cycle_tab(false);
                return true;
            }
            _ => {}
        }
    }

    // Modal overlays swallow everything else while open.
    match state.mode {
        Mode::Palette => {
            handle_palette_key(key, state);
            return true;
        }
        Mode::Settings => {
            handle_settings_key(key, state);
            return true;
        }
        Mode::Prompt => {
            handle_prompt_key(key, state);
            return true;
        }
        Mode::Normal => {}
    }

    match state.focus {
        Focus::Terminal => handle_terminal_key(key, state),
        Focus::Sidebar => handle_sidebar_key(key, state),
        Focus::Panel => handle_panel_key(key, state),
        Focus::Editor => {
            if key.code == KeyCode::Esc {
                return true;
            }
            state.editor.input(key, &mut state.workspace);
        }
    }
    true
}

// ── Terminal panel keys ───────────────────────────────────────────────────────

fn handle_terminal_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => state.focus = Focus::Editor,
        KeyCode::Enter => {
            if let Some(command) = state.term.submit() {
                state.spawn_command(command);
            }
            state.term_scroll = 0;
        }
        KeyCode::Backspace => {
            state.term.backspace();
        }
        KeyCode::PageUp => state.term_scroll += 10,
        KeyCode::PageDown => state.term_scroll = state.term_scroll.saturating_sub(10),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.term.clear();
            state.term_scroll = 0;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.term.push_char(c);
        }
        _ => {}
    }
}

// ── Sidebar keys (per view) ───────────────────────────────────────────────────

fn handle_sidebar_key(key: KeyEvent, state: &mut AppState) {
    if key.code == KeyCode::Esc {
        state.focus = Focus::Editor;
        return;
    }
    match state.sidebar_view {
        SidebarView::Explorer => handle_explorer_key(key, state),
        SidebarView::Search => handle_search_key(key, state),
        SidebarView::Git => handle_git_key(key, state),
        SidebarView::Assist => handle_assist_key(key, state),
        SidebarView::Tools => handle_tools_key(key, state),
    }
}

fn handle_explorer_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up => {
            state.explorer.selected = state.explorer.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.explorer.selected + 1 < state.explorer.nodes.len() {
                state.explorer.selected += 1;
            }
        }
        KeyCode::Enter => {
            let idx = state.explorer.selected;
            let Some(node) = state.explorer.nodes.get(idx) else {
                return;
            };
            if node.entry.is_dir {
                if node.expanded {
                    state.explorer.collapse(idx);
                } else {
                    let path = node.entry.path.clone();
                    state.spawn_explorer_list(path);
                }
            } else {
                let path = node.entry.path.clone();
                state.open_file(&path);
                state.focus = Focus::Editor;
            }
        }
        KeyCode::Char('a') => {
            state.prompt = Some(PromptState {
                kind: PromptKind::NewFile,
                input: String::new(),
                title: "New file".to_string(),
            });
            state.mode = Mode::Prompt;
        }
        KeyCode::Char('A') => {
            state.prompt = Some(PromptState {
                kind: PromptKind::NewDir,
                input: String::new(),
                title: "New folder".to_string(),
            });
            state.mode = Mode::Prompt;
        }
        KeyCode::Char('d') => {
            if let Some(node) = state.explorer.nodes.get(state.explorer.selected) {
                let name = node.entry.name.clone();
                state.prompt = Some(PromptState {
                    kind: PromptKind::ConfirmDelete {
                        path: node.entry.path.clone(),
                    },
                    input: String::new(),
                    title: format!("Delete {name}? (y/n)"),
                });
                state.mode = Mode::Prompt;
            }
        }
        KeyCode::Char('r') => {
            let root = state.root_str();
            state.spawn_explorer_list(root);
        }
        _ => {}
    }
}

fn handle_search_key(key: KeyEvent, state: &mut AppState) {
    match state.search.focus {
        SearchFocus::Input => match key.code {
            KeyCode::Enter => {
                let query = state.search.input.lines().join("");
                if !query.trim().is_empty() {
                    state.spawn_search(query);
                    state.search.focus = SearchFocus::Results;
                }
            }
            KeyCode::Down => state.search.focus = SearchFocus::Results,
            _ => {
                state.search.input.input(key);
            }
        },
        SearchFocus::Results => match key.code {
            KeyCode::Up => {
                if state.search.selected == 0 {
                    state.search.focus = SearchFocus::Input;
                } else {
                    state.search.selected -= 1;
                }
            }
            KeyCode::Down => {
                if state.search.selected + 1 < state.search.results.len() {
                    state.search.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(hit) = state.search.results.get(state.search.selected) {
                    let path = hit.path.clone();
                    state.open_file(&path);
                    state.focus = Focus::Editor;
                }
            }
            _ => state.search.focus = SearchFocus::Input,
        },
    }
}

fn handle_git_key(key: KeyEvent, state: &mut AppState) {
    let Some(repo) = state.repo.clone() else {
        return;
    };
    match state.git.focus {
        GitFocus::List => match key.code {
            KeyCode::Tab => state.git.focus = GitFocus::Message,
            KeyCode::Up => state.git.selected = state.git.selected.saturating_sub(1),
            KeyCode::Down => {
                if state.git.selected + 1 < state.git.changes.len() {
                    state.git.selected += 1;
                }
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                if let Some(change) = state.git.changes.get(state.git.selected) {
                    let files = vec![change.file.clone()];
                    state.spawn_git_action("stage", async move { repo.stage(&files).await });
                }
            }
            KeyCode::Char('a') => {
                state.spawn_git_action("stage", async move { repo.stage_all().await });
            }
            KeyCode::Char('x') => {
                if let Some(change) = state.git.changes.get(state.git.selected) {
                    let file = change.file.clone();
                    state.prompt = Some(PromptState {
                        kind: PromptKind::ConfirmDiscard { file: file.clone() },
                        input: String::new(),
                        title: format!("Discard changes to {file}? (y/n)"),
                    });
                    state.mode = Mode::Prompt;
                }
            }
            KeyCode::Char('r') => state.spawn_git_status(),
            _ => {}
        },
        GitFocus::Message => match key.code {
            KeyCode::Tab => state.git.focus = GitFocus::List,
            KeyCode::Enter => {
                let message = state.git.message.lines().join(" ");
                let message = message.trim().to_string();
                if message.is_empty() || state.git.changes.is_empty() {
                    return;
                }
                state.spawn_git_action("commit", async move {
                    repo.commit(&message).await.map(|_| ())
                });
            }
            _ => {
                state.git.message.input(key);
            }
        },
    }
}

fn handle_assist_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => {
            let query = state.assist.input.lines().join(" ");
            let query = query.trim().to_string();
            if query.is_empty() || state.assist.thinking {
                return;
            }
            state.assist.input = AssistState::default().input;
            state.assist.entries.push(AssistEntry::Question(query.clone()));
            state.spawn_ask_ai(query);
        }
        _ => {
            state.assist.input.input(key);
        }
    }
}

fn handle_tools_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up => state.tools.selected = state.tools.selected.saturating_sub(1),
        KeyCode::Down => {
            if state.tools.selected + 1 < ToolKind::ALL.len() {
                state.tools.selected += 1;
            }
        }
        KeyCode::Enter => {
            let tool = ToolKind::ALL[state.tools.selected];
            state.open_tool(tool);
        }
        _ => {}
    }
}

// ── Right tool panel keys ─────────────────────────────────────────────────────

fn handle_panel_key(key: KeyEvent, state: &mut AppState) {
    if key.code == KeyCode::Esc {
        state.right_panel = None;
        state.focus = Focus::Editor;
        return;
    }
    match state.right_panel {
        Some(ToolKind::Regex) => handle_regex_key(key, state),
        Some(ToolKind::Imports) => match key.code {
            KeyCode::Up => {
                state.tools.imports_selected = state.tools.imports_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if let ToolData::Ready(imports) = &state.tools.imports {
                    if state.tools.imports_selected + 1 < imports.len() {
                        state.tools.imports_selected += 1;
                    }
                }
            }
            KeyCode::Char('i') | KeyCode::Enter => {
                if state.tools.installing.is_some() {
                    return;
                }
                let missing = match &state.tools.imports {
                    ToolData::Ready(imports) => imports
                        .get(state.tools.imports_selected)
                        .filter(|imp| imp.status == "missing")
                        .map(|imp| imp.name.clone()),
                    _ => None,
                };
                if let Some(name) = missing {
                    state.spawn_install(name);
                }
            }
            KeyCode::Char('r') => state.open_tool(ToolKind::Imports),
            _ => {}
        },
        Some(ToolKind::Bytecode) => match key.code {
            KeyCode::Up => {
                state.tools.bytecode_scroll = state.tools.bytecode_scroll.saturating_sub(1);
            }
            KeyCode::Down => state.tools.bytecode_scroll += 1,
            KeyCode::PageUp => {
                state.tools.bytecode_scroll = state.tools.bytecode_scroll.saturating_sub(20);
            }
            KeyCode::PageDown => state.tools.bytecode_scroll += 20,
            KeyCode::Char('r') => state.open_tool(ToolKind::Bytecode),
            _ => {}
        },
        Some(ToolKind::Metrics) => {
            if key.code == KeyCode::Char('r') {
                state.open_tool(ToolKind::Metrics);
            }
        }
        None => {}
    }
}

fn handle_regex_key(key: KeyEvent, state: &mut AppState) {
    if key.code == KeyCode::Tab {
        state.regex_panel.focus = match state.regex_panel.focus {
            RegexField::Pattern => RegexField::Subject,
            RegexField::Subject => RegexField::Pattern,
        };
        return;
    }
    let now = Instant::now();
    match state.regex_panel.focus {
        RegexField::Pattern => {
            if key.code == KeyCode::Enter {
                return; // single-line input
            }
            if state.regex_panel.pattern.input(key) {
                let pattern = state.regex_panel.pattern.lines().join("");
                state.regexlab.set_pattern(&pattern, now);
            }
        }
        RegexField::Subject => {
            if state.regex_panel.subject.input(key) {
                let subject = state.regex_panel.subject.lines().join("\n");
                state.regexlab.set_subject(&subject, now);
            }
        }
    }
}

// ── Palette keys ──────────────────────────────────────────────────────────────

fn handle_palette_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Up => state.palette.selected = state.palette.selected.saturating_sub(1),
        KeyCode::Down => {
            let count = state.palette.filtered().len();
            if state.palette.selected + 1 < count {
                state.palette.selected += 1;
            }
        }
        KeyCode::Enter => {
            let path = state
                .palette
                .filtered()
                .get(state.palette.selected)
                .map(|f| f.path.clone());
            if let Some(path) = path {
                state.open_file(&path);
                state.mode = Mode::Normal;
                state.focus = Focus::Editor;
            }
        }
        KeyCode::Backspace => {
            state.palette.query.pop();
            state.palette.selected = 0;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.palette.query.push(c);
            state.palette.selected = 0;
        }
        _ => {}
    }
}

// ── Settings overlay keys ─────────────────────────────────────────────────────

fn handle_settings_key(key: KeyEvent, state: &mut AppState) {
    let row = state.settings_overlay.selected;
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Up => state.settings_overlay.selected = row.saturating_sub(1),
        KeyCode::Down => {
            if row + 1 < SETTINGS_ROWS {
                state.settings_overlay.selected = row + 1;
            }
        }
        KeyCode::Left if row == 0 => {
            state.config.tab_width = state.config.tab_width.saturating_sub(1).max(1);
            state.apply_settings();
        }
        KeyCode::Right if row == 0 => {
            state.config.tab_width = (state.config.tab_width + 1).min(8);
            state.apply_settings();
        }
        KeyCode::Enter => match row {
            1 => {
                state.config.show_hidden = !state.config.show_hidden;
                state.apply_settings();
            }
            2 => {
                state.prompt = Some(PromptState {
                    kind: PromptKind::EditShell,
                    input: state.config.shell.clone(),
                    title: "Shell".to_string(),
                });
                state.mode = Mode::Prompt;
            }
            3 => {
                state.prompt = Some(PromptState {
                    kind: PromptKind::EditPython,
                    input: state.config.python.clone(),
                    title: "Python interpreter".to_string(),
                });
                state.mode = Mode::Prompt;
            }
            _ => {}
        },
        _ => {}
    }
}

// ── Prompt overlay keys ───────────────────────────────────────────────────────

fn handle_prompt_key(key: KeyEvent, state: &mut AppState) {
    let Some(prompt) = state.prompt.as_ref() else {
        state.mode = Mode::Normal;
        return;
    };

    // Confirmations are a single keypress.
    if matches!(
        prompt.kind,
        PromptKind::ConfirmDelete { .. } | PromptKind::ConfirmDiscard { .. }
    ) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let taken = state.prompt.take();
                state.mode = Mode::Normal;
                match taken.map(|p| p.kind) {
                    Some(PromptKind::ConfirmDelete { path, .. }) => {
                        let parent = parent_dir(&path).unwrap_or_else(|| state.root_str());
                        state.spawn_delete(parent, path);
                    }
                    Some(PromptKind::ConfirmDiscard { file }) => {
                        if let Some(repo) = state.repo.clone() {
                            let files = vec![file];
                            state.spawn_git_action("restore", async move {
                                repo.restore(&files).await
                            });
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.prompt = None;
                state.mode = Mode::Normal;
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            state.prompt = None;
            state.mode = Mode::Normal;
        }
        KeyCode::Backspace => {
            if let Some(p) = state.prompt.as_mut() {
                p.input.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(p) = state.prompt.as_mut() {
                p.input.push(c);
            }
        }
        KeyCode::Enter => {
            let Some(taken) = state.prompt.take() else {
                return;
            };
            let input = taken.input.trim().to_string();
            if input.is_empty() {
                state.prompt = Some(taken);
                return;
            }
            state.mode = Mode::Normal;
            let root = state.root_str();
            match taken.kind {
                PromptKind::NewFile => {
                    let path = join_path(&root, &input);
                    state.spawn_create(root, path, false);
                }
                PromptKind::NewDir => {
                    let path = join_path(&root, &input);
                    state.spawn_create(root, path, true);
                }
                PromptKind::EditShell => {
                    state.config.shell = input;
                    state.apply_settings();
                    state.mode = Mode::Settings;
                }
                PromptKind::EditPython => {
                    state.config.python = input;
                    state.apply_settings();
                    state.mode = Mode::Settings;
                }
                PromptKind::ConfirmDelete { .. } | PromptKind::ConfirmDiscard { .. } => {}
            }
        }
        _ => {}
    }
}

fn join_path(root: &str, name: &str) -> String {
    if root.ends_with('/') {
        format!("{root}{name}")
    } else {
        format!("{root}/{name}")
    }
}

fn parent_dir(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
}
