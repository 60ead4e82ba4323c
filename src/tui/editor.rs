/// Editor pane: a tui-textarea widget bound to the active tab.
///
/// The workspace owns the authoritative content string; the textarea is a
/// projection of it, rebuilt when the active tab switches or its content
/// arrives from a load. Edits flow the other way — every text-modifying
/// keystroke writes the joined buffer back through `Workspace::edit`, which
/// is what drives the dirty flag.
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_textarea::TextArea;

use crate::workspace::Workspace;

pub struct EditorPane {
    textarea: Option<TextArea<'static>>,
    path: Option<String>,
    /// Active tab is open but its content hasn't arrived yet.
    waiting: bool,
    /// The loaded content ended with a newline; restore it when joining
    /// lines so saves don't strip the file's final newline.
    trailing_newline: bool,
}

impl Default for EditorPane {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPane {
    pub fn new() -> Self {
        Self {
            textarea: None,
            path: None,
            waiting: false,
            trailing_newline: false,
        }
    }

    /// Rebuild the widget if the active tab switched or its content arrived.
    pub fn sync(&mut self, ws: &Workspace, tab_width: u8) {
        let Some(file) = ws.active_file() else {
            self.textarea = None;
            self.path = None;
            self.waiting = false;
            return;
        };

        let switched = self.path.as_deref() != Some(file.path.as_str());
        let arrived = self.waiting && file.content.is_some();
        if !switched && !arrived {
            return;
        }

        self.path = Some(file.path.clone());
        self.waiting = file.content.is_none();
        self.textarea = file.content.as_ref().map(|content| {
            self.trailing_newline = content.ends_with('\n');
            let lines: Vec<String> = content.lines().map(String::from).collect();
            let mut ta = TextArea::new(lines);
            ta.set_tab_length(tab_width);
            ta.set_hard_tab_indent(false);
            ta.set_cursor_line_style(Style::default());
            ta.set_line_number_style(Style::default().fg(Color::Rgb(90, 90, 90)));
            ta
        });
    }

    /// Route a keystroke into the textarea and mirror any text change back
    /// into the workspace.
    pub fn input(&mut self, key: KeyEvent, ws: &mut Workspace) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let Some(ta) = &mut self.textarea else {
            return;
        };
        if ta.input(key) {
            let mut content = ta.lines().join("\n");
            if self.trailing_newline {
                content.push('\n');
            }
            ws.edit(&path, content);
        }
    }

    /// (line, column), 1-based, for the status bar.
    pub fn cursor(&self) -> (usize, usize) {
        let (row, col) = self
            .textarea
            .as_ref()
            .map(|t| t.cursor())
            .unwrap_or((0, 0));
        (row + 1, col + 1)
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn draw(&self, f: &mut Frame, ws: &Workspace, area: Rect, focused: bool) {
        let Some(file) = ws.active_file() else {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Select a file to start editing",
                    Style::default().fg(Color::Rgb(85, 85, 85)),
                )))
                .alignment(Alignment::Center),
                center_line(area),
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        // Header: file name, dirty dot, language tag
        let mut spans = vec![Span::styled(
            format!(" {} ", file.name),
            Style::default()
                .fg(if focused { Color::White } else { Color::Gray })
                .add_modifier(Modifier::BOLD),
        )];
        if file.dirty {
            spans.push(Span::styled("●", Style::default().fg(Color::White)));
        }
        let header = Line::from(spans);
        let lang = Line::from(Span::styled(
            format!("{} ", file.language),
            Style::default().fg(Color::Rgb(136, 136, 136)),
        ))
        .right_aligned();
        f.render_widget(
            Paragraph::new(header).style(Style::default().bg(Color::Rgb(30, 30, 30))),
            chunks[0],
        );
        f.render_widget(Paragraph::new(lang), chunks[0]);

        match &self.textarea {
            Some(ta) => f.render_widget(ta, chunks[1]),
            None => {
                f.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        "Loading...",
                        Style::default().fg(Color::Rgb(120, 120, 120)),
                    ))),
                    chunks[1],
                );
            }
        }
    }
}

/// A one-line rect vertically centered in `area`, for placeholder text.
fn center_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1.min(area.height),
    }
}
