/// Ratatui draw entry-point for Slate.
/// Thin dispatcher — the panels render themselves in their own modules.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{AppState, Focus, Mode, NoticeKind, ToolKind};

const BG: Color = Color::Rgb(30, 30, 30);
const TAB_BG: Color = Color::Rgb(27, 27, 27);
const STATUS_BG: Color = Color::Rgb(21, 21, 21);
const DIM: Color = Color::Rgb(136, 136, 136);

// ── Main draw entry point ─────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();
    f.render_widget(Paragraph::new("").style(Style::default().bg(BG)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    // Sidebar | main column
    let main_area = if state.sidebar_visible {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(rows[0]);
        super::sidebar::draw(f, state, cols[0]);
        cols[1]
    } else {
        rows[0]
    };

    // Tab bar / body / terminal
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(0)];
    if state.term_visible {
        constraints.push(Constraint::Length(10));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_area);

    draw_tab_bar(f, state, chunks[0]);

    // Editor, optionally split with the right tool panel
    let body = chunks[1];
    if let Some(tool) = state.right_panel {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Percentage(44)])
            .split(body);
        state
            .editor
            .draw(f, &state.workspace, cols[0], state.focus == Focus::Editor);
        draw_tool_panel(f, state, tool, cols[1]);
    } else {
        state
            .editor
            .draw(f, &state.workspace, body, state.focus == Focus::Editor);
    }

    if state.term_visible {
        super::terminal_view::draw(f, state, chunks[2]);
    }

    draw_status_bar(f, state, rows[1]);

    // Overlays
    match state.mode {
        Mode::Palette => super::overlays::draw_palette(f, state, area),
        Mode::Settings => super::overlays::draw_settings(f, state, area),
        Mode::Prompt => super::overlays::draw_prompt(f, state, area),
        Mode::Normal => {}
    }
}

fn draw_tool_panel(f: &mut Frame, state: &AppState, tool: ToolKind, area: Rect) {
    match tool {
        ToolKind::Regex => super::regex_view::draw(f, state, area),
        ToolKind::Metrics | ToolKind::Imports | ToolKind::Bytecode => {
            super::tools_view::draw_viewer(f, state, tool, area)
        }
    }
}

// ── Tab bar ───────────────────────────────────────────────────────────────────

fn draw_tab_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for file in state.workspace.files() {
        let active = state.workspace.active_path() == Some(file.path.as_str());
        let style = if active {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(42, 45, 46))
        } else {
            Style::default().fg(Color::Rgb(170, 170, 170)).bg(TAB_BG)
        };
        let marker = if file.dirty { "●" } else { " " };
        spans.push(Span::styled(format!(" {}{} ", file.name, marker), style));
        spans.push(Span::styled("│", Style::default().fg(Color::Rgb(51, 51, 51))));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(TAB_BG)),
        area,
    );

    if state.workspace.active_path().is_some() {
        f.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    "▶ run ^R ",
                    Style::default().fg(Color::Rgb(76, 175, 80)),
                ))
                .right_aligned(),
            ),
            area,
        );
    }
}

// ── Status bar ────────────────────────────────────────────────────────────────

fn draw_status_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let left = match &state.notice {
        Some(notice) => {
            let fg = match notice.kind {
                NoticeKind::Info => Color::Rgb(200, 200, 200),
                NoticeKind::Success => Color::Rgb(115, 201, 145),
                NoticeKind::Error => Color::Rgb(255, 107, 107),
            };
            Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            ))
        }
        None => {
            let mut spans = vec![Span::styled(
                " ^P palette  ^T terminal  ^O settings  ^S save",
                Style::default().fg(DIM),
            )];
            if let Some(branch) = &state.branch {
                spans.push(Span::styled(
                    format!("  ⎇ {branch}"),
                    Style::default().fg(Color::Rgb(100, 180, 255)),
                ));
            }
            Line::from(spans)
        }
    };

    let (line, col) = state.editor.cursor();
    let lang = state
        .workspace
        .active_file()
        .map(|file| file.language)
        .unwrap_or("plaintext");
    let right = Line::from(Span::styled(
        format!("Ln {line}, Col {col}  |  {lang}  |  UTF-8 "),
        Style::default().fg(Color::Rgb(154, 154, 154)),
    ))
    .right_aligned();

    f.render_widget(
        Paragraph::new(left).style(Style::default().bg(STATUS_BG)),
        area,
    );
    f.render_widget(Paragraph::new(right), area);
}
