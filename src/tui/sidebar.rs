/// Sidebar: activity bar (view switcher) + the active side panel.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{AppState, Focus, SidebarView};

const PANEL_BG: Color = Color::Rgb(37, 37, 38);
const BAR_BG: Color = Color::Rgb(51, 51, 51);

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_activity_bar(f, state, cols[0]);

    let panel = cols[1];
    f.render_widget(Paragraph::new("").style(Style::default().bg(PANEL_BG)), panel);

    match state.sidebar_view {
        SidebarView::Explorer => draw_explorer(f, state, panel),
        SidebarView::Search => super::search_view::draw(f, state, panel),
        SidebarView::Git => super::git_view::draw(f, state, panel),
        SidebarView::Assist => super::ai_view::draw(f, state, panel),
        SidebarView::Tools => super::tools_view::draw_list(f, state, panel),
    }
}

// ── Activity bar ──────────────────────────────────────────────────────────────

fn draw_activity_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let glyphs = [
        (SidebarView::Explorer, "F"),
        (SidebarView::Search, "S"),
        (SidebarView::Git, "⎇"),
        (SidebarView::Assist, "A"),
        (SidebarView::Tools, "T"),
    ];

    let mut lines = vec![Line::raw("")];
    for (view, glyph) in glyphs {
        let active = state.sidebar_view == view;
        let style = if active {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(136, 136, 136))
        };
        lines.push(Line::from(Span::styled(format!(" {glyph}"), style)));
        lines.push(Line::raw(""));
    }

    f.render_widget(
        Paragraph::new(lines).style(Style::default().bg(BAR_BG)),
        area,
    );
}

// ── Explorer panel ────────────────────────────────────────────────────────────

fn draw_explorer(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    draw_panel_header(f, state, "EXPLORER", chunks[0]);

    let focused = state.focus == Focus::Sidebar;
    let height = chunks[1].height as usize;
    let selected = state.explorer.selected;
    // Keep the selection in view
    let offset = selected.saturating_sub(height.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &state.explorer.error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Rgb(255, 107, 107)),
        )));
    } else if state.explorer.loading && state.explorer.nodes.is_empty() {
        lines.push(Line::from(Span::styled(
            " loading…",
            Style::default().fg(Color::Rgb(120, 120, 120)),
        )));
    }

    for (i, node) in state.explorer.nodes.iter().enumerate().skip(offset) {
        let indent = "  ".repeat(node.depth);
        let glyph = if node.entry.is_dir {
            if node.expanded { "▾ " } else { "▸ " }
        } else {
            "  "
        };
        let fg = if node.entry.is_dir {
            Color::Rgb(220, 182, 122)
        } else {
            Color::Rgb(204, 204, 204)
        };
        let mut style = Style::default().fg(fg);
        if focused && i == selected {
            style = style.bg(Color::Rgb(42, 45, 46)).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(Span::styled(
            format!(" {indent}{glyph}{}", node.entry.name),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), chunks[1]);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " a new  A folder  d delete  r refresh",
            Style::default().fg(Color::Rgb(100, 100, 100)),
        ))),
        chunks[2],
    );
}

// ── Shared panel header ───────────────────────────────────────────────────────

pub fn draw_panel_header(f: &mut Frame, state: &AppState, title: &str, area: Rect) {
    let focused = state.focus == Focus::Sidebar;
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(if focused { Color::White } else { Color::Rgb(187, 187, 187) })
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(Color::Rgb(30, 30, 30))),
        area,
    );
}
