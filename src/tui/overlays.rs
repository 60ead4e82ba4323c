/// Centered overlays: quick-open palette, settings, and name/confirm prompts.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{AppState, SETTINGS_ROWS};

const OVERLAY_BG: Color = Color::Rgb(27, 27, 27);
const BORDER: Color = Color::Rgb(69, 69, 69);
const DIM: Color = Color::Rgb(136, 136, 136);
const ACCENT: Color = Color::Rgb(0, 127, 212);

fn centered(area: Rect, width: u16, height: u16, from_top: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + from_top.min(area.height.saturating_sub(height)),
        width,
        height,
    }
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(OVERLAY_BG))
}

// ── Quick-open palette ────────────────────────────────────────────────────────

pub fn draw_palette(f: &mut Frame, state: &AppState, area: Rect) {
    let rect = centered(area, area.width * 3 / 5, 16, area.height / 6);
    f.render_widget(Clear, rect);

    let block = overlay_block("Quick Open (Ctrl+P)");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(ACCENT)),
            Span::styled(
                state.palette.query.clone(),
                Style::default().fg(Color::Rgb(238, 238, 238)),
            ),
            Span::styled("█", Style::default().fg(DIM)),
        ]),
        Line::raw(""),
    ];

    if state.palette.loading {
        lines.push(Line::from(Span::styled(
            " loading…",
            Style::default().fg(DIM),
        )));
    }

    let visible = inner.height.saturating_sub(2) as usize;
    for (i, file) in state.palette.filtered().iter().take(visible).enumerate() {
        let selected = i == state.palette.selected;
        let style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(42, 45, 46))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(221, 221, 221))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<28}", file.name), style),
            Span::styled(file.path.clone(), Style::default().fg(DIM)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ── Settings ──────────────────────────────────────────────────────────────────

pub fn draw_settings(f: &mut Frame, state: &AppState, area: Rect) {
    let rect = centered(area, 52, 12, area.height / 4);
    f.render_widget(Clear, rect);

    let block = overlay_block("Settings");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let rows: [(&str, String); SETTINGS_ROWS] = [
        ("Tab width", format!("◂ {} ▸", state.config.tab_width)),
        (
            "Show hidden files",
            if state.config.show_hidden { "on" } else { "off" }.to_string(),
        ),
        ("Shell", state.config.shell.clone()),
        ("Python interpreter", state.config.python.clone()),
    ];

    let mut lines = vec![Line::raw("")];
    for (i, (label, value)) in rows.iter().enumerate() {
        let selected = i == state.settings_overlay.selected;
        let label_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(204, 204, 204))
        };
        let marker = if selected { "▸" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} {label:<22}"), label_style),
            Span::styled(value.clone(), Style::default().fg(ACCENT)),
        ]));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        " ↑↓ select  ◂▸ adjust  Enter toggle/edit  Esc close",
        Style::default().fg(DIM),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

// ── Prompt (name input / confirmation) ────────────────────────────────────────

pub fn draw_prompt(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(prompt) = &state.prompt else { return };

    let rect = centered(area, 48, 5, area.height / 3);
    f.render_widget(Clear, rect);

    let block = overlay_block(&prompt.title);
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(
                prompt.input.clone(),
                Style::default().fg(Color::Rgb(238, 238, 238)),
            ),
            Span::styled("█", Style::default().fg(DIM)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}
