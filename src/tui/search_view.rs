/// Search panel: query input + workspace-wide results.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{AppState, Focus, SearchFocus};

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    super::sidebar::draw_panel_header(f, state, "SEARCH", chunks[0]);

    // Query input
    let input_focused = state.focus == Focus::Sidebar && state.search.focus == SearchFocus::Input;
    let mut input = state.search.input.clone();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if input_focused {
                Color::Rgb(0, 127, 212)
            } else {
                Color::Rgb(60, 60, 60)
            })),
    );
    f.render_widget(&input, chunks[1]);

    // Results
    let mut lines: Vec<Line> = Vec::new();
    if state.search.loading {
        lines.push(Line::from(Span::styled(
            " Searching...",
            Style::default().fg(Color::Rgb(136, 136, 136)),
        )));
    } else if state.search.searched && state.search.results.is_empty() {
        lines.push(Line::from(Span::styled(
            " No results found.",
            Style::default().fg(Color::Rgb(136, 136, 136)),
        )));
    }

    let results_focused =
        state.focus == Focus::Sidebar && state.search.focus == SearchFocus::Results;
    for (i, hit) in state.search.results.iter().enumerate() {
        let selected = results_focused && i == state.search.selected;
        let header_style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(42, 45, 46))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(204, 204, 204))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}", hit.file), header_style),
            Span::styled(
                format!(":{}", hit.line),
                Style::default().fg(Color::Rgb(102, 102, 102)),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", truncate(&hit.content, 40)),
            Style::default().fg(Color::Rgb(136, 136, 136)),
        )));
    }

    f.render_widget(Paragraph::new(lines), chunks[2]);
}

/// Truncate to a display width, not a char count — result lines must fit the
/// panel even when the hit contains wide characters.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
