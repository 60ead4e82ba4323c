/// Terminal panel rendering: the output log with the live prompt line at the
/// bottom. Echo is purely local — the prompt line is drawn straight from the
/// session's input buffer.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{AppState, Focus};

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let focused = state.focus == Focus::Terminal;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    // Panel header
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                " TERMINAL ",
                Style::default()
                    .fg(if focused { Color::White } else { Color::Rgb(187, 187, 187) })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "^L clear  PgUp/PgDn scroll  Esc editor",
                Style::default().fg(Color::Rgb(100, 100, 100)),
            ),
        ]))
        .style(Style::default().bg(Color::Rgb(37, 37, 38))),
        chunks[0],
    );

    // Log tail + live prompt line, offset by the scroll position
    let body = chunks[1];
    let height = body.height as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    let log = state.term.log();
    let total = log.len() + 1; // +1 for the prompt line
    let end = total.saturating_sub(state.term_scroll);
    let start = end.saturating_sub(height);

    for line in log.iter().take(end.min(log.len())).skip(start) {
        lines.push(Line::from(Span::styled(
            line.clone(),
            Style::default().fg(Color::Rgb(204, 204, 204)),
        )));
    }
    if end == total {
        let prompt = state.term.prompt_line();
        let cursor = if focused { "█" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Rgb(204, 204, 204))),
        ]));
    }

    f.render_widget(
        Paragraph::new(lines).style(Style::default().bg(Color::Rgb(24, 24, 24))),
        body,
    );
}
