/// Source-control panel: change list, staging, commit box.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{AppState, Focus, GitFocus};

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    super::sidebar::draw_panel_header(f, state, "SOURCE CONTROL", chunks[0]);

    if state.repo.is_none() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Not a git repository",
                Style::default().fg(Color::Rgb(136, 136, 136)),
            ))),
            chunks[3],
        );
        return;
    }

    // Commit message box
    let message_focused = state.focus == Focus::Sidebar && state.git.focus == GitFocus::Message;
    let mut message = state.git.message.clone();
    message.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if message_focused {
                Color::Rgb(0, 127, 212)
            } else {
                Color::Rgb(60, 60, 60)
            })),
    );
    f.render_widget(&message, chunks[1]);

    // Changes header
    let mut header = vec![Span::styled(
        format!(" CHANGES ({})", state.git.changes.len()),
        Style::default()
            .fg(Color::Rgb(187, 187, 187))
            .add_modifier(Modifier::BOLD),
    )];
    if state.git.loading {
        header.push(Span::styled(
            "  refreshing…",
            Style::default().fg(Color::Rgb(100, 100, 100)),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[2]);

    // Change list
    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &state.git.error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Rgb(255, 107, 107)),
        )));
    }

    let list_focused = state.focus == Focus::Sidebar && state.git.focus == GitFocus::List;
    for (i, change) in state.git.changes.iter().enumerate() {
        let status_fg = if change.status.contains('M') {
            Color::Rgb(226, 192, 141)
        } else if change.status.contains('A') {
            Color::Rgb(115, 201, 145)
        } else if change.status.contains('D') {
            Color::Rgb(255, 107, 107)
        } else {
            Color::Rgb(153, 153, 153)
        };
        let mut file_style = Style::default().fg(Color::Rgb(204, 204, 204));
        if list_focused && i == state.git.selected {
            file_style = file_style
                .bg(Color::Rgb(42, 45, 46))
                .add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", change.status.trim_end()),
                Style::default().fg(status_fg),
            ),
            Span::styled(change.file.clone(), file_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), chunks[3]);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " s stage  a stage all  x discard  Tab message",
            Style::default().fg(Color::Rgb(100, 100, 100)),
        ))),
        chunks[4],
    );
}
