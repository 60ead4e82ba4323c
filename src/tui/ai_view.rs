/// Assistant panel: exchange log + prompt input.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{AppState, AssistEntry, Focus};

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    super::sidebar::draw_panel_header(f, state, "ASSISTANT", chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    if state.assist.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            " Ask about the active file.",
            Style::default().fg(Color::Rgb(136, 136, 136)),
        )));
    }
    for entry in &state.assist.entries {
        match entry {
            AssistEntry::Question(q) => {
                lines.push(Line::from(vec![
                    Span::styled(" you ", Style::default().fg(Color::Rgb(0, 127, 212))),
                    Span::styled(q.clone(), Style::default().fg(Color::Rgb(220, 220, 220))),
                ]));
            }
            AssistEntry::Answer(a) => {
                lines.push(Line::from(vec![
                    Span::styled(" ai  ", Style::default().fg(Color::Rgb(76, 175, 80))),
                    Span::styled(a.clone(), Style::default().fg(Color::Rgb(180, 180, 180))),
                ]));
            }
            AssistEntry::Failure(e) => {
                lines.push(Line::from(Span::styled(
                    format!(" ✗ {e}"),
                    Style::default().fg(Color::Rgb(255, 107, 107)),
                )));
            }
        }
        lines.push(Line::raw(""));
    }
    if state.assist.thinking {
        lines.push(Line::from(Span::styled(
            " thinking…",
            Style::default().fg(Color::Rgb(136, 136, 136)),
        )));
    }

    // Show the tail when the log outgrows the panel.
    let height = chunks[1].height as usize;
    let skip = lines.len().saturating_sub(height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    f.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), chunks[1]);

    let focused = state.focus == Focus::Sidebar;
    let mut input = state.assist.input.clone();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Rgb(0, 127, 212)
            } else {
                Color::Rgb(60, 60, 60)
            })),
    );
    f.render_widget(&input, chunks[2]);
}
