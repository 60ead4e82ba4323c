/// Regex lab panel: pattern + subject inputs, the highlighted subject, and a
/// match table. Evaluation is debounced in `RegexLab`; this module only
/// renders its current state.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{AppState, RegexField};
use crate::regexlab::MatchSpan;

const DIM: Color = Color::Rgb(136, 136, 136);
const ERR: Color = Color::Rgb(255, 107, 107);
const MATCH_GREEN: Color = Color::Rgb(76, 175, 80);

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // pattern input
            Constraint::Length(1), // error line
            Constraint::Length(6), // subject input
            Constraint::Length(1), // matches header
            Constraint::Min(3),    // highlighted subject
            Constraint::Length(7), // match table
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                " Regex Lab ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Tab switch field  Esc close", Style::default().fg(DIM)),
        ]))
        .style(Style::default().bg(Color::Rgb(37, 37, 38))),
        chunks[0],
    );

    // Pattern input — border turns red on a compile error
    let pattern_focused = state.regex_panel.focus == RegexField::Pattern;
    let border = if state.regexlab.error().is_some() {
        ERR
    } else if pattern_focused {
        Color::Rgb(0, 127, 212)
    } else {
        Color::Rgb(68, 68, 68)
    };
    let mut pattern = state.regex_panel.pattern.clone();
    pattern.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" PATTERN ")
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(&pattern, chunks[1]);

    if let Some(error) = state.regexlab.error() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(ERR),
            ))),
            chunks[2],
        );
    }

    // Subject input
    let subject_focused = state.regex_panel.focus == RegexField::Subject;
    let mut subject = state.regex_panel.subject.clone();
    subject.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" TEST STRING ")
            .border_style(Style::default().fg(if subject_focused {
                Color::Rgb(0, 127, 212)
            } else {
                Color::Rgb(68, 68, 68)
            })),
    );
    f.render_widget(&subject, chunks[3]);

    // Matches header
    let mut header = vec![Span::styled(
        format!(" MATCHES ({})", state.regexlab.matches().len()),
        Style::default().fg(DIM),
    )];
    if state.regexlab.busy() {
        header.push(Span::styled(
            "  Processing...",
            Style::default().fg(MATCH_GREEN),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[4]);

    // Subject with match highlighting
    f.render_widget(
        Paragraph::new(highlight_subject(
            state.regexlab.subject(),
            state.regexlab.matches(),
        ))
        .wrap(Wrap { trim: false }),
        chunks[5],
    );

    draw_match_table(f, state.regexlab.matches(), chunks[6]);
}

/// Interleave plain and highlighted spans over the subject text. Offsets are
/// byte positions produced by the evaluator over this same string.
fn highlight_subject<'a>(subject: &'a str, matches: &'a [MatchSpan]) -> Vec<Line<'a>> {
    let plain = Style::default().fg(Color::Rgb(204, 204, 204));
    let hit = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(34, 80, 38))
        .add_modifier(Modifier::UNDERLINED);

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    let mut last = 0usize;
    for m in matches {
        if m.start > subject.len() || m.end > subject.len() || m.start < last {
            break; // stale offsets against an edited subject — skip highlighting
        }
        if m.start > last {
            spans.push(Span::styled(&subject[last..m.start], plain));
        }
        spans.push(Span::styled(&subject[m.start..m.end], hit));
        last = m.end;
    }
    if last < subject.len() {
        spans.push(Span::styled(&subject[last..], plain));
    }

    // Split on embedded newlines so multi-line subjects render correctly.
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for span in spans {
        let text = span.content.clone();
        let style = span.style;
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}

fn draw_match_table(f: &mut Frame, matches: &[MatchSpan], area: Rect) {
    if matches.is_empty() {
        return;
    }
    let mut lines = vec![Line::from(Span::styled(
        format!(" {:<4}{:<20}{:<18}{}", "#", "MATCH", "GROUPS", "RANGE"),
        Style::default().fg(DIM).add_modifier(Modifier::BOLD),
    ))];
    let height = area.height.saturating_sub(1) as usize;
    for (i, m) in matches.iter().take(height).enumerate() {
        let groups = if m.groups.is_empty() {
            "-".to_string()
        } else {
            format!("({})", m.groups.join(", "))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<4}", i + 1), Style::default().fg(DIM)),
            Span::styled(
                format!("{:<20}", format!("\"{}\"", clip(&m.text, 16))),
                Style::default().fg(MATCH_GREEN),
            ),
            Span::styled(
                format!("{:<18}", clip(&groups, 16)),
                Style::default().fg(Color::Rgb(170, 170, 170)),
            ),
            Span::styled(
                format!("{}-{}", m.start, m.end),
                Style::default().fg(Color::Rgb(170, 170, 170)),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
