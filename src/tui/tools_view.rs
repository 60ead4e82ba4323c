/// Tools list (sidebar) and the Python inspection viewers (right panel).
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::{AppState, Focus, ToolData, ToolKind};

const DIM: Color = Color::Rgb(136, 136, 136);
const ERR: Color = Color::Rgb(255, 107, 107);

// ── Sidebar tools list ────────────────────────────────────────────────────────

pub fn draw_list(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    super::sidebar::draw_panel_header(f, state, "TOOLS", chunks[0]);

    let focused = state.focus == Focus::Sidebar;
    let mut lines = vec![Line::raw("")];
    for (i, tool) in ToolKind::ALL.iter().enumerate() {
        let selected = focused && i == state.tools.selected;
        let name_style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(42, 45, 46))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(224, 224, 224))
        };
        lines.push(Line::from(Span::styled(format!(" {}", tool.title()), name_style)));
        lines.push(Line::from(Span::styled(
            format!("   {}", tool.blurb()),
            Style::default().fg(DIM),
        )));
        lines.push(Line::raw(""));
    }

    f.render_widget(Paragraph::new(lines), chunks[1]);
}

// ── Right-panel viewers ───────────────────────────────────────────────────────

pub fn draw_viewer(f: &mut Frame, state: &AppState, tool: ToolKind, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    draw_viewer_header(f, tool, chunks[0]);
    let body = chunks[1];

    match tool {
        ToolKind::Metrics => draw_metrics(f, state, body),
        ToolKind::Imports => draw_imports(f, state, body),
        ToolKind::Bytecode => draw_bytecode(f, state, body),
        ToolKind::Regex => {}
    }
}

fn draw_viewer_header(f: &mut Frame, tool: ToolKind, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", tool.title()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Esc close  r refresh", Style::default().fg(DIM)),
        ]))
        .style(Style::default().bg(Color::Rgb(37, 37, 38))),
        area,
    );
}

fn placeholder(f: &mut Frame, area: Rect, text: &str, fg: Color) {
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(fg),
        )))
        .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Code X-Ray ────────────────────────────────────────────────────────────────

fn complexity_color(score: u32) -> Color {
    if score <= 5 {
        Color::Rgb(76, 175, 80)
    } else if score <= 10 {
        Color::Rgb(255, 152, 0)
    } else {
        ERR
    }
}

fn complexity_label(score: u32) -> &'static str {
    if score <= 5 {
        "Simple"
    } else if score <= 10 {
        "Moderate"
    } else {
        "Complex"
    }
}

fn draw_metrics(f: &mut Frame, state: &AppState, area: Rect) {
    match &state.tools.metrics {
        ToolData::Idle => {}
        ToolData::Loading => placeholder(f, area, "Analyzing code structure...", DIM),
        ToolData::Failed(e) => placeholder(f, area, e, ERR),
        ToolData::Ready(metrics) if metrics.is_empty() => {
            placeholder(f, area, "No functions found in this file.", DIM)
        }
        ToolData::Ready(metrics) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    " FUNCTION COMPLEXITY (CYCLOMATIC)",
                    Style::default().fg(DIM),
                )),
                Line::raw(""),
            ];
            for m in metrics {
                let fg = complexity_color(m.complexity);
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {:<28}", m.name),
                        Style::default().fg(Color::Rgb(224, 224, 224)),
                    ),
                    Span::styled(
                        format!("{:>3}  ", m.complexity),
                        Style::default().fg(fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(complexity_label(m.complexity), Style::default().fg(fg)),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("   line {}", m.line),
                    Style::default().fg(Color::Rgb(102, 102, 102)),
                )));
            }
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

// ── Import Lens ───────────────────────────────────────────────────────────────

fn status_color(status: &str) -> Color {
    match status {
        "installed" => Color::Rgb(76, 175, 80),
        "missing" => ERR,
        "stdlib" => Color::Rgb(79, 193, 255),
        "local" => Color::Rgb(155, 89, 182),
        _ => DIM,
    }
}

fn draw_imports(f: &mut Frame, state: &AppState, area: Rect) {
    match &state.tools.imports {
        ToolData::Idle => {}
        ToolData::Loading => placeholder(f, area, "Scanning imports...", DIM),
        ToolData::Failed(e) => placeholder(f, area, e, ERR),
        ToolData::Ready(imports) if imports.is_empty() => {
            placeholder(f, area, "No imports found.", DIM)
        }
        ToolData::Ready(imports) => {
            let mut lines = Vec::new();
            for (i, imp) in imports.iter().enumerate() {
                let selected = i == state.tools.imports_selected;
                let mut name_style = Style::default().fg(Color::Rgb(224, 224, 224));
                if selected {
                    name_style = name_style
                        .bg(Color::Rgb(42, 45, 46))
                        .add_modifier(Modifier::BOLD);
                }
                let detail = match (&imp.status[..], &imp.version) {
                    ("installed", Some(v)) => format!("v{v}"),
                    (status, _) => status.to_string(),
                };
                let mut spans = vec![
                    Span::styled("▌", Style::default().fg(status_color(&imp.status))),
                    Span::styled(format!(" {:<22}", imp.name), name_style),
                    Span::styled(detail, Style::default().fg(DIM)),
                ];
                if imp.status == "missing" {
                    let installing = state.tools.installing.as_deref() == Some(imp.name.as_str());
                    spans.push(Span::styled(
                        if installing { "  installing…" } else { "  i install" },
                        Style::default().fg(ERR),
                    ));
                }
                lines.push(Line::from(spans));
            }
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

// ── Bytecode Viewer ───────────────────────────────────────────────────────────

fn draw_bytecode(f: &mut Frame, state: &AppState, area: Rect) {
    match &state.tools.bytecode {
        ToolData::Idle => {}
        ToolData::Loading => placeholder(f, area, "Disassembling...", DIM),
        ToolData::Failed(e) => placeholder(f, area, e, ERR),
        ToolData::Ready(text) => {
            let lines: Vec<Line> = text
                .lines()
                .skip(state.tools.bytecode_scroll)
                .map(|l| {
                    Line::from(Span::styled(
                        format!(" {l}"),
                        Style::default().fg(Color::Rgb(212, 212, 212)),
                    ))
                })
                .collect();
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}
