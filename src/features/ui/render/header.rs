use crate::app::AppState;
use crate::measurement::TestPhase;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::state::InputMode;
use super::format::phase_color;

pub(in crate::features::ui) fn draw_header(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let phase = app.test.phase();
    let server = app.global.server.host_str().unwrap_or("?").to_string();
    let source = if app.is_simulated() {
        "simulated"
    } else {
        "network"
    };

    let header = Line::from(vec![
        Span::styled(
            " speedgauge ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled("Server:", Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {server} "), Style::default().fg(Color::White)),
        Span::raw("│ "),
        Span::styled("Plan:", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(" {} ", app.global.plan),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("│ "),
        Span::styled("Source:", Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {source} "), Style::default().fg(Color::Magenta)),
        Span::raw("│ "),
        Span::styled("Phase:", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(" {} ", phase.label()),
            Style::default().fg(phase_color(phase)),
        ),
    ]);

    let paragraph = Paragraph::new(header).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub(in crate::features::ui) fn draw_footer(
    frame: &mut ratatui::Frame,
    area: Rect,
    app: &AppState,
    mode: InputMode,
) {
    let hints = match (mode, app.test.phase()) {
        (InputMode::Help, _) => vec![("Esc", "Close")],
        (InputMode::Normal, TestPhase::Idle) => vec![("s", "Start"), ("?", "Help"), ("q", "Quit")],
        (InputMode::Normal, TestPhase::Complete) => {
            vec![("r", "Reset"), ("?", "Help"), ("q", "Quit")]
        }
        (InputMode::Normal, _) => vec![("?", "Help"), ("q", "Quit")],
    };

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(format!(" {key} "), Style::default().fg(Color::Yellow)),
                Span::styled(format!("{action} "), Style::default().fg(Color::Gray)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(footer, area);
}
