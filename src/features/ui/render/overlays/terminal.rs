use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::super::super::state::{MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};

fn dimension_style(current: u16, minimum: u16) -> Style {
    if current < minimum {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

/// Shown instead of the dashboard while the terminal is below the minimum
/// size. A run in progress keeps going underneath.
pub(in crate::features::ui) fn draw_terminal_too_small(frame: &mut ratatui::Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::styled(
            "Window too small",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::raw("width "),
            Span::styled(
                area.width.to_string(),
                dimension_style(area.width, MIN_TERMINAL_WIDTH),
            ),
            Span::raw(format!("/{MIN_TERMINAL_WIDTH}  height ")),
            Span::styled(
                area.height.to_string(),
                dimension_style(area.height, MIN_TERMINAL_HEIGHT),
            ),
            Span::raw(format!("/{MIN_TERMINAL_HEIGHT}")),
        ]),
        Line::styled("q quits", Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" speedgauge "),
        );

    frame.render_widget(paragraph, area);
}
