use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::super::format::centered_rect;
use crate::rating::{AVERAGE_DOWNLOAD_MBPS, AVERAGE_UPLOAD_MBPS};

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), Style::default().fg(Color::Green)),
        Span::raw(action),
    ])
}

pub(in crate::features::ui) fn draw_help_popup(frame: &mut ratatui::Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "  Keyboard Shortcuts  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key_line("s / Enter", "Start a speed test"),
        key_line("r", "Reset after a finished test"),
        key_line("?", "Toggle this help"),
        key_line("q/Ctrl+C", "Quit application"),
        Line::from(""),
        Line::styled("─── Reading results ───", Style::default().fg(Color::Yellow)),
        Line::from("  Ping is the median round trip of small requests."),
        Line::from("  Jitter is the average change between pings."),
        Line::from("  Speeds are the 90th percentile of transfers."),
        Line::from(format!(
            "  Averages compared against: {AVERAGE_DOWNLOAD_MBPS:.0} down, {AVERAGE_UPLOAD_MBPS:.0} up (Mbps)."
        )),
        Line::from(""),
        Line::styled(
            "  Press Esc or ? to close  ",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .style(Style::default().bg(Color::Black))
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}
