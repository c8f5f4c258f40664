use crate::app::AppState;
use crate::measurement::{TestPhase, phase_timeline};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use super::format::{format_mbps, phase_color, step_marker, step_style};

pub(super) fn draw_progress(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let test = &app.test;
    let phase = test.phase();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(phase_color(phase)))
        .title(" Progress ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let mut label = format!("{:.0}%  {}", test.progress(), phase.label());
    if matches!(phase, TestPhase::Download | TestPhase::Upload) {
        label.push_str(&format!("  {}", format_mbps(test.current_speed())));
    }
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(phase_color(phase)).bg(Color::Black))
        .ratio(test.progress() / 100.0)
        .label(Span::styled(
            label,
            Style::default().add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, rows[0]);

    let mut timeline = Vec::new();
    for (idx, step) in phase_timeline(phase).iter().enumerate() {
        if idx > 0 {
            timeline.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        timeline.push(Span::styled(
            format!("{} {}", step_marker(step.status), step.phase.label()),
            step_style(step.phase, step.status),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(timeline)), rows[2]);

    let stats = test.stats();
    let live = Line::from(vec![
        Span::styled("Peak ↓ ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_mbps(stats.peak_download_mbps)),
        Span::styled("  Peak ↑ ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_mbps(stats.peak_upload_mbps)),
        Span::styled("  Spread ±", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{:.1}", stats.variance)),
        Span::styled("  Samples ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.sample_count.to_string()),
    ]);
    frame.render_widget(Paragraph::new(live), rows[3]);
}
