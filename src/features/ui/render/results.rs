use crate::app::AppState;
use crate::measurement::TestPhase;
use crate::report::ReportDocument;
use crate::rating::Suitability;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::format::{bar, format_mbps, format_ms, score_color, tier_color};

const BAR_WIDTH: usize = 16;

pub(super) fn draw_results(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let Some(result) = app.test.results() else {
        draw_placeholder(frame, area, app);
        return;
    };
    let doc = ReportDocument::build(&app.global, result);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = Vec::new();
    for metric in &doc.metrics {
        let value = if metric.unit == "ms" {
            format_ms(metric.value)
        } else {
            format_mbps(metric.value)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<9}", metric.metric),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{value:>11}  "),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                metric.rating.label,
                Style::default().fg(tier_color(metric.rating.tier)),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Score ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/100 {}", doc.score.score, doc.score.label),
            Style::default()
                .fg(score_color(doc.score.score))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Grade ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            doc.grade.grade.label(),
            Style::default()
                .fg(score_color(doc.grade.points))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(doc.score.summary.clone()));
    lines.push(Line::styled(
        doc.grade.description,
        Style::default().fg(Color::Gray),
    ));

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Results "));
    frame.render_widget(summary, columns[0]);

    let mut side = Vec::new();
    for rating in &doc.activities {
        let checks = rating.suitability.checks() as usize;
        let color = match rating.suitability {
            Suitability::Ideal => Color::Green,
            Suitability::Good => Color::Blue,
            Suitability::Marginal => Color::Yellow,
            Suitability::Unsuitable => Color::Red,
        };
        side.push(Line::from(vec![
            Span::styled(
                format!("{:<15}", rating.activity.name),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("✓".repeat(checks), Style::default().fg(color)),
            Span::styled("·".repeat(3 - checks), Style::default().fg(Color::DarkGray)),
        ]));
    }
    side.push(Line::from(""));

    let comparison = &doc.comparison;
    side.push(comparison_line(
        "You ↓",
        comparison.download_bar_pct,
        result.download_mbps,
        Color::Cyan,
    ));
    side.push(comparison_line(
        "Avg ↓",
        comparison.average_download_bar_pct,
        crate::rating::AVERAGE_DOWNLOAD_MBPS,
        Color::DarkGray,
    ));
    side.push(comparison_line(
        "You ↑",
        comparison.upload_bar_pct,
        result.upload_mbps,
        Color::Magenta,
    ));
    side.push(comparison_line(
        "Avg ↑",
        comparison.average_upload_bar_pct,
        crate::rating::AVERAGE_UPLOAD_MBPS,
        Color::DarkGray,
    ));

    let activities = Paragraph::new(side).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Activities & average "),
    );
    frame.render_widget(activities, columns[1]);
}

fn comparison_line(label: &'static str, pct: f64, mbps: f64, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<6}"), Style::default().fg(Color::Gray)),
        Span::styled(bar(pct, BAR_WIDTH), Style::default().fg(color)),
        Span::raw(format!(" {mbps:.0}")),
    ])
}

fn draw_placeholder(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let message = match app.test.phase() {
        TestPhase::Idle => format!(
            "Press s to test against {}",
            app.global.server.host_str().unwrap_or("the server")
        ),
        TestPhase::Complete => "Run finished without results. Press r to reset.".to_string(),
        _ => "Measuring...".to_string(),
    };
    let paragraph = Paragraph::new(Line::styled(message, Style::default().fg(Color::DarkGray)))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Results "));
    frame.render_widget(paragraph, area);
}
