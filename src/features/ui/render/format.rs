use crate::measurement::{StepStatus, TestPhase};
use crate::rating::RatingTier;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(super) fn format_mbps(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.2} Gbps", mbps / 1000.0)
    } else {
        format!("{mbps:.1} Mbps")
    }
}

pub(super) fn format_ms(ms: f64) -> String {
    format!("{ms:.0} ms")
}

pub(super) fn phase_color(phase: TestPhase) -> Color {
    match phase {
        TestPhase::Idle => Color::DarkGray,
        TestPhase::Latency => Color::Yellow,
        TestPhase::Download => Color::Cyan,
        TestPhase::Upload => Color::Magenta,
        TestPhase::Complete => Color::Green,
    }
}

pub(super) fn step_style(phase: TestPhase, status: StepStatus) -> Style {
    match status {
        StepStatus::Done => Style::default().fg(Color::Green),
        StepStatus::Active => Style::default().fg(phase_color(phase)),
        StepStatus::Pending => Style::default().fg(Color::DarkGray),
    }
}

pub(super) fn step_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Done => "●",
        StepStatus::Active => "◉",
        StepStatus::Pending => "○",
    }
}

pub(super) fn tier_color(tier: RatingTier) -> Color {
    match tier {
        RatingTier::Excellent => Color::Green,
        RatingTier::Great => Color::Blue,
        RatingTier::Good => Color::Yellow,
        RatingTier::Low => Color::Red,
    }
}

pub(super) fn score_color(score: u8) -> Color {
    match score {
        90.. => Color::Green,
        70..=89 => Color::Blue,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Horizontal bar of `width` cells filled to `pct` percent.
pub(super) fn bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let mut out = "█".repeat(filled);
    out.push_str(&"░".repeat(width - filled));
    out
}

pub(super) fn format_age(now_secs: u64, recorded_secs: u64) -> String {
    let age = now_secs.saturating_sub(recorded_secs);
    if age < 60 {
        "just now".to_string()
    } else if age < 3600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mbps_switches_to_gbps() {
        assert_eq!(format_mbps(312.44), "312.4 Mbps");
        assert_eq!(format_mbps(1250.0), "1.25 Gbps");
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(50.0, 4), "██░░");
        assert_eq!(bar(0.0, 3), "░░░");
        assert_eq!(bar(250.0, 3), "███");
    }

    #[test]
    fn age_buckets() {
        assert_eq!(format_age(100, 90), "just now");
        assert_eq!(format_age(1000, 100), "15m ago");
        assert_eq!(format_age(8000, 0), "2h ago");
        assert_eq!(format_age(200_000, 0), "2d ago");
        assert_eq!(format_age(0, 50), "just now");
    }
}
