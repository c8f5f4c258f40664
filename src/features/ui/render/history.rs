use crate::app::AppState;
use crate::common::time::{Clock, SystemClock};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};

use super::format::{format_age, score_color};

pub(super) fn draw_history(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let now = SystemClock.unix_secs();
    let title = if !app.save_history {
        " History (not saving) "
    } else if app.is_simulated() {
        " History (simulated runs not saved) "
    } else {
        " History "
    };

    let items: Vec<ListItem> = app
        .history()
        .iter()
        .rev()
        .map(|entry| {
            let result = &entry.result;
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<9}", format_age(now, entry.recorded_at_secs)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(
                    "↓{:>6.1} ↑{:>5.1} ",
                    result.download_mbps, result.upload_mbps
                )),
                Span::styled(
                    format!("{:>3}", entry.score),
                    Style::default().fg(score_color(entry.score)),
                ),
            ]))
        })
        .collect();

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Line::styled(
            "No results yet",
            Style::default().fg(Color::DarkGray),
        ))])
    } else {
        List::new(items)
    };
    frame.render_widget(
        list.block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}
