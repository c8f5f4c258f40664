mod format;
mod header;
mod history;
mod overlays;
mod progress;
mod results;

pub(super) use header::{draw_footer, draw_header};
pub(super) use overlays::{draw_help_popup, draw_terminal_too_small};

use crate::app::AppState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Progress on top, then results beside the history list.
pub(in crate::features::ui) fn draw_body(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(area);
    progress::draw_progress(frame, rows[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(50), Constraint::Length(34)])
        .split(rows[1]);
    results::draw_results(frame, columns[0], app);
    history::draw_history(frame, columns[1], app);
}
