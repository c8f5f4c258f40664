use crate::app::AppState;
use crate::measurement::TestPhase;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::InputMode;

/// Applies one key press. Returns true when the app should quit.
pub(super) fn handle_key(key: KeyEvent, app: &mut AppState, mode: &mut InputMode) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match (*mode, key.code) {
        (InputMode::Help, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) => {
            *mode = InputMode::Normal;
        }
        (InputMode::Help, _) => {}
        (InputMode::Normal, KeyCode::Char('q')) => return true,
        (InputMode::Normal, KeyCode::Char('?')) => *mode = InputMode::Help,
        (InputMode::Normal, KeyCode::Char('s') | KeyCode::Enter) => {
            if let Err(err) = app.start_run() {
                debug!("start ignored: {err}");
            }
        }
        (InputMode::Normal, KeyCode::Char('r')) if app.test.phase() == TestPhase::Complete => {
            app.reset();
        }
        (InputMode::Normal, _) => {}
    }
    false
}
