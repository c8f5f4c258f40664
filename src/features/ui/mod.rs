mod input;
mod render;
mod state;

use crate::app::AppState;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{QueueableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::warn;

use input::handle_key;
use render::{draw_body, draw_footer, draw_header, draw_help_popup, draw_terminal_too_small};
use state::{InputMode, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};

/// Owns the terminal while the UI runs and restores it on drop, including
/// when the loop exits with an error.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().queue(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        self.terminal.backend_mut().flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("failed to restore terminal: {err}");
        }
    }
}

pub fn run_ui(mut app: AppState) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let tick_rate = Duration::from_secs_f64(1.0 / f64::from(app.global.ui_refresh_hz.max(1)));
    let mut mode = InputMode::Normal;

    loop {
        let frame_started = Instant::now();
        if app.poll_events() {
            app.persist();
        }

        session.terminal.draw(|frame| {
            let size = frame.area();
            if size.width < MIN_TERMINAL_WIDTH || size.height < MIN_TERMINAL_HEIGHT {
                draw_terminal_too_small(frame, size);
                return;
            }

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(10),
                    Constraint::Length(1),
                ])
                .split(size);
            draw_header(frame, rows[0], &app);
            draw_body(frame, rows[1], &app);
            draw_footer(frame, rows[2], &app, mode);

            if mode == InputMode::Help {
                draw_help_popup(frame, size);
            }
        })?;

        let timeout = tick_rate.saturating_sub(frame_started.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && handle_key(key, &mut app, &mut mode)
        {
            break;
        }
    }

    Ok(())
}
