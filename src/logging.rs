use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "speedgauge.log";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the TUI owns the terminal.
    File(PathBuf),
    Disabled,
}

impl LogTarget {
    /// Log file under `dir`, or nothing at all when there is no directory
    /// to write into.
    pub fn for_tui(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => LogTarget::File(dir.join(LOG_FILE_NAME)),
            None => LogTarget::Disabled,
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str, target: LogTarget) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_target_writes_into_given_dir() {
        let target = LogTarget::for_tui(Some(PathBuf::from("/tmp/speedgauge")));
        assert_eq!(
            target,
            LogTarget::File(PathBuf::from("/tmp/speedgauge/speedgauge.log"))
        );
        assert_eq!(LogTarget::for_tui(None), LogTarget::Disabled);
    }
}
