use crate::common::time::{Clock, SystemClock};
use crate::config::{GlobalConfig, PlanPreset};
use crate::measurement::FinalResult;
use crate::rating::overall_score;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const STATE_FILE_VERSION: &str = "1";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read state file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("state file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: String,
    pub global_config: GlobalConfig,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One completed run, newest entries last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recorded_at_secs: u64,
    pub server: String,
    pub plan: PlanPreset,
    pub result: FinalResult,
    pub score: u8,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_FILE_VERSION.to_string(),
            global_config: GlobalConfig::default(),
            history: Vec::new(),
        }
    }
}

impl PersistedState {
    /// Appends `result` measured under `config` to history, dropping the
    /// oldest entries beyond the limit. The stored `global_config` is left
    /// untouched.
    pub fn record_result(&mut self, config: &GlobalConfig, result: &FinalResult) -> &HistoryEntry {
        self.record_result_at(&SystemClock, config, result)
    }

    pub(crate) fn record_result_at(
        &mut self,
        clock: &dyn Clock,
        config: &GlobalConfig,
        result: &FinalResult,
    ) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            recorded_at_secs: clock.unix_secs(),
            server: config.server.to_string(),
            plan: config.plan,
            result: *result,
            score: overall_score(result).score,
        };
        self.history.push(entry);

        let limit = config.history_limit.max(1);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
        &self.history[self.history.len() - 1]
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("speedgauge"))
}

fn state_file_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("state.json"))
}

/// Directory for the TUI log file, next to the state file.
pub fn log_dir() -> Option<PathBuf> {
    config_dir()
}

/// Reads the state file. A missing file or config directory yields the
/// default state; an unreadable one is an error the caller may log and
/// replace with the default.
pub fn load() -> Result<PersistedState, LoadError> {
    match state_file_path() {
        Some(path) => load_from(&path),
        None => Ok(PersistedState::default()),
    }
}

fn load_from(path: &Path) -> Result<PersistedState, LoadError> {
    if !path.exists() {
        return Ok(PersistedState::default());
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(state: &PersistedState) -> io::Result<()> {
    let Some(path) = state_file_path() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine config directory",
        ));
    };
    save_to(&path, state)
}

fn save_to(path: &Path, state: &PersistedState) -> io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir)?;
    }

    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            UNIX_EPOCH + Duration::from_secs(self.0)
        }
    }

    fn result(download_mbps: f64) -> FinalResult {
        FinalResult {
            download_mbps,
            upload_mbps: 20.0,
            latency_ms: 15.0,
            jitter_ms: 3.0,
            peak_download_mbps: download_mbps,
            peak_upload_mbps: 20.0,
            sample_count: 12,
        }
    }

    fn temp_state_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("speedgauge-test-{name}-{}", Uuid::new_v4()))
            .join("state.json")
    }

    #[test]
    fn default_state_is_valid() {
        let state = PersistedState::default();
        assert_eq!(state.version, STATE_FILE_VERSION);
        assert!(state.history.is_empty());
    }

    #[test]
    fn record_result_stamps_time_and_score() {
        let mut state = PersistedState::default();
        let config = GlobalConfig::default();
        let entry = state.record_result_at(&FixedClock(1_700_000_000), &config, &result(300.0));

        assert_eq!(entry.recorded_at_secs, 1_700_000_000);
        assert_eq!(entry.plan, PlanPreset::Standard);
        assert_eq!(entry.score, overall_score(&result(300.0)).score);
    }

    #[test]
    fn record_result_uses_run_config_without_storing_it() {
        let mut state = PersistedState::default();
        let mut run_config = state.global_config.clone();
        run_config.plan = PlanPreset::Quick;
        run_config.server = url::Url::parse("http://localhost:8080/").expect("url");

        let entry = state.record_result_at(&FixedClock(7), &run_config, &result(80.0));
        assert_eq!(entry.plan, PlanPreset::Quick);
        assert_eq!(entry.server, "http://localhost:8080/");

        assert_eq!(state.global_config.plan, PlanPreset::Standard);
        assert_eq!(state.global_config.server, GlobalConfig::default().server);
    }

    #[test]
    fn history_is_capped_dropping_oldest() {
        let mut state = PersistedState::default();
        let config = GlobalConfig {
            history_limit: 3,
            ..GlobalConfig::default()
        };
        for download in [10.0, 20.0, 30.0, 40.0, 50.0] {
            state.record_result_at(&FixedClock(0), &config, &result(download));
        }

        let downloads: Vec<f64> = state
            .history
            .iter()
            .map(|entry| entry.result.download_mbps)
            .collect();
        assert_eq!(downloads, vec![30.0, 40.0, 50.0]);
    }

    #[test]
    fn save_then_load_keeps_history() {
        let path = temp_state_path("roundtrip");
        let mut state = PersistedState::default();
        let config = state.global_config.clone();
        state.record_result_at(&FixedClock(42), &config, &result(123.5));
        save_to(&path, &state).expect("save");

        let loaded = load_from(&path).expect("load");
        assert_eq!(loaded.history, state.history);
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn missing_file_loads_default() {
        let path = temp_state_path("missing");
        let loaded = load_from(&path).expect("load");
        assert!(loaded.history.is_empty());
        assert_eq!(loaded.version, STATE_FILE_VERSION);
    }

    #[test]
    fn corrupt_file_is_reported_as_parse_error() {
        let path = temp_state_path("corrupt");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("dir");
        }
        fs::write(&path, "{ not json").expect("write");

        let err = load_from(&path).expect_err("corrupt file");
        assert!(matches!(err, LoadError::Parse { .. }));
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
