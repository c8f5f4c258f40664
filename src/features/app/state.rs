use crate::config::GlobalConfig;
use crate::measurement::{SpeedTest, SpeedTestError, TestPhase};
use crate::probe::{Probe, ProbeError};
use crate::probe_engine::{CurlProbe, ScriptedProbe};
use crate::runtime::{RunHandle, spawn_probe_run};
use crate::storage::{self, HistoryEntry, PersistedState};
use crossbeam_channel::TryRecvError;
use tracing::{info, warn};

/// Where a run's measurements come from.
#[derive(Clone, Debug)]
pub enum ProbeSource {
    Network,
    Simulated(ScriptedProbe),
}

impl ProbeSource {
    pub fn is_simulated(&self) -> bool {
        matches!(self, ProbeSource::Simulated(_))
    }

    /// Builds the probe on the worker thread that will run it.
    pub fn into_factory(
        self,
        config: GlobalConfig,
    ) -> impl FnOnce() -> Result<Box<dyn Probe>, ProbeError> + Send + 'static {
        move || {
            let probe: Box<dyn Probe> = match self {
                ProbeSource::Network => Box::new(CurlProbe::new(&config)?),
                ProbeSource::Simulated(probe) => Box::new(probe),
            };
            Ok(probe)
        }
    }
}

pub struct AppState {
    /// Stored config with this session's command-line overrides applied.
    /// Only the stored config is written back to disk.
    pub global: GlobalConfig,
    pub test: SpeedTest,
    pub save_history: bool,
    source: ProbeSource,
    state: PersistedState,
    run: Option<RunHandle>,
    recorded: bool,
}

impl AppState {
    pub fn new(
        state: PersistedState,
        global: GlobalConfig,
        source: ProbeSource,
        save_history: bool,
    ) -> Self {
        Self {
            test: SpeedTest::new(&global.plan.plan()),
            global,
            save_history,
            source,
            state,
            run: None,
            recorded: false,
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    pub fn is_simulated(&self) -> bool {
        self.source.is_simulated()
    }

    pub fn is_running(&self) -> bool {
        self.test.phase().is_running()
    }

    pub fn start_run(&mut self) -> Result<(), SpeedTestError> {
        self.test.start()?;
        self.recorded = false;
        let factory = self.source.clone().into_factory(self.global.clone());
        self.run = Some(spawn_probe_run(factory, self.global.plan.plan()));
        Ok(())
    }

    /// Abandons the current run, if any. Events the old worker still sends
    /// are never applied.
    pub fn reset(&mut self) {
        self.run = None;
        self.test.reset();
        self.recorded = false;
    }

    /// Applies pending probe events. Returns true when this call completed a
    /// run and added it to history. Simulated runs are never recorded.
    pub fn poll_events(&mut self) -> bool {
        let mut worker_done = false;
        if let Some(run) = &self.run {
            loop {
                match run.events.try_recv() {
                    Ok(event) => self.test.apply(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        worker_done = true;
                        break;
                    }
                }
            }
        }
        if worker_done && let Some(run) = self.run.take() {
            run.finish();
            if self.test.phase().is_running() {
                warn!("probe worker stopped without finishing the run");
                self.test.reset();
            }
        }
        self.record_completed()
    }

    fn record_completed(&mut self) -> bool {
        if self.recorded || self.test.phase() != TestPhase::Complete {
            return false;
        }
        let Some(result) = self.test.results().copied() else {
            return false;
        };
        self.recorded = true;
        if !self.save_history {
            return false;
        }
        if self.is_simulated() {
            info!("simulated result not added to history");
            return false;
        }
        let entry = self.state.record_result(&self.global, &result);
        info!(id = %entry.id, score = entry.score, "result added to history");
        true
    }

    /// Writes history and config to disk when saving is enabled.
    pub fn persist(&self) {
        if !self.save_history {
            return;
        }
        if let Err(err) = storage::save(&self.state) {
            warn!("failed to save state: {err}");
        }
    }
}
