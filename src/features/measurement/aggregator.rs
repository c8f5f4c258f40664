use super::{FinalResult, MeasurementSample, RunningStats, TestPhase};
use crate::config::{MeasurementPlan, PlanTotals};
use crate::probe::{MeasurementKind, ProbeError, ProbeEvent, ProbeSummary};
use thiserror::Error;
use tracing::{debug, error, info, warn};

const LATENCY_PROGRESS: f64 = 10.0;
const DOWNLOAD_PROGRESS_END: f64 = 60.0;
const UPLOAD_PROGRESS_END: f64 = 95.0;
const COMPLETE_PROGRESS: f64 = 100.0;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum SpeedTestError {
    #[error("a speed test can only start from idle (currently {phase:?})")]
    NotIdle { phase: TestPhase },
}

/// Single owner of speed test state for one run at a time.
///
/// The phase mirrors whatever the probe reports; the only transitions this
/// type makes on its own are `start` (idle to latency), completion, and
/// `reset` back to idle.
#[derive(Clone, Debug)]
pub struct SpeedTest {
    totals: PlanTotals,
    phase: TestPhase,
    progress: f64,
    current_speed: f64,
    downloads_seen: u32,
    uploads_seen: u32,
    stats: RunningStats,
    results: Option<FinalResult>,
}

impl SpeedTest {
    pub fn new(plan: &MeasurementPlan) -> Self {
        Self {
            totals: plan.totals(),
            phase: TestPhase::Idle,
            progress: 0.0,
            current_speed: 0.0,
            downloads_seen: 0,
            uploads_seen: 0,
            stats: RunningStats::default(),
            results: None,
        }
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    /// Progress in percent, within [0, 100] and non-decreasing during a run.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Latest cumulative throughput of the active phase, in Mbps.
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    pub fn results(&self) -> Option<&FinalResult> {
        self.results.as_ref()
    }

    pub fn start(&mut self) -> Result<(), SpeedTestError> {
        if self.phase != TestPhase::Idle {
            return Err(SpeedTestError::NotIdle { phase: self.phase });
        }
        self.clear();
        self.phase = TestPhase::Latency;
        info!(
            downloads = self.totals.downloads,
            uploads = self.totals.uploads,
            "speed test started"
        );
        Ok(())
    }

    pub fn apply(&mut self, event: ProbeEvent) {
        match event {
            ProbeEvent::RunningChange(running) => self.on_running_change(running),
            ProbeEvent::ResultsChange { kind, summary } => self.on_results_change(kind, &summary),
            ProbeEvent::Finish(summary) => self.on_finish(&summary),
            ProbeEvent::Failed(err) => self.fail(&err),
        }
    }

    pub fn on_running_change(&mut self, running: bool) {
        debug!(running, phase = ?self.phase, "probe running state changed");
        if !running && self.phase.is_running() {
            self.phase = TestPhase::Complete;
            self.advance_progress(COMPLETE_PROGRESS);
        }
    }

    /// `summary` is the probe's full cumulative state, not an increment.
    pub fn on_results_change(&mut self, kind: MeasurementKind, summary: &ProbeSummary) {
        if !self.phase.is_running() {
            warn!(kind = kind.label(), phase = ?self.phase, "ignoring probe results outside a run");
            return;
        }

        self.phase = TestPhase::from_kind(kind);
        self.stats.sample_count += 1;
        let sample = MeasurementSample::from_summary(kind, summary);

        match kind {
            MeasurementKind::Latency => {
                self.advance_progress(LATENCY_PROGRESS);
            }
            MeasurementKind::Download => {
                self.downloads_seen += 1;
                self.take_throughput(sample);
                let target = phase_progress(
                    LATENCY_PROGRESS,
                    DOWNLOAD_PROGRESS_END,
                    self.downloads_seen,
                    self.totals.downloads,
                );
                self.advance_progress(target);
            }
            MeasurementKind::Upload => {
                self.uploads_seen += 1;
                self.take_throughput(sample);
                let target = phase_progress(
                    DOWNLOAD_PROGRESS_END,
                    UPLOAD_PROGRESS_END,
                    self.uploads_seen,
                    self.totals.uploads,
                );
                self.advance_progress(target);
            }
        }

        debug!(
            kind = kind.label(),
            progress = self.progress,
            current_speed = self.current_speed,
            "probe results applied"
        );
    }

    pub fn on_finish(&mut self, summary: &ProbeSummary) {
        if self.phase == TestPhase::Idle {
            warn!("ignoring probe finish outside a run");
            return;
        }
        let result = FinalResult::from_summary(summary, &self.stats);
        info!(
            download_mbps = result.download_mbps,
            upload_mbps = result.upload_mbps,
            latency_ms = result.latency_ms,
            jitter_ms = result.jitter_ms,
            "speed test complete"
        );
        self.results = Some(result);
        self.phase = TestPhase::Complete;
        self.advance_progress(COMPLETE_PROGRESS);
    }

    /// Aborts the run. Nothing partial is kept and nothing is retried.
    pub fn fail(&mut self, err: &ProbeError) {
        error!(kind = err.kind.label(), "speed test error: {}", err.message);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.clear();
        self.phase = TestPhase::Idle;
    }

    fn clear(&mut self) {
        self.progress = 0.0;
        self.current_speed = 0.0;
        self.downloads_seen = 0;
        self.uploads_seen = 0;
        self.stats = RunningStats::default();
        self.results = None;
    }

    fn take_throughput(&mut self, sample: Option<MeasurementSample>) {
        if let Some(sample) = sample {
            self.current_speed = sample.value;
            self.stats.record(sample);
        }
    }

    fn advance_progress(&mut self, target: f64) {
        self.progress = self.progress.max(target).clamp(0.0, COMPLETE_PROGRESS);
    }
}

fn phase_progress(start: f64, end: f64, seen: u32, total: u32) -> f64 {
    let fraction = if total == 0 {
        1.0
    } else {
        (seen as f64 / total as f64).min(1.0)
    };
    start + fraction * (end - start)
}

#[cfg(test)]
mod tests;
