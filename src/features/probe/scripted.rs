use crate::config::MeasurementPlan;
use crate::probe::{MeasurementKind, Probe, ProbeError, ProbeErrorKind, ProbeEvent, ProbeSummary};
use std::thread;
use std::time::Duration;

/// Offline probe that replays a plan at fixed rates.
///
/// Throughput ramps up over each phase and reaches the configured rate on
/// the last transfer, the way a real run warms up on small payloads.
#[derive(Clone, Debug)]
pub struct ScriptedProbe {
    pub download_bps: f64,
    pub upload_bps: f64,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    pub step_delay: Duration,
    /// Fail with an I/O error after this many transfers.
    pub fail_after: Option<usize>,
}

impl ScriptedProbe {
    pub fn steady(download_bps: f64, upload_bps: f64, latency_ms: f64, jitter_ms: f64) -> Self {
        Self {
            download_bps,
            upload_bps,
            latency_ms,
            jitter_ms,
            step_delay: Duration::ZERO,
            fail_after: None,
        }
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn failing_after(mut self, transfers: usize) -> Self {
        self.fail_after = Some(transfers);
        self
    }
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::steady(312_400_000.0, 41_800_000.0, 14.0, 2.6)
    }
}

impl Probe for ScriptedProbe {
    fn run(
        &mut self,
        plan: &MeasurementPlan,
        emit: &mut dyn FnMut(ProbeEvent),
    ) -> Result<(), ProbeError> {
        let totals = plan.totals();
        let mut summary = ProbeSummary::default();
        let mut downloads = 0u32;
        let mut uploads = 0u32;
        let mut transfers = 0usize;

        emit(ProbeEvent::RunningChange(true));
        for step in &plan.steps {
            for _ in 0..step.count {
                if self.fail_after.is_some_and(|limit| transfers >= limit) {
                    return Err(ProbeError::new(
                        ProbeErrorKind::Io,
                        format!("scripted failure after {transfers} transfers"),
                    ));
                }
                if !self.step_delay.is_zero() {
                    thread::sleep(self.step_delay);
                }
                transfers += 1;

                match step.kind {
                    MeasurementKind::Latency => {
                        summary.latency = Some(self.latency_ms);
                        summary.jitter = Some(self.jitter_ms);
                    }
                    MeasurementKind::Download => {
                        downloads += 1;
                        summary.download =
                            Some(self.download_bps * ramp(downloads, totals.downloads));
                    }
                    MeasurementKind::Upload => {
                        uploads += 1;
                        summary.upload = Some(self.upload_bps * ramp(uploads, totals.uploads));
                    }
                }
                emit(ProbeEvent::ResultsChange {
                    kind: step.kind,
                    summary,
                });
            }
        }

        emit(ProbeEvent::Finish(summary));
        emit(ProbeEvent::RunningChange(false));
        Ok(())
    }
}

fn ramp(seen: u32, total: u32) -> f64 {
    if total == 0 {
        return 1.0;
    }
    0.5 + 0.5 * (seen as f64 / total as f64).min(1.0)
}
