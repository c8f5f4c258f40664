mod aggregator;
mod stats;
mod timeline;

pub use aggregator::{SpeedTest, SpeedTestError};
pub use timeline::{StepStatus, TimelineStep, phase_timeline};

use crate::probe::{MeasurementKind, ProbeSummary};
use serde::{Deserialize, Serialize};
use stats::{bits_to_mbps, or_zero, population_stddev, round_to_tenth};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestPhase {
    #[default]
    Idle,
    Latency,
    Download,
    Upload,
    Complete,
}

impl TestPhase {
    pub fn label(self) -> &'static str {
        match self {
            TestPhase::Idle => "Idle",
            TestPhase::Latency => "Ping",
            TestPhase::Download => "Download",
            TestPhase::Upload => "Upload",
            TestPhase::Complete => "Done",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(
            self,
            TestPhase::Latency | TestPhase::Download | TestPhase::Upload
        )
    }

    pub fn from_kind(kind: MeasurementKind) -> Self {
        match kind {
            MeasurementKind::Latency => TestPhase::Latency,
            MeasurementKind::Download => TestPhase::Download,
            MeasurementKind::Upload => TestPhase::Upload,
        }
    }
}

/// One value read off a probe event: Mbps for throughput, ms for latency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementSample {
    pub kind: MeasurementKind,
    pub value: f64,
}

impl MeasurementSample {
    /// Extracts the value for `kind` from a cumulative summary.
    /// Returns `None` when the probe has not reported that metric yet.
    pub fn from_summary(kind: MeasurementKind, summary: &ProbeSummary) -> Option<Self> {
        let value = match kind {
            MeasurementKind::Latency => summary.latency?,
            MeasurementKind::Download => bits_to_mbps(summary.download?),
            MeasurementKind::Upload => bits_to_mbps(summary.upload?),
        };
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        Some(Self { kind, value })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunningStats {
    pub peak_download_mbps: f64,
    pub peak_upload_mbps: f64,
    pub sample_count: u64,
    pub sample_history: Vec<f64>,
    /// Population standard deviation of `sample_history`.
    pub variance: f64,
}

impl RunningStats {
    pub fn record(&mut self, sample: MeasurementSample) {
        match sample.kind {
            MeasurementKind::Download => {
                self.peak_download_mbps = self.peak_download_mbps.max(sample.value);
                self.sample_history.push(sample.value);
                self.variance = population_stddev(&self.sample_history);
            }
            MeasurementKind::Upload => {
                self.peak_upload_mbps = self.peak_upload_mbps.max(sample.value);
            }
            MeasurementKind::Latency => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    pub peak_download_mbps: f64,
    pub peak_upload_mbps: f64,
    pub sample_count: u64,
}

impl FinalResult {
    /// Final figures come from the probe's own summary; only the peaks and
    /// the sample count are carried over from the running stats.
    pub fn from_summary(summary: &ProbeSummary, stats: &RunningStats) -> Self {
        Self {
            download_mbps: round_to_tenth(bits_to_mbps(or_zero(summary.download))),
            upload_mbps: round_to_tenth(bits_to_mbps(or_zero(summary.upload))),
            latency_ms: or_zero(summary.latency).round(),
            jitter_ms: or_zero(summary.jitter).round(),
            peak_download_mbps: round_to_tenth(stats.peak_download_mbps),
            peak_upload_mbps: round_to_tenth(stats.peak_upload_mbps),
            sample_count: stats.sample_count,
        }
    }
}
