use crate::config::MeasurementPlan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Latency,
    Download,
    Upload,
}

impl MeasurementKind {
    pub fn label(self) -> &'static str {
        match self {
            MeasurementKind::Latency => "latency",
            MeasurementKind::Download => "download",
            MeasurementKind::Upload => "upload",
        }
    }
}

/// Cumulative results reported by a probe.
///
/// Every event carries the probe's full summary at that moment, never a
/// delta. Throughput is in bits per second, latency and jitter in ms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeSummary {
    pub download: Option<f64>,
    pub upload: Option<f64>,
    pub latency: Option<f64>,
    pub jitter: Option<f64>,
}

#[derive(Clone, Debug)]
pub enum ProbeEvent {
    RunningChange(bool),
    ResultsChange {
        kind: MeasurementKind,
        summary: ProbeSummary,
    },
    Finish(ProbeSummary),
    Failed(ProbeError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProbeErrorKind {
    Init,
    Dns,
    Connect,
    Tls,
    HttpStatus,
    Timeout,
    Io,
}

impl ProbeErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeErrorKind::Init => "init",
            ProbeErrorKind::Dns => "dns",
            ProbeErrorKind::Connect => "connect",
            ProbeErrorKind::Tls => "tls",
            ProbeErrorKind::HttpStatus => "http_status",
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Io => "io",
        }
    }
}

#[derive(Clone, Debug, Error)]
#[error("{} error: {message}", kind.label())]
pub struct ProbeError {
    pub kind: ProbeErrorKind,
    pub message: String,
}

impl ProbeError {
    pub fn new(kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A measurement capability that executes a whole plan.
///
/// Implementations call `emit` synchronously for every event in order:
/// `RunningChange(true)`, one `ResultsChange` per completed transfer,
/// `Finish`, then `RunningChange(false)`. Returning `Err` aborts the run.
pub trait Probe: Send {
    fn run(
        &mut self,
        plan: &MeasurementPlan,
        emit: &mut dyn FnMut(ProbeEvent),
    ) -> Result<(), ProbeError>;
}
