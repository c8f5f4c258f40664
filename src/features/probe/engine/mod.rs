mod client;
mod helpers;

pub use client::{Transfer, TransferClient};

use crate::config::{GlobalConfig, MeasurementPlan};
use crate::features::probe::summary::ResultsCollector;
use crate::probe::{MeasurementKind, Probe, ProbeError, ProbeEvent};
use std::time::Duration;
use tracing::{debug, info};

/// Probe that measures against a speed test server over HTTP(S).
///
/// Latency requests ask for zero bytes and time the first byte; throughput
/// requests download or upload payloads of the sizes the plan lists.
pub struct CurlProbe {
    client: TransferClient,
    min_request_duration: Duration,
}

impl CurlProbe {
    pub fn new(config: &GlobalConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            client: TransferClient::new(config.server.clone(), config.transfer_timeout)?,
            min_request_duration: config.min_request_duration,
        })
    }
}

impl Probe for CurlProbe {
    fn run(
        &mut self,
        plan: &MeasurementPlan,
        emit: &mut dyn FnMut(ProbeEvent),
    ) -> Result<(), ProbeError> {
        let mut collector = ResultsCollector::new(self.min_request_duration);
        info!(steps = plan.steps.len(), "probe run started");
        emit(ProbeEvent::RunningChange(true));

        for step in &plan.steps {
            for _ in 0..step.count {
                match step.kind {
                    MeasurementKind::Latency => {
                        let rtt = self.client.latency()?;
                        debug!(rtt_ms = rtt.as_secs_f64() * 1000.0, "latency sample");
                        collector.record_latency(rtt);
                    }
                    MeasurementKind::Download | MeasurementKind::Upload => {
                        let transfer = if step.kind == MeasurementKind::Download {
                            self.client.download(step.bytes)?
                        } else {
                            self.client.upload(step.bytes)?
                        };
                        let counted =
                            collector.record_transfer(step.kind, transfer.bytes, transfer.duration);
                        debug!(
                            kind = step.kind.label(),
                            bytes = transfer.bytes,
                            duration_ms = transfer.duration.as_secs_f64() * 1000.0,
                            counted,
                            "transfer finished"
                        );
                    }
                }
                emit(ProbeEvent::ResultsChange {
                    kind: step.kind,
                    summary: collector.summary(),
                });
            }
        }

        let summary = collector.summary();
        info!(?summary, "probe run finished");
        emit(ProbeEvent::Finish(summary));
        emit(ProbeEvent::RunningChange(false));
        Ok(())
    }
}
