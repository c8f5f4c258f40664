use crate::probe::{MeasurementKind, ProbeSummary};
use hdrhistogram::Histogram;
use std::time::Duration;

const THROUGHPUT_PERCENTILE: f64 = 0.90;
const LATENCY_HIGH_US: u64 = 60_000_000;

/// Accumulates raw transfer measurements and derives the cumulative
/// summary a probe reports after each transfer.
#[derive(Clone, Debug)]
pub(crate) struct ResultsCollector {
    min_request_duration: Duration,
    latencies_ms: Vec<f64>,
    download_bps: Vec<f64>,
    upload_bps: Vec<f64>,
}

impl ResultsCollector {
    pub(crate) fn new(min_request_duration: Duration) -> Self {
        Self {
            min_request_duration,
            latencies_ms: Vec::new(),
            download_bps: Vec::new(),
            upload_bps: Vec::new(),
        }
    }

    pub(crate) fn record_latency(&mut self, rtt: Duration) {
        self.latencies_ms.push(rtt.as_secs_f64() * 1000.0);
    }

    /// Returns false when the transfer was too short to count.
    pub(crate) fn record_transfer(
        &mut self,
        kind: MeasurementKind,
        bytes: u64,
        duration: Duration,
    ) -> bool {
        if duration < self.min_request_duration || duration.is_zero() {
            return false;
        }
        let bps = bytes as f64 * 8.0 / duration.as_secs_f64();
        match kind {
            MeasurementKind::Download => self.download_bps.push(bps),
            MeasurementKind::Upload => self.upload_bps.push(bps),
            MeasurementKind::Latency => return false,
        }
        true
    }

    pub(crate) fn summary(&self) -> ProbeSummary {
        ProbeSummary {
            download: throughput(&self.download_bps),
            upload: throughput(&self.upload_bps),
            latency: latency_median(&self.latencies_ms),
            jitter: jitter(&self.latencies_ms),
        }
    }
}

fn throughput(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(quantile(&sorted, THROUGHPUT_PERCENTILE))
}

fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let idx = ((values.len() - 1) as f64 * q).round() as usize;
    values[idx]
}

fn latency_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut histogram = Histogram::<u64>::new_with_bounds(1, LATENCY_HIGH_US, 3).ok()?;
    for value in values {
        let micros = (*value * 1000.0).max(1.0) as u64;
        histogram.saturating_record(micros);
    }
    Some(histogram.value_at_quantile(0.50) as f64 / 1000.0)
}

/// Mean absolute difference between consecutive latency samples.
fn jitter(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_reports_nothing() {
        let summary = ResultsCollector::new(Duration::from_millis(10)).summary();
        assert_eq!(summary, ProbeSummary::default());
    }

    #[test]
    fn short_transfers_are_excluded_from_throughput() {
        let mut collector = ResultsCollector::new(Duration::from_millis(10));
        assert!(!collector.record_transfer(
            MeasurementKind::Download,
            100_000,
            Duration::from_millis(2)
        ));
        assert!(collector.record_transfer(
            MeasurementKind::Download,
            6_250_000,
            Duration::from_millis(500)
        ));

        let summary = collector.summary();
        // 50 Mbit in half a second
        assert_eq!(summary.download, Some(100_000_000.0));
        assert_eq!(summary.upload, None);
    }

    #[test]
    fn throughput_uses_ninetieth_percentile() {
        let mut collector = ResultsCollector::new(Duration::ZERO);
        for mbit in 1..=10u64 {
            // mbit megabits in one second
            collector.record_transfer(
                MeasurementKind::Upload,
                mbit * 125_000,
                Duration::from_secs(1),
            );
        }
        assert_eq!(collector.summary().upload, Some(9_000_000.0));
    }

    #[test]
    fn latency_is_median_and_jitter_mean_consecutive_delta() {
        let mut collector = ResultsCollector::new(Duration::from_millis(10));
        for ms in [10, 14, 12, 16] {
            collector.record_latency(Duration::from_millis(ms));
        }
        let summary = collector.summary();

        let latency = summary.latency.expect("latency");
        assert!((latency - 12.0).abs() < 0.05, "latency {latency}");

        // |14-10| + |12-14| + |16-12| = 10 over 3 deltas
        let jitter = summary.jitter.expect("jitter");
        assert!((jitter - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn single_latency_sample_has_no_jitter() {
        let mut collector = ResultsCollector::new(Duration::from_millis(10));
        collector.record_latency(Duration::from_millis(20));
        assert!(collector.summary().jitter.is_none());
    }
}
