use crate::config::{GlobalConfig, PlanPreset};
use crate::measurement::{FinalResult, SpeedTest, TestPhase};
use crate::rating::{
    ActivityRating, AverageComparison, Grade, OverallScore, RatedMetric, Rating,
    compare_to_average, letter_grade, overall_score, rate, rate_activities,
};
use crate::storage::HistoryEntry;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Clone, Debug, Serialize)]
pub struct MetricReport {
    pub metric: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub rating: Rating,
}

/// Everything shown about a finished run, in one serialisable document.
#[derive(Clone, Debug, Serialize)]
pub struct ReportDocument {
    pub server: String,
    pub plan: PlanPreset,
    pub result: FinalResult,
    pub metrics: Vec<MetricReport>,
    pub score: OverallScore,
    pub grade: Grade,
    pub activities: Vec<ActivityRating>,
    pub comparison: AverageComparison,
}

impl ReportDocument {
    pub fn build(config: &GlobalConfig, result: &FinalResult) -> Self {
        let metrics = RatedMetric::ALL
            .iter()
            .map(|&metric| {
                let value = metric.value_of(result);
                MetricReport {
                    metric: metric.label(),
                    value,
                    unit: metric.unit(),
                    rating: rate(metric, value),
                }
            })
            .collect();

        Self {
            server: config.server.to_string(),
            plan: config.plan,
            result: *result,
            metrics,
            score: overall_score(result),
            grade: letter_grade(result),
            activities: rate_activities(result),
            comparison: compare_to_average(result),
        }
    }
}

pub fn render_json(doc: &ReportDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

pub fn render_text(doc: &ReportDocument) -> String {
    let mut out = String::new();
    let result = &doc.result;

    let _ = writeln!(out, "Speed test results ({} plan, {})", doc.plan, doc.server);
    let _ = writeln!(out);
    for metric in &doc.metrics {
        let _ = writeln!(
            out,
            "  {:<9} {:>8} {:<4}  {:<9} {}",
            metric.metric,
            format_value(metric.value, metric.unit),
            metric.unit,
            metric.rating.label,
            metric.rating.description,
        );
    }
    let _ = writeln!(
        out,
        "  Peak      {:.1} Mbps down, {:.1} Mbps up over {} samples",
        result.peak_download_mbps, result.peak_upload_mbps, result.sample_count
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Score {}/100 ({})  Grade {}",
        doc.score.score, doc.score.label, doc.grade.grade
    );
    let _ = writeln!(out, "  {}", doc.score.summary);
    let _ = writeln!(out, "  {}", doc.grade.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Activities");
    for rating in &doc.activities {
        let _ = writeln!(
            out,
            "  {:<15} {}  {:>3}",
            rating.activity.name,
            check_marks(rating.suitability.checks()),
            rating.score
        );
    }
    let _ = writeln!(out);
    let comparison = &doc.comparison;
    let _ = writeln!(
        out,
        "Against average: download {}, upload {}",
        signed_mbps(comparison.download_diff_mbps),
        signed_mbps(comparison.upload_diff_mbps)
    );
    out
}

/// One status line for plain output while a run is in progress.
pub fn progress_line(test: &SpeedTest) -> String {
    let phase = test.phase();
    let mut line = format!("[{:>3.0}%] {:<8}", test.progress(), phase.label());
    if matches!(phase, TestPhase::Download | TestPhase::Upload) {
        let _ = write!(line, " {:.1} Mbps", test.current_speed());
    }
    line
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No saved results yet.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<8} {:>10} {:>10} {:>7} {:>7} {:>5}",
        "recorded", "plan", "down Mbps", "up Mbps", "ping", "jitter", "score"
    );
    for entry in entries.iter().rev() {
        let result = &entry.result;
        let _ = writeln!(
            out,
            "{:<12} {:<8} {:>10.1} {:>10.1} {:>7.0} {:>7.0} {:>5}",
            entry.recorded_at_secs,
            entry.plan,
            result.download_mbps,
            result.upload_mbps,
            result.latency_ms,
            result.jitter_ms,
            entry.score
        );
    }
    out
}

fn format_value(value: f64, unit: &str) -> String {
    if unit == "ms" {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn check_marks(filled: u8) -> String {
    (0..3)
        .map(|idx| if idx < filled { '✓' } else { '·' })
        .collect()
}

fn signed_mbps(diff: f64) -> String {
    if diff >= 0.0 {
        format!("+{diff:.1} Mbps")
    } else {
        format!("{diff:.1} Mbps")
    }
}
