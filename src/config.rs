use crate::probe::MeasurementKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER: &str = "https://speed.cloudflare.com";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub server: Url,
    pub plan: PlanPreset,
    pub ui_refresh_hz: u16,
    pub transfer_timeout: Duration,
    /// Transfers shorter than this are too noisy to count towards throughput.
    pub min_request_duration: Duration,
    pub history_limit: usize,
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            plan: PlanPreset::Standard,
            ui_refresh_hz: 10,
            transfer_timeout: Duration::from_secs(30),
            min_request_duration: Duration::from_millis(10),
            history_limit: 20,
            log_level: "info".to_string(),
        }
    }
}

fn default_server() -> Url {
    Url::parse(DEFAULT_SERVER).expect("default server URL is valid")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPreset {
    Standard,
    Compact,
    Quick,
}

impl PlanPreset {
    pub fn parse_cli(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "full" => Some(PlanPreset::Standard),
            "compact" | "panel" => Some(PlanPreset::Compact),
            "quick" => Some(PlanPreset::Quick),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanPreset::Standard => "standard",
            PlanPreset::Compact => "compact",
            PlanPreset::Quick => "quick",
        }
    }

    pub fn plan(self) -> MeasurementPlan {
        match self {
            PlanPreset::Standard => MeasurementPlan::standard(),
            PlanPreset::Compact => MeasurementPlan::compact(),
            PlanPreset::Quick => MeasurementPlan::quick(),
        }
    }
}

impl fmt::Display for PlanPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One phase of a measurement plan: `count` transfers of `bytes` each.
/// Latency steps carry the packet count and zero bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub kind: MeasurementKind,
    pub bytes: u64,
    pub count: u32,
}

impl PlanStep {
    pub const fn latency(packets: u32) -> Self {
        Self {
            kind: MeasurementKind::Latency,
            bytes: 0,
            count: packets,
        }
    }

    pub const fn download(bytes: u64, count: u32) -> Self {
        Self {
            kind: MeasurementKind::Download,
            bytes,
            count,
        }
    }

    pub const fn upload(bytes: u64, count: u32) -> Self {
        Self {
            kind: MeasurementKind::Upload,
            bytes,
            count,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PlanTotals {
    pub latency_packets: u32,
    pub downloads: u32,
    pub uploads: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPlan {
    pub steps: Vec<PlanStep>,
}

impl MeasurementPlan {
    pub fn standard() -> Self {
        Self {
            steps: vec![
                PlanStep::latency(20),
                PlanStep::download(100_000, 10),
                PlanStep::download(1_000_000, 8),
                PlanStep::download(10_000_000, 6),
                PlanStep::download(25_000_000, 4),
                PlanStep::upload(100_000, 8),
                PlanStep::upload(1_000_000, 6),
                PlanStep::upload(5_000_000, 4),
            ],
        }
    }

    pub fn compact() -> Self {
        Self {
            steps: vec![
                PlanStep::latency(10),
                PlanStep::download(100_000, 2),
                PlanStep::download(1_000_000, 6),
                PlanStep::download(10_000_000, 4),
                PlanStep::upload(100_000, 2),
                PlanStep::upload(1_000_000, 4),
            ],
        }
    }

    pub fn quick() -> Self {
        Self {
            steps: vec![
                PlanStep::latency(4),
                PlanStep::download(100_000, 1),
                PlanStep::download(1_000_000, 4),
                PlanStep::download(10_000_000, 4),
                PlanStep::upload(100_000, 1),
                PlanStep::upload(1_000_000, 4),
            ],
        }
    }

    pub fn totals(&self) -> PlanTotals {
        let mut totals = PlanTotals::default();
        for step in &self.steps {
            match step.kind {
                MeasurementKind::Latency => totals.latency_packets += step.count,
                MeasurementKind::Download => totals.downloads += step.count,
                MeasurementKind::Upload => totals.uploads += step.count,
            }
        }
        totals
    }

    pub fn total_bytes(&self, kind: MeasurementKind) -> u64 {
        self.steps
            .iter()
            .filter(|step| step.kind == kind)
            .map(|step| step.bytes * u64::from(step.count))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_uses_fixed_transfer_sizes() {
        let plan = MeasurementPlan::standard();
        assert_eq!(plan.steps[0], PlanStep::latency(20));

        let download_sizes: Vec<u64> = plan
            .steps
            .iter()
            .filter(|s| s.kind == MeasurementKind::Download)
            .map(|s| s.bytes)
            .collect();
        assert_eq!(
            download_sizes,
            vec![100_000, 1_000_000, 10_000_000, 25_000_000]
        );

        let upload_sizes: Vec<u64> = plan
            .steps
            .iter()
            .filter(|s| s.kind == MeasurementKind::Upload)
            .map(|s| s.bytes)
            .collect();
        assert_eq!(upload_sizes, vec![100_000, 1_000_000, 5_000_000]);
    }

    #[test]
    fn plan_totals_count_transfers_per_kind() {
        let totals = MeasurementPlan::compact().totals();
        assert_eq!(totals.latency_packets, 10);
        assert_eq!(totals.downloads, 12);
        assert_eq!(totals.uploads, 6);
    }

    #[test]
    fn plans_run_latency_then_download_then_upload() {
        for preset in [PlanPreset::Standard, PlanPreset::Compact, PlanPreset::Quick] {
            let kinds: Vec<MeasurementKind> = preset.plan().steps.iter().map(|s| s.kind).collect();
            let mut sorted = kinds.clone();
            sorted.sort_by_key(|kind| match kind {
                MeasurementKind::Latency => 0,
                MeasurementKind::Download => 1,
                MeasurementKind::Upload => 2,
            });
            assert_eq!(kinds, sorted, "{preset} plan out of order");
        }
    }

    #[test]
    fn total_bytes_sums_step_payloads() {
        let plan = MeasurementPlan::quick();
        assert_eq!(
            plan.total_bytes(MeasurementKind::Download),
            100_000 + 4 * 1_000_000 + 4 * 10_000_000
        );
        assert_eq!(plan.total_bytes(MeasurementKind::Latency), 0);
    }

    #[test]
    fn plan_preset_parse_cli_accepts_aliases() {
        assert_eq!(PlanPreset::parse_cli("Standard"), Some(PlanPreset::Standard));
        assert_eq!(PlanPreset::parse_cli("panel"), Some(PlanPreset::Compact));
        assert_eq!(PlanPreset::parse_cli(" quick "), Some(PlanPreset::Quick));
        assert_eq!(PlanPreset::parse_cli("turbo"), None);
    }

    #[test]
    fn default_global_config_targets_cloudflare() {
        let global = GlobalConfig::default();
        assert_eq!(global.server.as_str(), "https://speed.cloudflare.com/");
        assert_eq!(global.plan, PlanPreset::Standard);
        assert_eq!(global.min_request_duration, Duration::from_millis(10));
    }
}
