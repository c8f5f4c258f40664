use crate::features::measurement::FinalResult;
use serde::Serialize;

pub const AVERAGE_DOWNLOAD_MBPS: f64 = 150.0;
pub const AVERAGE_UPLOAD_MBPS: f64 = 20.0;
/// Speed that fills a comparison bar completely.
pub const COMPARISON_SCALE_MBPS: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AverageComparison {
    pub download_diff_mbps: f64,
    pub upload_diff_mbps: f64,
    pub download_bar_pct: f64,
    pub upload_bar_pct: f64,
    pub average_download_bar_pct: f64,
    pub average_upload_bar_pct: f64,
}

impl AverageComparison {
    pub fn download_above_average(&self) -> bool {
        self.download_diff_mbps >= 0.0
    }

    pub fn upload_above_average(&self) -> bool {
        self.upload_diff_mbps >= 0.0
    }
}

pub fn compare_to_average(result: &FinalResult) -> AverageComparison {
    AverageComparison {
        download_diff_mbps: result.download_mbps - AVERAGE_DOWNLOAD_MBPS,
        upload_diff_mbps: result.upload_mbps - AVERAGE_UPLOAD_MBPS,
        download_bar_pct: bar_pct(result.download_mbps),
        upload_bar_pct: bar_pct(result.upload_mbps),
        average_download_bar_pct: bar_pct(AVERAGE_DOWNLOAD_MBPS),
        average_upload_bar_pct: bar_pct(AVERAGE_UPLOAD_MBPS),
    }
}

fn bar_pct(mbps: f64) -> f64 {
    (mbps * 100.0 / COMPARISON_SCALE_MBPS).clamp(0.0, 100.0)
}
