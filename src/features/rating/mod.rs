mod activity;
mod comparison;
mod grade;

pub use activity::{ACTIVITIES, Activity, ActivityRating, Suitability, rate_activities, rate_activity};
pub use comparison::{
    AVERAGE_DOWNLOAD_MBPS, AVERAGE_UPLOAD_MBPS, AverageComparison, COMPARISON_SCALE_MBPS,
    compare_to_average,
};
pub use grade::{Grade, LetterGrade, letter_grade};

use crate::features::measurement::FinalResult;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatedMetric {
    Download,
    Upload,
    Latency,
    Jitter,
}

impl RatedMetric {
    pub const ALL: [RatedMetric; 4] = [
        RatedMetric::Download,
        RatedMetric::Upload,
        RatedMetric::Latency,
        RatedMetric::Jitter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatedMetric::Download => "Download",
            RatedMetric::Upload => "Upload",
            RatedMetric::Latency => "Ping",
            RatedMetric::Jitter => "Jitter",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            RatedMetric::Download | RatedMetric::Upload => "Mbps",
            RatedMetric::Latency | RatedMetric::Jitter => "ms",
        }
    }

    pub fn value_of(self, result: &FinalResult) -> f64 {
        match self {
            RatedMetric::Download => result.download_mbps,
            RatedMetric::Upload => result.upload_mbps,
            RatedMetric::Latency => result.latency_ms,
            RatedMetric::Jitter => result.jitter_ms,
        }
    }

    fn thresholds(self) -> Thresholds {
        match self {
            RatedMetric::Download => Thresholds::higher_is_better(500.0, 100.0, 25.0),
            RatedMetric::Upload => Thresholds::higher_is_better(100.0, 20.0, 5.0),
            RatedMetric::Latency => Thresholds::lower_is_better(20.0, 50.0, 100.0),
            RatedMetric::Jitter => Thresholds::lower_is_better(5.0, 15.0, 30.0),
        }
    }

    /// Overall score points for excellent, great, good and anything worse.
    fn points(self) -> [u8; 4] {
        match self {
            RatedMetric::Download => [40, 30, 20, 10],
            RatedMetric::Upload => [25, 20, 15, 5],
            RatedMetric::Latency => [25, 20, 15, 5],
            RatedMetric::Jitter => [10, 8, 5, 2],
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Thresholds {
    excellent: f64,
    great: f64,
    good: f64,
    higher_is_better: bool,
}

impl Thresholds {
    const fn higher_is_better(excellent: f64, great: f64, good: f64) -> Self {
        Self {
            excellent,
            great,
            good,
            higher_is_better: true,
        }
    }

    const fn lower_is_better(excellent: f64, great: f64, good: f64) -> Self {
        Self {
            excellent,
            great,
            good,
            higher_is_better: false,
        }
    }

    fn tier(&self, value: f64) -> RatingTier {
        let meets = |threshold: f64| {
            if self.higher_is_better {
                value >= threshold
            } else {
                value <= threshold
            }
        };
        if meets(self.excellent) {
            RatingTier::Excellent
        } else if meets(self.great) {
            RatingTier::Great
        } else if meets(self.good) {
            RatingTier::Good
        } else {
            RatingTier::Low
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    Excellent,
    Great,
    Good,
    Low,
}

impl RatingTier {
    fn index(self) -> usize {
        match self {
            RatingTier::Excellent => 0,
            RatingTier::Great => 1,
            RatingTier::Good => 2,
            RatingTier::Low => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Rating {
    pub tier: RatingTier,
    pub label: &'static str,
    pub color_class: &'static str,
    pub description: &'static str,
}

pub fn rate(metric: RatedMetric, value: f64) -> Rating {
    let tier = metric.thresholds().tier(value);
    let label = match tier {
        RatingTier::Excellent => "Excellent",
        RatingTier::Great => "Great",
        RatingTier::Good => "Good",
        RatingTier::Low => match metric {
            RatedMetric::Download | RatedMetric::Upload => "Slow",
            RatedMetric::Latency => "High",
            RatedMetric::Jitter => "Unstable",
        },
    };
    let color_class = match tier {
        RatingTier::Excellent => "text-green-400",
        RatingTier::Great => "text-blue-400",
        RatingTier::Good => "text-yellow-400",
        RatingTier::Low => "text-red-400",
    };

    Rating {
        tier,
        label,
        color_class,
        description: describe(metric, tier),
    }
}

pub fn rate_download(mbps: f64) -> Rating {
    rate(RatedMetric::Download, mbps)
}

pub fn rate_upload(mbps: f64) -> Rating {
    rate(RatedMetric::Upload, mbps)
}

pub fn rate_latency(ms: f64) -> Rating {
    rate(RatedMetric::Latency, ms)
}

pub fn rate_jitter(ms: f64) -> Rating {
    rate(RatedMetric::Jitter, ms)
}

fn describe(metric: RatedMetric, tier: RatingTier) -> &'static str {
    match (metric, tier) {
        (RatedMetric::Download, RatingTier::Excellent) => {
            "Great for 4K streaming, gaming, and large downloads on many devices"
        }
        (RatedMetric::Download, RatingTier::Great) => {
            "Handles 4K streaming and busy households comfortably"
        }
        (RatedMetric::Download, RatingTier::Good) => "Suitable for HD streaming and video calls",
        (RatedMetric::Download, RatingTier::Low) => "May struggle with video streaming",
        (RatedMetric::Upload, RatingTier::Excellent) => {
            "Large uploads and live streaming finish quickly"
        }
        (RatedMetric::Upload, RatingTier::Great) => "Smooth video calls and cloud backups",
        (RatedMetric::Upload, RatingTier::Good) => "Fine for video calls and photo uploads",
        (RatedMetric::Upload, RatingTier::Low) => "Video calls and uploads may stall",
        (RatedMetric::Latency, RatingTier::Excellent) => "Ideal for competitive gaming",
        (RatedMetric::Latency, RatingTier::Great) => "Responsive for gaming and video calls",
        (RatedMetric::Latency, RatingTier::Good) => "Fine for browsing and streaming",
        (RatedMetric::Latency, RatingTier::Low) => "Noticeable delay in calls and games",
        (RatedMetric::Jitter, RatingTier::Excellent) => "Very stable connection",
        (RatedMetric::Jitter, RatingTier::Great) => "Stable enough for real-time apps",
        (RatedMetric::Jitter, RatingTier::Good) => "Occasional hiccups in calls",
        (RatedMetric::Jitter, RatingTier::Low) => "Calls and games may stutter",
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub download: u8,
    pub upload: u8,
    pub latency: u8,
    pub jitter: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.download + self.upload + self.latency + self.jitter
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OverallScore {
    pub score: u8,
    pub label: &'static str,
    pub summary: String,
    pub breakdown: ScoreBreakdown,
}

/// Weighted 0-100 score: download 40, upload 25, latency 25, jitter 10.
pub fn overall_score(result: &FinalResult) -> OverallScore {
    let points = |metric: RatedMetric| {
        let tier = metric.thresholds().tier(metric.value_of(result));
        metric.points()[tier.index()]
    };
    let breakdown = ScoreBreakdown {
        download: points(RatedMetric::Download),
        upload: points(RatedMetric::Upload),
        latency: points(RatedMetric::Latency),
        jitter: points(RatedMetric::Jitter),
    };
    let score = breakdown.total();

    let (label, verdict) = if score >= 90 {
        (
            "Excellent",
            "Fast enough for 4K streaming, competitive gaming and big uploads on several devices at once.",
        )
    } else if score >= 70 {
        (
            "Great",
            "Handles HD streaming, video calls and online gaming comfortably.",
        )
    } else if score >= 50 {
        (
            "Good",
            "Fine for browsing, HD streaming and the occasional video call.",
        )
    } else {
        (
            "Fair",
            "Expect buffering and laggy calls; a faster plan would help.",
        )
    };

    OverallScore {
        score,
        label,
        summary: format!("Your connection scores {score}/100. {verdict}"),
        breakdown,
    }
}
