use crate::features::measurement::FinalResult;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Activity {
    pub name: &'static str,
    pub min_download_mbps: f64,
    pub min_upload_mbps: f64,
    pub max_latency_ms: f64,
}

pub const ACTIVITIES: [Activity; 6] = [
    Activity {
        name: "HD Streaming",
        min_download_mbps: 5.0,
        min_upload_mbps: 1.0,
        max_latency_ms: 100.0,
    },
    Activity {
        name: "4K Streaming",
        min_download_mbps: 25.0,
        min_upload_mbps: 3.0,
        max_latency_ms: 100.0,
    },
    Activity {
        name: "Video Calls",
        min_download_mbps: 10.0,
        min_upload_mbps: 10.0,
        max_latency_ms: 150.0,
    },
    Activity {
        name: "Gaming",
        min_download_mbps: 25.0,
        min_upload_mbps: 5.0,
        max_latency_ms: 50.0,
    },
    Activity {
        name: "Large Uploads",
        min_download_mbps: 10.0,
        min_upload_mbps: 50.0,
        max_latency_ms: 200.0,
    },
    Activity {
        name: "Work From Home",
        min_download_mbps: 25.0,
        min_upload_mbps: 10.0,
        max_latency_ms: 100.0,
    },
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Ideal,
    Good,
    Marginal,
    Unsuitable,
}

impl Suitability {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Suitability::Ideal,
            60..=79 => Suitability::Good,
            40..=59 => Suitability::Marginal,
            _ => Suitability::Unsuitable,
        }
    }

    /// Number of filled check marks shown for this level, out of three.
    pub fn checks(self) -> u8 {
        match self {
            Suitability::Ideal => 3,
            Suitability::Good => 2,
            Suitability::Marginal => 1,
            Suitability::Unsuitable => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActivityRating {
    pub activity: Activity,
    pub score: u8,
    pub suitability: Suitability,
}

/// 0-100 fit of a result for one activity: download 40, upload 30 and
/// latency 30, with partial credit below the minimums.
pub fn rate_activity(result: &FinalResult, activity: &Activity) -> ActivityRating {
    let download = result.download_mbps;
    let upload = result.upload_mbps;
    let latency = result.latency_ms;
    let mut score = 0.0;

    score += if download >= activity.min_download_mbps * 4.0 {
        40.0
    } else if download >= activity.min_download_mbps * 2.0 {
        30.0
    } else if download >= activity.min_download_mbps {
        20.0
    } else {
        download / activity.min_download_mbps * 20.0
    };

    score += if upload >= activity.min_upload_mbps * 4.0 {
        30.0
    } else if upload >= activity.min_upload_mbps * 2.0 {
        22.0
    } else if upload >= activity.min_upload_mbps {
        15.0
    } else {
        upload / activity.min_upload_mbps * 15.0
    };

    score += if latency <= activity.max_latency_ms / 4.0 {
        30.0
    } else if latency <= activity.max_latency_ms / 2.0 {
        22.0
    } else if latency <= activity.max_latency_ms {
        15.0
    } else {
        (15.0 - (latency - activity.max_latency_ms) / 10.0).max(0.0)
    };

    let score = score.round().clamp(0.0, 100.0) as u8;
    ActivityRating {
        activity: *activity,
        score,
        suitability: Suitability::from_score(score),
    }
}

pub fn rate_activities(result: &FinalResult) -> Vec<ActivityRating> {
    ACTIVITIES
        .iter()
        .map(|activity| rate_activity(result, activity))
        .collect()
}
