use crate::features::measurement::FinalResult;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn label(self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Grade {
    pub grade: LetterGrade,
    pub points: u8,
    pub description: &'static str,
}

/// School-style grade on its own 0-100 scale, weighted towards download
/// (50) over upload (20), latency (20) and jitter (10).
pub fn letter_grade(result: &FinalResult) -> Grade {
    let download = result.download_mbps;
    let upload = result.upload_mbps;
    let latency = result.latency_ms;
    let jitter = result.jitter_ms;

    let mut points = 0u8;

    points += if download >= 300.0 {
        50
    } else if download >= 100.0 {
        40
    } else if download >= 50.0 {
        30
    } else if download >= 25.0 {
        20
    } else {
        10
    };

    points += if upload >= 50.0 {
        20
    } else if upload >= 20.0 {
        15
    } else if upload >= 10.0 {
        10
    } else {
        5
    };

    points += if latency <= 10.0 {
        20
    } else if latency <= 30.0 {
        15
    } else if latency <= 50.0 {
        10
    } else {
        5
    };

    points += if jitter <= 2.0 {
        10
    } else if jitter <= 5.0 {
        7
    } else if jitter <= 10.0 {
        4
    } else {
        2
    };

    let (grade, description) = match points {
        90.. => (
            LetterGrade::APlus,
            "Exceptional connection - ready for anything",
        ),
        80..=89 => (LetterGrade::A, "Excellent speeds for all activities"),
        70..=79 => (LetterGrade::B, "Good connection for most uses"),
        60..=69 => (LetterGrade::C, "Average speeds - may struggle with 4K"),
        50..=59 => (LetterGrade::D, "Below average - consider upgrading"),
        _ => (LetterGrade::F, "Poor connection - upgrade recommended"),
    };

    Grade {
        grade,
        points,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(download: f64, upload: f64, latency: f64, jitter: f64) -> FinalResult {
        FinalResult {
            download_mbps: download,
            upload_mbps: upload,
            latency_ms: latency,
            jitter_ms: jitter,
            peak_download_mbps: download,
            peak_upload_mbps: upload,
            sample_count: 0,
        }
    }

    #[test]
    fn top_connection_gets_a_plus() {
        let grade = letter_grade(&result(940.0, 880.0, 4.0, 1.0));
        assert_eq!(grade.points, 100);
        assert_eq!(grade.grade, LetterGrade::APlus);
        assert_eq!(grade.grade.to_string(), "A+");
    }

    #[test]
    fn grade_bands() {
        // 40 + 15 + 15 + 7
        assert_eq!(letter_grade(&result(150.0, 25.0, 20.0, 4.0)).grade, LetterGrade::B);
        // 30 + 10 + 15 + 7
        assert_eq!(letter_grade(&result(60.0, 12.0, 25.0, 3.0)).grade, LetterGrade::C);
        // 20 + 10 + 10 + 10
        assert_eq!(letter_grade(&result(30.0, 10.0, 45.0, 1.0)).grade, LetterGrade::D);
        // 10 + 5 + 5 + 2
        let worst = letter_grade(&result(3.0, 0.5, 300.0, 40.0));
        assert_eq!(worst.points, 22);
        assert_eq!(worst.grade, LetterGrade::F);
    }

    #[test]
    fn a_grade_starts_at_eighty() {
        // 40 + 20 + 15 + 7
        let grade = letter_grade(&result(120.0, 60.0, 12.0, 4.0));
        assert_eq!(grade.points, 82);
        assert_eq!(grade.grade, LetterGrade::A);
    }
}
