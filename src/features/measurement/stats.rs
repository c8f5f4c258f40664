/// Population standard deviation, recomputed from scratch over every value.
pub(crate) fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sum = 0.0;
    for value in values {
        sum += value;
    }
    let mean = sum / values.len() as f64;
    let mut variance_sum = 0.0;
    for value in values {
        let diff = value - mean;
        variance_sum += diff * diff;
    }
    (variance_sum / values.len() as f64).sqrt()
}

pub(crate) fn bits_to_mbps(bps: f64) -> f64 {
    bps / 1_000_000.0
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Missing, negative or non-finite probe values count as zero.
pub(crate) fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
