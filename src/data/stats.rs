use super::model::Series;

// ---------------------------------------------------------------------------
// Sample-rate estimator
// ---------------------------------------------------------------------------

/// Estimated sample rate in Hz: `round(1 / mean(dt), 1)` over the retained
/// finite `dt` values. `None` when the series has no usable deltas or the
/// mean is non-positive — diagnostics show a placeholder instead of the
/// pipeline dividing by zero.
pub fn sample_rate(series: &Series) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &dt in &series.dt {
        if dt.is_finite() {
            sum += dt;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    if !(mean > 0.0) {
        return None;
    }
    Some((10.0 / mean).round() / 10.0)
}

// ---------------------------------------------------------------------------
// Summary reporter
// ---------------------------------------------------------------------------

/// Read-only summary of a processed series. Maxima ignore missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Total duration, `max(t)` in seconds.
    pub duration: Option<f64>,
    pub max_velocity_raw: Option<f64>,
    pub max_velocity_f: Option<f64>,
    pub max_acceleration_raw: Option<f64>,
    pub max_acceleration_f: Option<f64>,
    /// Rows retained after time-delta filtering.
    pub rows: usize,
}

/// Produce the summary. Pure reader: the series is not touched and the
/// export contents do not depend on this.
pub fn summarize(series: &Series) -> Summary {
    Summary {
        duration: finite_max(&series.t),
        max_velocity_raw: finite_max(&series.velocity_raw),
        max_velocity_f: finite_max(&series.velocity_f),
        max_acceleration_raw: finite_max(&series.acceleration_raw),
        max_acceleration_f: finite_max(&series.acceleration_f),
        rows: series.len(),
    }
}

fn finite_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_rounds_to_one_decimal() {
        let s = Series {
            t: vec![0.0, 0.25, 0.75],
            dt: vec![f64::NAN, 0.25, 0.5],
            ..Series::default()
        };
        // mean(dt) = 0.375, 1/mean = 2.666… → 2.7
        assert_eq!(sample_rate(&s), Some(2.7));
    }

    #[test]
    fn sample_rate_undefined_below_two_samples() {
        let one_row = Series {
            t: vec![0.0],
            dt: vec![f64::NAN],
            ..Series::default()
        };
        assert_eq!(sample_rate(&one_row), None);
        assert_eq!(sample_rate(&Series::default()), None);
    }

    #[test]
    fn maxima_ignore_missing_cells() {
        let s = Series {
            t: vec![0.0, 0.05, 0.10],
            velocity_raw: vec![f64::NAN, -4.0, 2.5],
            acceleration_raw: vec![f64::NAN, f64::NAN, 130.0],
            velocity_f: vec![f64::NAN, f64::NAN, f64::NAN],
            ..Series::default()
        };
        let summary = summarize(&s);
        assert_eq!(summary.duration, Some(0.10));
        assert_eq!(summary.max_velocity_raw, Some(2.5));
        assert_eq!(summary.max_acceleration_raw, Some(130.0));
        assert_eq!(summary.max_velocity_f, None);
        assert_eq!(summary.rows, 3);
    }
}
