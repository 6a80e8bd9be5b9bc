use super::model::Series;

// ---------------------------------------------------------------------------
// Time-delta computation
// ---------------------------------------------------------------------------

/// Fill `dt` with backward time differences and drop degenerate rows.
///
/// `dt[i] = t[i] - t[i-1]`; the first row is kept as the anchor with
/// `dt = NaN`. Every later row with `dt <= epsilon` is removed — duplicate
/// timestamps, out-of-order samples, and sub-resolution jitter would all
/// blow up the divisions downstream. Returns the number of rows dropped.
pub fn compute_time_deltas(series: &mut Series, epsilon: f64) -> usize {
    let n = series.len();
    let mut dt = Vec::with_capacity(n);
    for i in 0..n {
        if i == 0 {
            dt.push(f64::NAN);
        } else {
            dt.push(series.t[i] - series.t[i - 1]);
        }
    }
    series.dt = dt;

    let keep: Vec<bool> = series
        .dt
        .iter()
        .enumerate()
        .map(|(i, &dt)| i == 0 || dt > epsilon)
        .collect();
    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped > 0 {
        series.retain_rows(&keep);
    }
    dropped
}

// ---------------------------------------------------------------------------
// Finite differences
// ---------------------------------------------------------------------------

/// First-order backward difference of `values` over the shared `dt` column.
/// Index 0 has no predecessor and carries NaN; NaN operands propagate.
fn backward_difference(values: &[f64], dt: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i == 0 {
                f64::NAN
            } else {
                (values[i] - values[i - 1]) / dt[i]
            }
        })
        .collect()
}

/// Velocity and acceleration straight from the unsmoothed distance.
///
/// Deliberately lag-accurate rather than noise-robust: noise handling lives
/// entirely in the smoothing path, so "raw" always means the unmodified
/// physical estimate.
pub fn raw_derivatives(series: &mut Series) {
    series.velocity_raw = backward_difference(&series.distance, &series.dt);
    series.acceleration_raw = backward_difference(&series.velocity_raw, &series.dt);
}

/// Velocity and acceleration from the smoothed distance, using the same
/// differencing rule and the same `dt` column as the raw path. Differences
/// between the raw and filtered series are then attributable purely to the
/// position-domain smoothing.
pub fn filtered_derivatives(series: &mut Series) {
    series.velocity_f = backward_difference(&series.distance_f, &series.dt);
    series.acceleration_f = backward_difference(&series.velocity_f, &series.dt);
}

// ---------------------------------------------------------------------------
// Smoothing filter
// ---------------------------------------------------------------------------

/// Moving-average policy for the distance signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingMode {
    /// Window centered on each index; near the boundaries the window shrinks
    /// down to a single sample, so the filtered series has no gaps.
    Centered,
    /// Window covering the current and previous `window - 1` samples; the
    /// undefined leading stretch is back-filled from the first defined mean.
    Trailing,
}

/// Compute the smoothed distance column with the configured policy.
/// A window of 1 is the identity.
pub fn smooth_distance(series: &mut Series, window: usize, mode: SmoothingMode) {
    let window = window.max(1);
    series.distance_f = match mode {
        SmoothingMode::Centered => moving_average_centered(&series.distance, window),
        SmoothingMode::Trailing => moving_average_trailing(&series.distance, window),
    };
}

/// Centered moving average with edge shrinking (minimum effective window of
/// one sample). Non-finite samples inside a window are skipped; a window
/// with no finite samples yields NaN.
fn moving_average_centered(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let left = (window - 1) / 2;
    let right = window / 2;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right).min(n.saturating_sub(1));
            window_mean(&values[lo..=hi])
        })
        .collect()
}

/// Trailing moving average: defined only where a full window of finite
/// samples is available, then the leading gap is back-filled.
fn moving_average_trailing(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            if i + 1 < window {
                return f64::NAN;
            }
            let slice = &values[i + 1 - window..=i];
            if slice.iter().all(|v| v.is_finite()) {
                slice.iter().sum::<f64>() / window as f64
            } else {
                f64::NAN
            }
        })
        .collect();

    // Back-fill: each NaN takes the next defined value.
    let mut next_valid = f64::NAN;
    for v in out.iter_mut().rev() {
        if v.is_nan() {
            *v = next_valid;
        } else {
            next_valid = *v;
        }
    }
    out
}

fn window_mean(slice: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in slice {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Sanitizer
// ---------------------------------------------------------------------------

/// Replace ±infinity with NaN in every derived column.
///
/// Catches degenerate divisions that slip past the epsilon guard, e.g.
/// numerical edge cases at the filter boundary. Returns the number of cells
/// replaced.
pub fn sanitize(series: &mut Series) -> usize {
    let mut replaced = 0;
    for column in series.derived_columns_mut() {
        for v in column.iter_mut() {
            if v.is_infinite() {
                *v = f64::NAN;
                replaced += 1;
            }
        }
    }
    replaced
}
