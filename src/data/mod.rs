/// Data layer: log ingestion and the kinematic-derivative pipeline.
///
/// Architecture:
/// ```text
///   distance log (.csv, mixed encodings, # comments)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode (strategy list) → parse → normalize headers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Series   │  t, distance + derived columns
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ kinematics  │  dt guard → raw diffs → smooth → filtered diffs → sanitize
///   └────────────┘
///        │
///        ├──▶ stats    (sample rate, summary – read-only)
///        └──▶ export   (processed CSV)
/// ```
pub mod export;
pub mod kinematics;
pub mod loader;
pub mod model;
pub mod stats;

use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use kinematics::SmoothingMode;
use loader::IngestError;
use model::{RawTable, Series};

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// All pipeline tunables in one value. Passed in explicitly so independent
/// runs (and tests) never share configuration through globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Moving-average window size in samples.
    pub window: usize,
    /// Rows with `dt` at or below this many seconds are dropped.
    pub dt_epsilon: f64,
    /// Which moving-average policy smooths the distance signal.
    pub smoothing: SmoothingMode,
    /// Decoders tried in order during ingestion.
    pub encodings: Vec<&'static Encoding>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 5,
            dt_epsilon: 1e-4,
            smoothing: SmoothingMode::Centered,
            encodings: vec![UTF_8, WINDOWS_1252],
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline driver
// ---------------------------------------------------------------------------

/// Run the full transform over an ingested table.
///
/// Stages run in fixed order with no feedback; every per-sample problem is
/// recovered locally as a missing value, so this never fails once the table
/// has been validated by the loader.
pub fn process(table: &RawTable, config: &PipelineConfig) -> Series {
    let mut series = Series::from_table(table);
    let loaded = series.len();

    let dropped = kinematics::compute_time_deltas(&mut series, config.dt_epsilon);
    if dropped > 0 {
        log::warn!(
            "dropped {dropped} of {loaded} rows with dt <= {} s",
            config.dt_epsilon
        );
    }

    kinematics::raw_derivatives(&mut series);
    kinematics::smooth_distance(&mut series, config.window, config.smoothing);
    kinematics::filtered_derivatives(&mut series);

    let replaced = kinematics::sanitize(&mut series);
    if replaced > 0 {
        log::warn!("replaced {replaced} infinite cells with missing values");
    }

    series
}

/// Load and process in one call.
pub fn analyze(path: &Path, config: &PipelineConfig) -> Result<Series, IngestError> {
    let table = loader::load_log(path, &config.encodings)?;
    Ok(process(&table, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> RawTable {
        RawTable {
            headers: vec!["t".into(), "distance".into()],
            rows: rows
                .iter()
                .map(|(t, d)| vec![t.to_string(), d.to_string()])
                .collect(),
            encoding: "UTF-8",
        }
    }

    #[test]
    fn static_object_yields_zero_derivatives() {
        let table = table(&[
            ("0", "10"),
            ("0.05", "10"),
            ("0.10", "10"),
            ("0.15", "10"),
        ]);
        let config = PipelineConfig {
            window: 3,
            ..PipelineConfig::default()
        };
        let s = process(&table, &config);

        assert_eq!(s.len(), 4);
        assert!(s.dt[0].is_nan());
        assert!(s.dt.iter().skip(1).all(|&dt| (dt - 0.05).abs() < 1e-12));

        assert!(s.velocity_raw[0].is_nan());
        assert!(s.velocity_raw.iter().skip(1).all(|&v| v == 0.0));
        assert!(s.acceleration_raw[0].is_nan() && s.acceleration_raw[1].is_nan());
        assert!(s.acceleration_raw.iter().skip(2).all(|&a| a == 0.0));

        assert!(s.distance_f.iter().all(|&d| d == 10.0));
        assert!(s.velocity_f.iter().skip(1).all(|&v| v == 0.0));
        assert!(s.acceleration_f.iter().skip(2).all(|&a| a == 0.0));
    }

    #[test]
    fn duplicate_timestamp_rows_are_absent_from_the_output() {
        let table = table(&[
            ("0", "10"),
            ("0.05", "11"),
            ("0.05", "12"),
            ("0.10", "13"),
        ]);
        let s = process(&table, &PipelineConfig::default());
        assert_eq!(s.len(), 3);
        assert_eq!(s.t, vec![0.0, 0.05, 0.10]);
    }

    #[test]
    fn no_derived_cell_is_infinite() {
        // Tiny but above-epsilon dt to stress the divisions.
        let table = table(&[("0", "0"), ("0.001", "1e308"), ("0.002", "-1e308")]);
        let mut s = process(&table, &PipelineConfig::default());
        for column in s.derived_columns_mut() {
            assert!(column.iter().all(|v| v.is_finite() || v.is_nan()));
        }
    }
}
