use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Series;

// ---------------------------------------------------------------------------
// Processed-CSV export
// ---------------------------------------------------------------------------

/// Column order of the canonical export, ahead of any pass-through extras.
const CANONICAL_COLUMNS: [&str; 8] = [
    "t",
    "distance",
    "dt",
    "velocity_raw",
    "acceleration_raw",
    "distance_f",
    "velocity_f",
    "acceleration_f",
];

/// Write the processed series as CSV. Missing cells become empty fields;
/// after sanitizing there are no infinities left to write.
pub fn write_csv<W: Write>(series: &Series, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut headers: Vec<&str> = CANONICAL_COLUMNS.to_vec();
    for col in &series.extras {
        headers.push(&col.name);
    }
    w.write_record(&headers).context("writing CSV header")?;

    for i in 0..series.len() {
        let mut record: Vec<String> = vec![
            format_cell(series.t[i]),
            format_cell(series.distance[i]),
            format_cell(series.dt[i]),
            format_cell(series.velocity_raw[i]),
            format_cell(series.acceleration_raw[i]),
            format_cell(series.distance_f[i]),
            format_cell(series.velocity_f[i]),
            format_cell(series.acceleration_f[i]),
        ];
        for col in &series.extras {
            record.push(col.values.get(i).cloned().unwrap_or_default());
        }
        w.write_record(&record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    w.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export to a file path.
pub fn export_file(series: &Series, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating '{}'", path.display()))?;
    write_csv(series, file)?;
    log::info!("saved processed data to '{}'", path.display());
    Ok(())
}

/// Suggested export name for a log file stem, e.g. `processed_run1_w5.csv`.
pub fn suggested_filename(stem: &str, window: usize) -> String {
    format!("processed_{stem}_w{window}.csv")
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::data::model::ExtraColumn;

    use super::*;

    #[test]
    fn writes_canonical_columns_then_extras() {
        let series = Series {
            t: vec![0.0, 0.05],
            distance: vec![25.0, 24.0],
            dt: vec![f64::NAN, 0.05],
            velocity_raw: vec![f64::NAN, -20.0],
            acceleration_raw: vec![f64::NAN, f64::NAN],
            distance_f: vec![24.5, 24.5],
            velocity_f: vec![f64::NAN, 0.0],
            acceleration_f: vec![f64::NAN, f64::NAN],
            extras: vec![ExtraColumn {
                name: "note".into(),
                values: vec!["start".into(), "".into()],
            }],
        };

        let mut buf = Vec::new();
        write_csv(&series, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf-8");
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "t,distance,dt,velocity_raw,acceleration_raw,distance_f,velocity_f,acceleration_f,note"
        );
        assert_eq!(lines.next().unwrap(), "0,25,,,,24.5,,,start");
        assert_eq!(lines.next().unwrap(), "0.05,24,0.05,-20,,24.5,0,,");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn suggested_name_carries_stem_and_window() {
        assert_eq!(suggested_filename("run1", 5), "processed_run1_w5.csv");
    }
}
