// ---------------------------------------------------------------------------
// RawTable – a parsed log file before any processing
// ---------------------------------------------------------------------------

/// A delimited log file parsed into memory, headers already normalized.
///
/// Produced by the loader; the pipeline consumes it to build a [`Series`].
/// `encoding` records which decoder succeeded, for diagnostics only.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Normalized header names (units stripped, lowercased, `x_raw` remapped).
    pub headers: Vec<String>,
    /// One entry per data row, cells in header order.
    pub rows: Vec<Vec<String>>,
    /// Name of the encoding that decoded the file.
    pub encoding: &'static str,
}

impl RawTable {
    /// Index of a column by its normalized name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// ExtraColumn – pass-through columns the pipeline does not touch
// ---------------------------------------------------------------------------

/// A column from the source log that is neither `t` nor `distance`.
/// Carried through to the export untouched, as raw text.
#[derive(Debug, Clone)]
pub struct ExtraColumn {
    pub name: String,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Series – the single artifact threaded through the pipeline
// ---------------------------------------------------------------------------

/// The measurement series plus its derived columns.
///
/// Row order is time order and is fixed once the time-delta stage has dropped
/// degenerate rows; later stages only rewrite columns. Undefined cells hold
/// `f64::NAN` (the missing-value marker), never ±infinity after sanitizing.
#[derive(Debug, Clone, Default)]
pub struct Series {
    /// Sample timestamps in seconds.
    pub t: Vec<f64>,
    /// Measured distance (conventionally centimeters).
    pub distance: Vec<f64>,
    /// Inter-sample time delta; NaN on the anchor row.
    pub dt: Vec<f64>,
    pub velocity_raw: Vec<f64>,
    pub acceleration_raw: Vec<f64>,
    /// Moving-average smoothed distance.
    pub distance_f: Vec<f64>,
    pub velocity_f: Vec<f64>,
    pub acceleration_f: Vec<f64>,
    /// Unrecognized source columns, passed through to the export.
    pub extras: Vec<ExtraColumn>,
}

impl Series {
    /// Build a series from a validated raw table.
    ///
    /// Cells of `t` / `distance` that fail numeric parsing become NaN; a NaN
    /// timestamp poisons the row's `dt`, so the epsilon guard removes it.
    pub fn from_table(table: &RawTable) -> Self {
        let t_idx = table.column_index("t");
        let d_idx = table.column_index("distance");

        let numeric = |idx: Option<usize>| -> Vec<f64> {
            table
                .rows
                .iter()
                .map(|row| {
                    idx.and_then(|i| row.get(i))
                        .and_then(|cell| cell.parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect()
        };

        let extras = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != t_idx && Some(*i) != d_idx)
            .map(|(i, name)| ExtraColumn {
                name: name.clone(),
                values: table
                    .rows
                    .iter()
                    .map(|row| row.get(i).cloned().unwrap_or_default())
                    .collect(),
            })
            .collect();

        Series {
            t: numeric(t_idx),
            distance: numeric(d_idx),
            extras,
            ..Series::default()
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Drop every row whose `keep` flag is false, renumbering contiguously.
    /// Relative order is preserved; populated columns shrink in lockstep.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len());

        fn retain_by<T>(values: &mut Vec<T>, keep: &[bool]) {
            if values.is_empty() {
                return;
            }
            let mut it = keep.iter();
            values.retain(|_| *it.next().unwrap_or(&true));
        }

        retain_by(&mut self.t, keep);
        retain_by(&mut self.distance, keep);
        retain_by(&mut self.dt, keep);
        retain_by(&mut self.velocity_raw, keep);
        retain_by(&mut self.acceleration_raw, keep);
        retain_by(&mut self.distance_f, keep);
        retain_by(&mut self.velocity_f, keep);
        retain_by(&mut self.acceleration_f, keep);
        for col in &mut self.extras {
            retain_by(&mut col.values, keep);
        }
    }

    /// Mutable access to every derived column, for the sanitizer.
    pub fn derived_columns_mut(&mut self) -> [&mut Vec<f64>; 6] {
        [
            &mut self.dt,
            &mut self.velocity_raw,
            &mut self.acceleration_raw,
            &mut self.distance_f,
            &mut self.velocity_f,
            &mut self.acceleration_f,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable {
            headers: vec!["t".into(), "distance".into(), "note".into()],
            rows: vec![
                vec!["0.0".into(), "12.5".into(), "start".into()],
                vec!["0.05".into(), "bad".into(), "".into()],
            ],
            encoding: "UTF-8",
        }
    }

    #[test]
    fn builds_numeric_columns_and_extras() {
        let s = Series::from_table(&table());
        assert_eq!(s.t, vec![0.0, 0.05]);
        assert_eq!(s.distance[0], 12.5);
        assert!(s.distance[1].is_nan());
        assert_eq!(s.extras.len(), 1);
        assert_eq!(s.extras[0].name, "note");
        assert_eq!(s.extras[0].values, vec!["start", ""]);
    }

    #[test]
    fn retain_rows_keeps_columns_in_lockstep() {
        let mut s = Series::from_table(&table());
        s.dt = vec![f64::NAN, 0.05];
        s.retain_rows(&[false, true]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.t, vec![0.05]);
        assert_eq!(s.dt.len(), 1);
        assert_eq!(s.extras[0].values, vec![""]);
    }
}
