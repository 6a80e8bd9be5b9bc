use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use thiserror::Error;

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Ingestion errors
// ---------------------------------------------------------------------------

/// Fatal ingestion failures. Anything here aborts the run before the
/// pipeline produces output; per-sample problems are never reported through
/// this type.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the configured decoders accepted the file bytes.
    #[error("no viable encoding for '{}' (tried: {tried})", .path.display())]
    NoViableEncoding { path: PathBuf, tried: String },

    /// The file decoded but is not a well-formed delimited table. This is
    /// not retried with further encodings.
    #[error("failed to parse '{}' as {encoding}", .path.display())]
    Parse {
        path: PathBuf,
        encoding: &'static str,
        #[source]
        source: csv::Error,
    },

    /// Required columns absent after header normalization.
    #[error("log is missing required columns 't' and 'distance'; found: {found:?}")]
    MissingColumns { found: Vec<String> },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a distance log from disk.
///
/// The file bytes are read once, then each encoding in `encodings` is tried
/// in order with a strict decode (no replacement characters). A decode
/// failure advances to the next candidate; any other failure aborts
/// immediately. Lines starting with `#` are treated as comments.
///
/// On success the table's headers are already normalized and validated
/// (see [`normalize_header`]); the winning encoding's name is kept on the
/// table for diagnostics.
pub fn load_log(path: &Path, encodings: &[&'static Encoding]) -> Result<RawTable, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for enc in encodings {
        let Some(text) = enc.decode_without_bom_handling_and_without_replacement(&bytes) else {
            log::debug!(
                "encoding {} cannot decode '{}', trying next",
                enc.name(),
                path.display()
            );
            continue;
        };
        // A UTF-8 BOM survives a strict decode; it must not end up in the
        // first header name.
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let (headers, rows) = parse_table(text).map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            encoding: enc.name(),
            source,
        })?;

        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        validate_columns(&headers)?;

        log::info!(
            "loaded '{}' with encoding {}: {} rows, columns {:?}",
            path.display(),
            enc.name(),
            rows.len(),
            headers
        );
        return Ok(RawTable {
            headers,
            rows,
            encoding: enc.name(),
        });
    }

    Err(IngestError::NoViableEncoding {
        path: path.to_path_buf(),
        tried: encodings
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

// ---------------------------------------------------------------------------
// Parsing and header normalization
// ---------------------------------------------------------------------------

/// Parse decoded text as a comma-delimited table with a header row.
/// `#`-prefixed lines are skipped as comments.
fn parse_table(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok((headers, rows))
}

/// Canonicalize one header name: drop a parenthetical unit annotation
/// ("t (s)" → "t"), trim, lowercase, and remap the legacy raw-distance
/// column onto `distance`.
pub fn normalize_header(name: &str) -> String {
    let base = match name.find('(') {
        Some(idx) => &name[..idx],
        None => name,
    };
    let canonical = base.trim().to_ascii_lowercase();
    if canonical == "x_raw" {
        "distance".to_string()
    } else {
        canonical
    }
}

fn validate_columns(headers: &[String]) -> Result<(), IngestError> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    if has("t") && has("distance") {
        Ok(())
    } else {
        Err(IngestError::MissingColumns {
            found: headers.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::*;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(bytes).expect("write temp file");
        file
    }

    #[test]
    fn normalizes_units_case_and_legacy_name() {
        assert_eq!(normalize_header("t (s)"), "t");
        assert_eq!(normalize_header("  Distance (cm) "), "distance");
        assert_eq!(normalize_header("x_raw (cm)"), "distance");
        assert_eq!(normalize_header("x_raw"), "distance");
        assert_eq!(normalize_header("T"), "t");
    }

    #[test]
    fn loads_commented_log_and_strips_units() {
        let file = write_temp(b"# collected with logger v1.2\nt (s),distance (cm)\n0.0,25\n0.05,24\n");
        let table = load_log(file.path(), &[UTF_8, WINDOWS_1252]).expect("load");
        assert_eq!(table.headers, vec!["t", "distance"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.encoding, "UTF-8");
    }

    #[test]
    fn falls_back_to_single_byte_encoding() {
        // 0xB5 is µ in windows-1252 but an invalid UTF-8 start byte.
        let file = write_temp(b"t,distance,unit\n0.0,25,\xb5s\n0.05,24,\xb5s\n");
        let table = load_log(file.path(), &[UTF_8, WINDOWS_1252]).expect("load");
        assert_eq!(table.encoding, "windows-1252");
        assert_eq!(table.rows[0][2], "µs");
    }

    #[test]
    fn no_viable_encoding_reports_candidates() {
        let file = write_temp(b"t,distance\n0.0,\xb5\n");
        let err = load_log(file.path(), &[UTF_8]).unwrap_err();
        match err {
            IngestError::NoViableEncoding { tried, .. } => assert_eq!(tried, "UTF-8"),
            other => panic!("expected NoViableEncoding, got {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_abort_without_trying_more_encodings() {
        let file = write_temp(b"t,distance\n0.0,25,extra\n");
        let err = load_log(file.path(), &[UTF_8, WINDOWS_1252]).unwrap_err();
        match err {
            IngestError::Parse { encoding, .. } => assert_eq!(encoding, "UTF-8"),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn missing_columns_list_what_was_found() {
        let file = write_temp(b"time,range\n0.0,25\n");
        let err = load_log(file.path(), &[UTF_8]).unwrap_err();
        match err {
            IngestError::MissingColumns { found } => {
                assert_eq!(found, vec!["time", "range"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn legacy_x_raw_column_satisfies_validation() {
        let file = write_temp(b"t (s),x_raw (cm),v_raw (cm/s)\n0.0,25,\n0.05,24,-20.0\n");
        let table = load_log(file.path(), &[UTF_8]).expect("load");
        assert_eq!(table.headers, vec!["t", "distance", "v_raw"]);
    }
}
