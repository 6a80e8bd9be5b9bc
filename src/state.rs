use std::path::{Path, PathBuf};

use crate::data::model::{RawTable, Series};
use crate::data::stats::{self, Summary};
use crate::data::{export, loader, process, PipelineConfig};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A log file that has been ingested but not necessarily processed with the
/// current configuration. Kept around so window-size changes can reprocess
/// without touching the disk again.
pub struct LoadedLog {
    pub table: RawTable,
    pub path: PathBuf,
    /// File stem, used for the suggested export name.
    pub stem: String,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Ingested log (None until the user opens a file).
    pub log: Option<LoadedLog>,

    /// Processed series for the current configuration.
    pub series: Option<Series>,

    /// Estimated sample rate of the processed series, if defined.
    pub sample_rate: Option<f64>,

    /// Read-only summary of the processed series.
    pub summary: Option<Summary>,

    /// Rows dropped by the time-delta guard in the last run.
    pub rows_dropped: usize,

    /// Pipeline tunables; the window size is edited from the top bar.
    pub config: PipelineConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            log: None,
            series: None,
            sample_rate: None,
            summary: None,
            rows_dropped: 0,
            config: PipelineConfig::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a log file and process it with the current configuration.
    /// Ingestion failures leave any previously loaded log untouched.
    pub fn load_file(&mut self, path: &Path) {
        match loader::load_log(path, &self.config.encodings) {
            Ok(table) => {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("log")
                    .to_string();
                self.log = Some(LoadedLog {
                    table,
                    path: path.to_path_buf(),
                    stem,
                });
                self.status_message = None;
                self.reprocess();
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("failed to load log: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-run the pipeline over the loaded table with the current config.
    pub fn reprocess(&mut self) {
        if let Some(log) = &self.log {
            let before = log.table.rows.len();
            let series = process(&log.table, &self.config);
            self.rows_dropped = before.saturating_sub(series.len());
            self.sample_rate = stats::sample_rate(&series);
            self.summary = Some(stats::summarize(&series));
            self.series = Some(series);
        }
    }

    /// Update the smoothing window and reprocess if it changed.
    pub fn set_window(&mut self, window: usize) {
        let window = window.max(1);
        if window != self.config.window {
            self.config.window = window;
            self.reprocess();
        }
    }

    /// Export the processed series to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let Some(series) = &self.series else {
            return;
        };
        match export::export_file(series, path) {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Default file name offered by the export dialog.
    pub fn suggested_export_name(&self) -> String {
        let stem = self.log.as_ref().map(|l| l.stem.as_str()).unwrap_or("log");
        export::suggested_filename(stem, self.config.window)
    }
}
