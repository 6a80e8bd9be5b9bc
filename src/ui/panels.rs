use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open log…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.series.is_some(), egui::Button::new("Export processed CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        // ---- Smoothing window control ----
        ui.label("Window");
        let mut window = state.config.window;
        if ui
            .add(egui::DragValue::new(&mut window).range(1..=99).speed(0.1))
            .on_hover_text("Moving-average window size (samples)")
            .changed()
        {
            state.set_window(window);
        }

        ui.separator();

        if let Some(series) = &state.series {
            ui.label(format!(
                "{} rows ({} dropped)",
                series.len(),
                state.rows_dropped
            ));
            ui.separator();
            let rate = state
                .sample_rate
                .map(|r| format!("≈{r} Hz"))
                .unwrap_or_else(|| "rate undefined".to_string());
            ui.label(rate);
            if let Some(log) = &state.log {
                ui.separator();
                ui.label(log.table.encoding);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – summary statistics
// ---------------------------------------------------------------------------

/// Render the summary panel. Read-only view over the processed series.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Summary");
    ui.separator();

    let Some(summary) = &state.summary else {
        ui.label("No log loaded.");
        return;
    };

    egui::Grid::new("summary_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Duration");
            ui.label(fmt_stat(summary.duration, "s"));
            ui.end_row();

            ui.label("Max raw velocity");
            ui.label(fmt_stat(summary.max_velocity_raw, "cm/s"));
            ui.end_row();

            ui.label("Max filtered velocity");
            ui.label(fmt_stat(summary.max_velocity_f, "cm/s"));
            ui.end_row();

            ui.label("Max raw acceleration");
            ui.label(fmt_stat(summary.max_acceleration_raw, "cm/s²"));
            ui.end_row();

            ui.label("Max filtered acceleration");
            ui.label(fmt_stat(summary.max_acceleration_f, "cm/s²"));
            ui.end_row();

            ui.label("Rows");
            ui.label(summary.rows.to_string());
            ui.end_row();
        });

    if let Some(log) = &state.log {
        ui.separator();
        ui.label(RichText::new(log.path.display().to_string()).weak());
    }
}

fn fmt_stat(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2} {unit}"),
        None => "–".to_string(),
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open distance log")
        .add_filter("Distance log", &["csv", "log", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}

fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export processed CSV")
        .set_file_name(state.suggested_export_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
