use eframe::egui::{Color32, Ui, Vec2};
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

const RAW_COLOR: Color32 = Color32::from_rgb(65, 105, 225);
const FILTERED_COLOR: Color32 = Color32::from_rgb(46, 139, 87);

// ---------------------------------------------------------------------------
// Comparison grid (central panel)
// ---------------------------------------------------------------------------

/// Render the 3×2 comparison grid: distance / velocity / acceleration rows,
/// raw (left) vs filtered (right) columns, all against time. Pure reader of
/// the processed series.
pub fn comparison_grid(ui: &mut Ui, state: &AppState) {
    let Some(series) = &state.series else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a distance log to view kinematics  (File → Open log…)");
        });
        return;
    };

    let rate = state
        .sample_rate
        .map(|r| format!("{r} Hz"))
        .unwrap_or_else(|| "undefined".to_string());
    let annotation = format!("w={}, sr≈{rate}", state.config.window);

    let rows: [(&str, &[f64], &[f64]); 3] = [
        ("Distance (cm)", &series.distance, &series.distance_f),
        ("Velocity (cm/s)", &series.velocity_raw, &series.velocity_f),
        (
            "Acceleration (cm/s²)",
            &series.acceleration_raw,
            &series.acceleration_f,
        ),
    ];

    let spacing = ui.spacing().item_spacing;
    let cell = Vec2::new(
        (ui.available_width() - spacing.x) / 2.0,
        (ui.available_height() - 2.0 * spacing.y) / 3.0,
    );

    for (row_idx, (title, raw, filtered)) in rows.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let filtered_title = if row_idx == 0 {
                format!("{title} – filtered ({annotation})")
            } else {
                format!("{title} – filtered")
            };
            column_plot(
                ui,
                cell,
                &format!("{title} – raw"),
                &series.t,
                raw,
                RAW_COLOR,
            );
            column_plot(ui, cell, &filtered_title, &series.t, filtered, FILTERED_COLOR);
        });
    }
}

/// One cell of the grid: a single time-series line.
fn column_plot(ui: &mut Ui, size: Vec2, title: &str, t: &[f64], values: &[f64], color: Color32) {
    ui.vertical(|ui: &mut Ui| {
        ui.set_width(size.x);
        ui.strong(title);

        // Missing cells are skipped rather than drawn at zero.
        let points: PlotPoints = t
            .iter()
            .zip(values.iter())
            .filter(|(_, &v)| v.is_finite())
            .map(|(&ti, &vi)| [ti, vi])
            .collect();

        Plot::new(title.to_string())
            .height(size.y - ui.spacing().interact_size.y)
            .x_axis_label("Time (s)")
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(false)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points).name(title).color(color).width(1.5));
            });
    });
}
