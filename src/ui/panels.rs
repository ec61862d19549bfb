use eframe::egui::color_picker::{color_edit_button_srgba, Alpha};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar – menu, tabs, status line
// ---------------------------------------------------------------------------

/// Render the top menu / tab bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save Plot…").clicked() {
                save_plot_dialog(ui.ctx(), state);
                ui.close_menu();
            }
            if ui.button("Export Data…").clicked() {
                export_data_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Total, "Total");
        ui.selectable_value(&mut state.tab, Tab::Projected, "Projected");

        ui.separator();

        ui.label(format!(
            "{} moments at step {}, ensemble {}",
            state.sample_count, state.step, state.config
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – per-series controls
// ---------------------------------------------------------------------------

/// Render the series-control panel for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);

    match state.tab {
        Tab::Total => {
            ui.heading("Total distribution");
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Change color:");
                color_edit_button_srgba(ui, &mut state.total.color, Alpha::Opaque);
            });
        }
        Tab::Projected => {
            ui.heading("Site projections");
            ui.separator();

            // Column headers, then one row of controls per site group.
            egui::Grid::new("series_header")
                .num_columns(3)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Show");
                    ui.strong("Label");
                    ui.strong("Color");
                    ui.end_row();
                });

            ScrollArea::vertical()
                .auto_shrink([false, true])
                .max_height((ui.available_height() - 60.0).max(60.0))
                .show(ui, |ui: &mut Ui| {
                    egui::Grid::new("series_rows")
                        .num_columns(3)
                        .striped(true)
                        .show(ui, |ui: &mut Ui| {
                            for view in &mut state.groups {
                                ui.checkbox(&mut view.visible, "");
                                ui.add(
                                    egui::TextEdit::singleline(&mut view.label)
                                        .desired_width(110.0),
                                );
                                color_edit_button_srgba(ui, &mut view.color, Alpha::Opaque);
                                ui.end_row();
                            }
                        });
                });
        }
    }

    ui.add_space(8.0);
    ui.separator();

    if ui.button("Save Plot…").clicked() {
        save_plot_dialog(ui.ctx(), state);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Pick a destination and request a viewport screenshot; the app finishes
/// the export when the screenshot event arrives.
pub fn save_plot_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save plot")
        .set_file_name("spinogram.png")
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(path) = file {
        state.pending_export = Some(path);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }
}

/// Write the histogram bundle as JSON to a chosen destination.
pub fn export_data_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export histogram data")
        .set_file_name("spinogram.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::export::write_bundle_json(&state.bundle, &path) {
            Ok(()) => {
                log::info!("Data exported to {}", path.display());
                state.status_message = Some(format!("Data exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export data: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
