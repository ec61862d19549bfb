use eframe::egui;

use crate::export;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpinogramApp {
    pub state: AppState,
}

impl SpinogramApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SpinogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A screenshot requested by a Save Plot action arrives as an event on
        // a later frame; finish the pending export before drawing.
        let screenshot = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        if let Some(image) = screenshot {
            if let Some(path) = self.state.pending_export.take() {
                let ppp = ctx.pixels_per_point();
                match export::save_screenshot(&image, self.state.plot_rect, ppp, &path) {
                    Ok(()) => {
                        log::info!("Plot saved to {}", path.display());
                        self.state.status_message =
                            Some(format!("Plot saved to {}", path.display()));
                    }
                    Err(e) => {
                        log::error!("Failed to save plot: {e:#}");
                        self.state.status_message = Some(format!("Error: {e:#}"));
                    }
                }
            }
        }

        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series controls ----
        egui::SidePanel::left("series_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: polar plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::polar_plots(ui, &mut self.state);
        });
    }
}
