use std::f64::consts::PI;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Polar plots (central panel)
// ---------------------------------------------------------------------------

/// Which angular axis a plot shows.
#[derive(Clone, Copy)]
enum Axis {
    /// Azimuth over the full circle (the in-plane m_xy distribution).
    Phi,
    /// Polar angle over the half circle (the m_z distribution).
    Theta,
}

/// Map a polar `(angle, radius)` pair to plot coordinates with zero at the
/// top and angles increasing clockwise, the physical convention.
fn to_xy(angle: f64, r: f64) -> [f64; 2] {
    [r * angle.sin(), r * angle.cos()]
}

/// Render the azimuthal and polar histograms side by side and remember the
/// covered screen rectangle for plot export.
pub fn polar_plots(ui: &mut Ui, state: &mut AppState) {
    state.plot_rect = Some(ui.available_rect_before_wrap());

    ui.columns(2, |cols: &mut [Ui]| {
        polar_axis(&mut cols[0], state, Axis::Phi);
        polar_axis(&mut cols[1], state, Axis::Theta);
    });
}

fn polar_axis(ui: &mut Ui, state: &AppState, axis: Axis) {
    let (id, title, edges) = match axis {
        Axis::Phi => ("phi_polar", "m_xy  (φ)", &state.bundle.phi_edges),
        Axis::Theta => ("theta_polar", "m_z  (θ)", &state.bundle.theta_edges),
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
    });

    let mut plot = Plot::new(id)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid([false, false])
        .show_x(false)
        .show_y(false)
        .include_x(-1.35)
        .include_x(1.35)
        .include_y(-1.35)
        .include_y(1.35);

    // Legend on the polar-angle plot only, mirroring the side the controls
    // relate to; one legend is enough for both plots.
    if matches!(axis, Axis::Theta) {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        draw_polar_grid(plot_ui, axis);

        for (idx, view) in state.visible_series() {
            let entry = &state.bundle.entries[idx];
            let radii = match axis {
                Axis::Phi => &entry.phi,
                Axis::Theta => &entry.theta,
            };

            let mut points: Vec<[f64; 2]> = edges
                .iter()
                .zip(radii.iter())
                .map(|(&a, &r)| to_xy(a, r))
                .collect();
            // The half-circle plot is an open fan; close it through the
            // origin so the fill is bounded.
            if matches!(axis, Axis::Theta) {
                points.insert(0, [0.0, 0.0]);
                points.push([0.0, 0.0]);
            }

            let series = Polygon::new(PlotPoints::from(points))
                .fill_color(view.color.gamma_multiply(0.35))
                .stroke(Stroke::new(1.5, view.color))
                .name(&view.label);
            plot_ui.polygon(series);
        }
    });
}

// ---------------------------------------------------------------------------
// Polar grid and angle ticks
// ---------------------------------------------------------------------------

const TICK_LABELS: [&str; 8] = ["0", "π/4", "π/2", "3π/4", "π", "5π/4", "3π/2", "7π/4"];

fn draw_polar_grid(plot_ui: &mut egui_plot::PlotUi, axis: Axis) {
    let gray = Color32::from_gray(120);
    let max_angle = match axis {
        Axis::Phi => 2.0 * PI,
        Axis::Theta => PI,
    };

    // Radial rings; the outer one doubles as the axis boundary.
    for &r in &[0.25, 0.5, 0.75, 1.0] {
        let ring: Vec<[f64; 2]> = (0..=128)
            .map(|i| to_xy(max_angle * i as f64 / 128.0, r))
            .collect();
        let width: f32 = if r == 1.0 { 1.2 } else { 0.4 };
        plot_ui.line(
            Line::new(PlotPoints::from(ring))
                .color(gray)
                .width(width)
                .allow_hover(false),
        );
    }

    // Spokes every π/4 with their angle labels.
    let ticks = match axis {
        Axis::Phi => 8,
        Axis::Theta => 5,
    };
    for i in 0..ticks {
        let angle = i as f64 * PI / 4.0;
        plot_ui.line(
            Line::new(PlotPoints::from(vec![[0.0, 0.0], to_xy(angle, 1.0)]))
                .color(gray)
                .width(0.4)
                .allow_hover(false),
        );

        let [x, y] = to_xy(angle, 1.18);
        plot_ui.text(Text::new(
            PlotPoint::new(x, y),
            RichText::new(TICK_LABELS[i]).color(gray),
        ));
    }
}
