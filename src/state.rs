use std::path::PathBuf;

use eframe::egui::{Color32, Rect};

use crate::color;
use crate::data::model::{HistogramBundle, Snapshot};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which pair of polar plots is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Total,
    Projected,
}

/// Per-series display attributes, mutable by the UI.
///
/// These are view-local copies seeded from a [`HistogramBundle`] entry; the
/// bundle's numeric content stays untouched when the user recolors, renames
/// or hides a series.
#[derive(Debug, Clone)]
pub struct SeriesView {
    pub visible: bool,
    pub label: String,
    pub color: Color32,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Path of the restart file the bundle was built from.
    pub source: PathBuf,
    /// Step / ensemble pair the samples belong to, for the status line.
    pub step: f64,
    pub config: f64,
    /// Number of moment samples in the snapshot.
    pub sample_count: usize,

    /// The computed histogram bundle, read-only from here on.
    pub bundle: HistogramBundle,

    /// Display attributes for the aggregate series.
    pub total: SeriesView,
    /// Display attributes for each site group, in bundle order.
    pub groups: Vec<SeriesView>,

    pub tab: Tab,

    /// Screen rectangle of the plots from the last frame, for cropping the
    /// exported screenshot.
    pub plot_rect: Option<Rect>,
    /// Destination chosen in the save dialog, waiting for a screenshot.
    pub pending_export: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Seed the view state from a freshly built bundle.
    pub fn new(snapshot: &Snapshot, bundle: HistogramBundle) -> Self {
        let total = SeriesView {
            visible: true,
            label: "total".to_string(),
            color: color::to_color32(bundle.total().color),
        };
        let groups = bundle
            .groups()
            .iter()
            .map(|e| SeriesView {
                visible: true,
                label: e.label.clone().unwrap_or_default(),
                color: color::to_color32(e.color),
            })
            .collect();

        Self {
            source: snapshot.path.clone(),
            step: snapshot.step,
            config: snapshot.config,
            sample_count: snapshot.len(),
            bundle,
            total,
            groups,
            tab: Tab::Total,
            plot_rect: None,
            pending_export: None,
            status_message: None,
        }
    }

    /// The series shown on the current tab: (bundle entry index, view).
    pub fn visible_series(&self) -> Vec<(usize, &SeriesView)> {
        match self.tab {
            Tab::Total => vec![(0, &self.total)],
            Tab::Projected => self
                .groups
                .iter()
                .enumerate()
                .filter(|(_, v)| v.visible)
                .map(|(i, v)| (i + 1, v))
                .collect(),
        }
    }
}
