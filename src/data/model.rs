use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawSample – one selected row of the restart table
// ---------------------------------------------------------------------------

/// A single magnetic-moment sample taken from the selected snapshot.
///
/// `moment` is expected to be unit-norm with `moment[2]` in [-1, 1];
/// `magnitude` is the moment length column, which doubles as the site-type
/// discriminator when grouping is inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub magnitude: f64,
    /// Cartesian components (x, y, z).
    pub moment: [f64; 3],
}

// ---------------------------------------------------------------------------
// Snapshot – the loader's output
// ---------------------------------------------------------------------------

/// All moment samples belonging to one (step, ensemble) pair, in file order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub path: PathBuf,
    /// Simulation step index the samples were taken at.
    pub step: f64,
    /// Ensemble / configuration index the samples were taken at.
    pub config: f64,
    pub samples: Vec<RawSample>,
}

impl Snapshot {
    /// Number of moment samples in the snapshot.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the snapshot holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HistogramBundle – the builder's output, consumed read-only by the UI
// ---------------------------------------------------------------------------

/// One histogram series: the aggregate over all samples, or one site group.
///
/// `phi` and `theta` are max-normalized counts, step-doubled so that together
/// with the bundle's edge arrays they trace a piecewise-constant curve on a
/// polar axis (each count appears twice, once per edge of its bin).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramEntry {
    /// Display label; `None` for the aggregate entry.
    pub label: Option<String>,
    pub phi: Vec<f64>,
    pub theta: Vec<f64>,
    /// Assigned display color (sRGB).
    pub color: [u8; 3],
}

/// Bin edges plus all histogram series for one snapshot.
///
/// `entries[0]` is always the aggregate over every sample; `entries[1..]`
/// are the per-group histograms in group order. Edge arrays are step-doubled
/// to match the entry count arrays. The bundle is immutable once built: the
/// presentation layer keeps its own per-series style copies and never writes
/// back into the numeric content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBundle {
    pub phi_edges: Vec<f64>,
    pub theta_edges: Vec<f64>,
    pub entries: Vec<HistogramEntry>,
}

impl HistogramBundle {
    /// The aggregate series (always present).
    pub fn total(&self) -> &HistogramEntry {
        &self.entries[0]
    }

    /// The per-group series, excluding the aggregate.
    pub fn groups(&self) -> &[HistogramEntry] {
        &self.entries[1..]
    }
}
