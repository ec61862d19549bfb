use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Core error taxonomy
// ---------------------------------------------------------------------------

/// Errors produced by the loader and the histogram builder.
///
/// Every variant carries enough context (file path, line, step, group index)
/// to diagnose the failure without re-running. All of these are fatal to the
/// run: the viewer never opens on partially parsed or malformed data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Format {
        path: PathBuf,
        /// 1-based line number in the source file.
        line: usize,
        reason: String,
    },

    #[error("{}: no rows match step {step}, ensemble {config}", path.display())]
    EmptySelection {
        path: PathBuf,
        step: f64,
        config: f64,
    },

    #[error("site group {group} received no samples, histogram undefined")]
    EmptyGroup { group: usize },

    #[error("sample {index}: moment component {value} outside the unit-moment domain")]
    NumericDomain { index: usize, value: f64 },

    #[error("angular divisions must be at least 4, got {0}")]
    InvalidDivisions(usize),
}
