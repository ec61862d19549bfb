use std::path::Path;

use super::error::DataError;
use super::model::{RawSample, Snapshot};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one snapshot from an UppASD-style restart file.
///
/// The file is a whitespace-delimited numeric table with at least 7 columns:
/// column 0 is the simulation step, column 1 the ensemble index, column 2 is
/// skipped (atom site number), and columns 3–6 are the moment magnitude and
/// its Cartesian components. Lines starting with `#` and blank lines are
/// ignored.
///
/// `step` / `config` select an explicit (step, ensemble) pair. When `None`,
/// the latest is taken: the maximum step in the file, then the maximum
/// ensemble index *among rows of that step*, so the selected rows always
/// form one coherent snapshot.
pub fn load_snapshot(
    path: &Path,
    step: Option<f64>,
    config: Option<f64>,
) -> Result<Snapshot, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = parse_rows(path, &text)?;
    select_snapshot(path, &rows, step, config)
}

// ---------------------------------------------------------------------------
// Table parsing
// ---------------------------------------------------------------------------

/// One parsed data row, before snapshot selection.
#[derive(Debug, Clone, Copy)]
struct Row {
    step: f64,
    config: f64,
    sample: RawSample,
}

fn parse_rows(path: &Path, text: &str) -> Result<Vec<Row>, DataError> {
    let mut rows = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 7 {
            return Err(DataError::Format {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason: format!("expected at least 7 columns, found {}", tokens.len()),
            });
        }

        let field = |col: usize| -> Result<f64, DataError> {
            tokens[col].parse::<f64>().map_err(|_| DataError::Format {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason: format!("column {col}: '{}' is not numeric", tokens[col]),
            })
        };

        // Column 2 (site number) is not used by the histogram pipeline.
        rows.push(Row {
            step: field(0)?,
            config: field(1)?,
            sample: RawSample {
                magnitude: field(3)?,
                moment: [field(4)?, field(5)?, field(6)?],
            },
        });
    }

    if rows.is_empty() {
        return Err(DataError::Format {
            path: path.to_path_buf(),
            line: 0,
            reason: "no data rows found".to_string(),
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Snapshot selection
// ---------------------------------------------------------------------------

fn select_snapshot(
    path: &Path,
    rows: &[Row],
    step: Option<f64>,
    config: Option<f64>,
) -> Result<Snapshot, DataError> {
    let target_step = step.unwrap_or_else(|| {
        rows.iter()
            .map(|r| r.step)
            .fold(f64::NEG_INFINITY, f64::max)
    });

    let at_step: Vec<&Row> = rows.iter().filter(|r| r.step == target_step).collect();

    let target_config = config.unwrap_or_else(|| {
        at_step
            .iter()
            .map(|r| r.config)
            .fold(f64::NEG_INFINITY, f64::max)
    });

    let samples: Vec<RawSample> = at_step
        .iter()
        .filter(|r| r.config == target_config)
        .map(|r| r.sample)
        .collect();

    if samples.is_empty() {
        return Err(DataError::EmptySelection {
            path: path.to_path_buf(),
            step: target_step,
            config: target_config,
        });
    }

    Ok(Snapshot {
        path: path.to_path_buf(),
        step: target_step,
        config: target_config,
        samples,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
