//! Spinogram: polar histogram viewer for atomistic spin snapshots.
//!
//! The [`data`] module loads one snapshot from an UppASD-style restart file
//! and turns it into an immutable [`data::model::HistogramBundle`]; the rest
//! of the crate is the egui shell that displays and exports it.

pub mod app;
pub mod color;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
