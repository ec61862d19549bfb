//! Data layer: snapshot loading and histogram building.
//!
//! Architecture:
//! ```text
//!  restart.*.out
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse table, select (step, ensemble) → Snapshot
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ histogram  │  spherical angles, Jacobian weights, grouping, binning
//!   └───────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ HistogramBundle │  step-doubled edges + normalized series, read-only
//!   └────────────────┘
//! ```
//!
//! Everything in here runs once at startup; the UI never feeds back into it.

pub mod error;
pub mod histogram;
pub mod loader;
pub mod model;
