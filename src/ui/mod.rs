//! Presentation layer: panels (controls) and the polar plots.

pub mod panels;
pub mod plot;
