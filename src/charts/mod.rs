//! Chart rendering.
//!
//! Draws the dataset aggregates as SVG files: salary histogram, top job
//! titles, salary ranges per title and salary by experience level.

pub mod palette;
pub mod renderer;

pub use renderer::{ChartOptions, ChartRenderer};
