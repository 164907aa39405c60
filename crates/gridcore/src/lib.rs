//! Core types for the lumigrid visualizer.
//!
//! This crate holds everything that does not touch a GPU:
//! - `SeriesPoint` — one entry of the normalized input series
//! - `PackedGrid` — the series tiled into a W×H×2 float raster
//! - `VizConfig` — scene configuration (mode, grid size, march budget)
//! - `kernel` — pure-Rust mirrors of the two fragment shaders, used by the
//!   software evaluation path and the test suite

pub mod config;
pub mod kernel;
pub mod packer;
pub mod series;

pub use config::{ConfigError, VizConfig, VizMode};
pub use packer::{PackError, PackedGrid};
pub use series::SeriesPoint;
