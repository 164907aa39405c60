//! Pure-Rust mirrors of the two fragment programs.
//!
//! Each kernel is a stateless function `(coordinate, uniforms) -> color`
//! with no shared mutable state across pixels or frames, so the GPU and
//! software paths agree by construction and the math is testable without a
//! display. The GLSL sources in the renderer crate transcribe the same
//! arithmetic.

pub mod bars;
pub mod grid;

use glam::{Vec2, Vec3};

use crate::config::{VizConfig, VizMode};
use crate::packer::PackedGrid;

/// GLSL-style step: 0 below `edge`, 1 at or above it.
pub(crate) fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// Shades one pixel of the configured scene.
///
/// `coord` is the normalized surface position in `[0,1)²`; `time` is the
/// elapsed seconds fed to the animated bar chart (the grid view ignores
/// it). Returns linear RGB; values above 1.0 are legitimate for bright
/// grid cells.
pub fn shade_pixel(coord: Vec2, time: f32, grid: &PackedGrid, config: &VizConfig) -> Vec3 {
    match config.mode {
        VizMode::Grid => grid::shade(coord, grid, &config.grid_params()),
        VizMode::Bars => bars::shade((coord - 0.5) * 2.0, time, grid, &config.bar_params()),
    }
}
