//! Mode B: ray-marched 3D bar chart.
//!
//! The scene is a signed-distance field of vertical boxes on a repeating
//! 2D lattice; each box's height comes from the packed series texture.

use glam::{vec3, Vec2, Vec3};

use crate::packer::PackedGrid;

/// Lattice pitch between neighboring bars.
pub const SPACING: f32 = 0.1513;
/// Bar footprint half-extents (x, z).
pub const BOX_HALF_WIDTH: f32 = 0.0512;
pub const BOX_HALF_DEPTH: f32 = 0.012;
/// Bar height is `sqrt(value) * HEIGHT_SCALE`.
pub const HEIGHT_SCALE: f32 = 3.0;

/// Finite-difference step of the normal estimate.
const NORMAL_EPSILON: f32 = 0.001;
/// Cubic exponential fog density.
const FOG_DENSITY: f32 = 0.0039;

/// Camera rig: fixed height, continuous forward dolly over time.
const CAMERA_HEIGHT: f32 = 3.0;
const CAMERA_START_Z: f32 = -5.0;
const DOLLY_SPEED: f32 = 0.9;

/// Knobs of the bar-chart kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarParams {
    /// Bars per lattice edge.
    pub edge_count: u32,
    /// Sphere-tracing iteration bound.
    pub steps: u32,
    /// Hit threshold on the signed distance.
    pub epsilon: f32,
    /// Accumulated distance past which the ray counts as a miss.
    pub max_distance: f32,
}

/// Outcome of marching one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Accumulated distance along the ray.
    pub distance: f32,
    /// Whether the signed distance dropped below the hit threshold.
    pub hit: bool,
    /// Iterations consumed; never exceeds the configured bound.
    pub steps: u32,
}

/// Axis-aligned box signed distance, half-extents `b`.
pub fn sd_box(p: Vec3, b: Vec3) -> f32 {
    let q = p.abs() - b;
    q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
}

/// Scene distance: which lattice cell the point falls into, the point in
/// that cell's repeated local frame, and the box for that cell's series
/// value with its base on the ground plane.
pub fn map(p: Vec3, grid: &PackedGrid, params: &BarParams) -> f32 {
    let edge = params.edge_count as f32;
    let half_span = edge * SPACING * 0.5;

    let cell = ((p.x / SPACING + edge * 0.5).floor(), (p.z / SPACING + edge * 0.5).floor());
    let local_x = (p.x + half_span).rem_euclid(SPACING) - SPACING * 0.5;
    let local_z = (p.z + half_span).rem_euclid(SPACING) - SPACING * 0.5;

    // Linear index wraps modulo the texture capacity (repeat addressing).
    let cell_index = (cell.1 * edge + cell.0) as i64;
    let wrapped = cell_index.rem_euclid(grid.cell_count() as i64) as usize;

    let value = grid.value_at(wrapped);
    let height = value.max(0.0).sqrt() * HEIGHT_SCALE;

    let local = vec3(local_x, p.y - height * 0.5, local_z);
    sd_box(local, vec3(BOX_HALF_WIDTH, height * 0.5, BOX_HALF_DEPTH))
}

/// Central-difference gradient of the distance field, normalized.
pub fn normal(p: Vec3, grid: &PackedGrid, params: &BarParams) -> Vec3 {
    let e = NORMAL_EPSILON;
    vec3(
        map(p + vec3(e, 0.0, 0.0), grid, params) - map(p - vec3(e, 0.0, 0.0), grid, params),
        map(p + vec3(0.0, e, 0.0), grid, params) - map(p - vec3(0.0, e, 0.0), grid, params),
        map(p + vec3(0.0, 0.0, e), grid, params) - map(p - vec3(0.0, 0.0, e), grid, params),
    )
    .normalize()
}

/// Sphere-traces from `ro` along `rd` until a hit, a miss past the
/// distance budget, or the iteration bound.
pub fn ray_march(ro: Vec3, rd: Vec3, grid: &PackedGrid, params: &BarParams) -> MarchResult {
    let mut distance = 0.0;
    for step in 1..=params.steps {
        let d = map(ro + rd * distance, grid, params);
        distance += d;
        if d.abs() < params.epsilon {
            return MarchResult {
                distance,
                hit: true,
                steps: step,
            };
        }
        if distance > params.max_distance {
            return MarchResult {
                distance,
                hit: false,
                steps: step,
            };
        }
    }
    MarchResult {
        distance,
        hit: false,
        steps: params.steps,
    }
}

/// Shades one pixel, `uv` centered in `[-1,1]²`.
///
/// The camera dollies forward continuously with elapsed time. Hits are
/// shaded by the surface normal remapped to `[0,1]`; misses stay black.
/// Depth fog blends toward black with a cubic falloff.
pub fn shade(uv: Vec2, time: f32, grid: &PackedGrid, params: &BarParams) -> Vec3 {
    let ro = vec3(0.0, CAMERA_HEIGHT, CAMERA_START_Z - time * DOLLY_SPEED);
    let rd = vec3(uv.x, uv.y, -1.0).normalize();

    let march = ray_march(ro, rd, grid, params);
    let mut color = Vec3::ZERO;
    if march.hit {
        color = normal(ro + rd * march.distance, grid, params) * 0.5 + 0.5;
    }

    let fog = 1.0 - (-FOG_DENSITY * march.distance.powi(3)).exp();
    color.lerp(Vec3::ZERO, fog)
}
