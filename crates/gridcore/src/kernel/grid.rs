//! Mode A: flat grid of brightness cells.

use glam::{Vec2, Vec3};

use super::step;
use crate::packer::PackedGrid;

/// Gain applied to the sampled value before the power curve.
pub const BRIGHTNESS_GAIN: f32 = 4.5;
/// Exponent of the brightness curve; steep on purpose so only high values
/// survive, leaving a sparse highlight pattern.
pub const BRIGHTNESS_EXPONENT: f32 = 9.4;

/// Cell-local margins of the border mask.
const BORDER_LEFT: f32 = 0.06;
const BORDER_BOTTOM: f32 = 0.016;
const BORDER_RIGHT: f32 = 0.94;
const BORDER_TOP: f32 = 0.94;

/// Knobs of the grid-brightness kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridParams {
    /// Cells per lattice edge.
    pub edge_count: u32,
    /// Linear cell indices at or past this cap stay black.
    pub data_cap: u32,
}

/// Shades one pixel, `uv` in `[0,1)²`.
///
/// Cells at or past the data cap are rejected before any texture lookup so
/// padding never picks up wrapped values.
pub fn shade(uv: Vec2, grid: &PackedGrid, params: &GridParams) -> Vec3 {
    let cell_pos = uv * params.edge_count as f32;
    let cell_id = cell_pos.floor();
    let cell_uv = cell_pos - cell_id;

    let cell_index = cell_id.y * params.edge_count as f32 + cell_id.x;
    if cell_index < 0.0 || cell_index >= params.data_cap as f32 {
        return Vec3::ZERO;
    }

    let value = grid.value_at(cell_index as usize);
    let brightness = (value * BRIGHTNESS_GAIN).max(0.0).powf(BRIGHTNESS_EXPONENT);

    let border = step(BORDER_LEFT, cell_uv.x)
        * step(BORDER_BOTTOM, cell_uv.y)
        * step(cell_uv.x, BORDER_RIGHT)
        * step(cell_uv.y, BORDER_TOP);

    Vec3::splat(brightness * border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesPoint;
    use glam::vec2;

    const EDGE: u32 = 40;
    const CAP: u32 = 1000;

    fn params() -> GridParams {
        GridParams {
            edge_count: EDGE,
            data_cap: CAP,
        }
    }

    fn bright_grid() -> PackedGrid {
        // 0.2222 * 4.5 ≈ 1.0, so every populated cell is clearly lit.
        PackedGrid::pack(&[SeriesPoint::new(0.2222, 0.0)], 32, 32).unwrap()
    }

    /// Center of the cell holding the given linear index.
    fn cell_center(index: u32) -> Vec2 {
        let x = (index % EDGE) as f32 + 0.5;
        let y = (index / EDGE) as f32 + 0.5;
        vec2(x, y) / EDGE as f32
    }

    #[test]
    fn cap_boundary_blacks_out_padding() {
        let grid = bright_grid();
        let lit = shade(cell_center(CAP - 1), &grid, &params());
        let capped = shade(cell_center(CAP), &grid, &params());
        assert!(lit.x > 0.0, "index 999 must sample the texture");
        assert_eq!(capped, Vec3::ZERO, "index 1000 must be black");
    }

    #[test]
    fn every_cell_past_the_cap_is_black() {
        let grid = bright_grid();
        for index in CAP..EDGE * EDGE {
            assert_eq!(shade(cell_center(index), &grid, &params()), Vec3::ZERO);
        }
    }

    #[test]
    fn brightness_is_monotonic_in_value() {
        // Over value * 4.5 in [0, 1] the power curve must not decrease.
        let mut last = -1.0_f32;
        for i in 0..=20 {
            let value = i as f32 / 20.0 / BRIGHTNESS_GAIN;
            let grid = PackedGrid::pack(&[SeriesPoint::new(value, 0.0)], 32, 32).unwrap();
            let shaded = shade(cell_center(0), &grid, &params());
            assert!(shaded.x >= last);
            last = shaded.x;
        }
    }

    #[test]
    fn border_margin_masks_cell_edges() {
        let grid = bright_grid();
        let center = cell_center(0);
        // Nudge to the left margin of cell 0: inside the 0.06 band.
        let edge = vec2(0.03 / EDGE as f32, center.y);
        assert_eq!(shade(edge, &grid, &params()), Vec3::ZERO);
        assert!(shade(center, &grid, &params()).x > 0.0);
    }

    #[test]
    fn channels_are_grayscale() {
        let grid = bright_grid();
        let color = shade(cell_center(3), &grid, &params());
        assert_eq!(color.x, color.y);
        assert_eq!(color.y, color.z);
    }
}
