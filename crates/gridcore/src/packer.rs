use crate::series::SeriesPoint;

/// Failures while tiling a series into the grid buffer.
///
/// Both variants are configuration errors: they are raised before any GPU
/// resource exists and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("cannot pack an empty series")]
    EmptySeries,
    #[error("grid dimensions {width}x{height} contain no cells")]
    InvalidDimensions { width: u32, height: u32 },
}

/// The input series tiled into a fixed-size two-channel float raster.
///
/// Cell `i` holds `(series[i % N].value, series[i % N].extra)`, so every
/// cell is populated regardless of series length. The buffer is built once
/// at startup and uploaded to the GPU once; the software kernels read it
/// through [`PackedGrid::value_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackedGrid {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl PackedGrid {
    /// Tiles `series` into a `width x height` grid, wrapping with modulo
    /// when the series is shorter than the grid capacity.
    pub fn pack(series: &[SeriesPoint], width: u32, height: u32) -> Result<Self, PackError> {
        if series.is_empty() {
            return Err(PackError::EmptySeries);
        }
        let cells = (width as usize) * (height as usize);
        if cells == 0 {
            return Err(PackError::InvalidDimensions { width, height });
        }

        let mut data = Vec::with_capacity(cells * 2);
        for i in 0..cells {
            let point = series[i % series.len()];
            data.push(point.value);
            data.push(point.extra);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells in the raster.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Raw interleaved `(value, extra)` floats, `cell_count() * 2` long.
    /// This is exactly the layout uploaded as an `Rg32Float` texture.
    pub fn as_floats(&self) -> &[f32] {
        &self.data
    }

    /// Value channel at a linear cell index, wrapping modulo the cell
    /// count (repeat addressing, matching the GPU texture's behavior).
    pub fn value_at(&self, index: usize) -> f32 {
        self.data[(index % self.cell_count()) * 2]
    }

    /// Extra channel at a linear cell index, wrapping like [`value_at`].
    ///
    /// [`value_at`]: PackedGrid::value_at
    pub fn extra_at(&self, index: usize) -> f32 {
        self.data[(index % self.cell_count()) * 2 + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<SeriesPoint> {
        (0..n)
            .map(|i| SeriesPoint::new(i as f32, -(i as f32)))
            .collect()
    }

    #[test]
    fn single_point_fills_every_cell() {
        let grid = PackedGrid::pack(&ramp(1), 4, 4).unwrap();
        assert_eq!(grid.cell_count(), 16);
        assert_eq!(grid.as_floats().len(), 32);
        for i in 0..16 {
            assert_eq!(grid.value_at(i), 0.0);
            assert_eq!(grid.extra_at(i), 0.0);
        }
    }

    #[test]
    fn exact_length_series_maps_one_to_one() {
        let series = ramp(16);
        let grid = PackedGrid::pack(&series, 4, 4).unwrap();
        for (i, point) in series.iter().enumerate() {
            assert_eq!(grid.value_at(i), point.value);
            assert_eq!(grid.extra_at(i), point.extra);
        }
    }

    #[test]
    fn longer_series_truncates_and_shorter_wraps() {
        // N = M + 3: only the first M points land in the raster.
        let series = ramp(19);
        let grid = PackedGrid::pack(&series, 4, 4).unwrap();
        for i in 0..16 {
            assert_eq!(grid.value_at(i), i as f32);
        }

        // N < M: index i reads series[i % N].
        let series = ramp(5);
        let grid = PackedGrid::pack(&series, 4, 4).unwrap();
        for i in 0..16 {
            assert_eq!(grid.value_at(i), (i % 5) as f32);
        }
    }

    #[test]
    fn value_lookup_wraps_past_capacity() {
        let grid = PackedGrid::pack(&ramp(4), 2, 2).unwrap();
        assert_eq!(grid.value_at(4), grid.value_at(0));
        assert_eq!(grid.value_at(7), grid.value_at(3));
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            PackedGrid::pack(&[], 4, 4),
            Err(PackError::EmptySeries)
        ));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let series = ramp(4);
        assert!(matches!(
            PackedGrid::pack(&series, 0, 4),
            Err(PackError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            PackedGrid::pack(&series, 4, 0),
            Err(PackError::InvalidDimensions { width: 4, height: 0 })
        ));
    }
}
