use gridcore::{PackedGrid, VizConfig};

use crate::runtime::RenderPolicy;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Carries the validated scene configuration and the already-packed series
/// grid; the renderer uploads the grid once and never rebuilds it.
#[derive(Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Scene knobs compiled into the fragment shader.
    pub viz: VizConfig,
    /// Packed series raster uploaded as the data texture.
    pub grid: PackedGrid,
    /// Animate continuously or hold a still timestamp.
    pub policy: RenderPolicy,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
}

impl RendererConfig {
    /// A 720p animating configuration for the given scene and data.
    pub fn new(viz: VizConfig, grid: PackedGrid) -> Self {
        Self {
            surface_size: (1280, 720),
            viz,
            grid,
            policy: RenderPolicy::default(),
            antialiasing: Antialiasing::default(),
        }
    }
}
