//! Renderer crate for lumigrid.
//!
//! Glues the packed series texture, the `wgpu` pipeline, and the winit
//! window together. The overall flow is:
//!
//! ```text
//!   CLI / lumigrid
//!          │ RendererConfig (VizConfig + PackedGrid)
//!          ▼
//!   Renderer::run ──▶ window event loop ──▶ FrameDriver::next_frame()
//!          ▲                                      │
//!          │                                      └─▶ GpuState::render_frame() ─▶ GPU UBO + draw
//! ```
//!
//! [`GpuState`](gpu) owns every GPU resource (surface, device, pipeline,
//! uniforms, the one-time series texture upload), while [`Renderer`] is the
//! thin entry point. The two fragment programs are first-party GLSL embedded
//! in [`compile`] with the scene's configuration knobs injected as defines.

mod compile;
mod gpu;
mod window;

pub mod runtime;
pub mod types;

use anyhow::Result;

pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameDriver, FramePresenter,
    FrameRequest, RenderPolicy, SystemTimeSource, TimeSample, TimeSource,
};
pub use types::{Antialiasing, RendererConfig};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and drives the frame loop until the surface closes.
    ///
    /// Returns an error when initialization fails (no adapter, shader
    /// compilation failure, mismatched texture dimensions); steady-state
    /// surface hiccups are handled inside the loop.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
