use bytemuck::{Pod, Zeroable};

use crate::runtime::TimeSample;

/// CPU-side mirror of the scene uniform block.
///
/// The layout matches the `SceneParams` block declared in `compile.rs` and
/// must observe std140 alignment rules. The fourth component of
/// `resolution` doubles as spare storage for the elapsed time so GLSL
/// front-ends that collapse vec3 padding still see an animating value.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct SceneUniforms {
    pub resolution: [f32; 4],
    pub time: f32,
    pub time_delta: f32,
    pub frame: i32,
    pub _padding0: f32,
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

impl SceneUniforms {
    /// Prepares a uniform block sized to the current surface.
    pub fn new(width: u32, height: u32) -> Self {
        let mut uniforms = Self {
            resolution: [0.0; 4],
            time: 0.0,
            time_delta: 0.0,
            frame: 0,
            _padding0: 0.0,
        };
        uniforms.set_resolution(width as f32, height as f32);
        uniforms
    }

    /// Writes the surface dimensions and aspect ratio into the resolution slot.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution[0] = width;
        self.resolution[1] = height;
        self.resolution[2] = if height > 0.0 { width / height } else { 0.0 };
    }

    /// Advances the block to the given time sample.
    pub fn apply_sample(&mut self, sample: TimeSample) {
        self.time_delta = (sample.seconds - self.time).max(0.0);
        self.time = sample.seconds;
        self.frame = sample.frame_index.min(i32::MAX as u64) as i32;
        self.resolution[3] = self.time;
    }
}
