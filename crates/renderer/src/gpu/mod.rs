mod context;
mod data_texture;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
