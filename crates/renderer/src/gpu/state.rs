use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::runtime::TimeSample;
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::data_texture::SeriesTexture;
use super::pipeline::{build_pipeline, PipelineLayouts};
use super::uniforms::SceneUniforms;

/// Aggregates every GPU resource needed to present a frame.
///
/// The layout mirrors the lifetime relationship between objects:
///
/// ```text
///   Surface ─▶ Device ─▶ Queue
///                │
///                ├─▶ RenderPipeline (mode A or mode B fragment)
///                ├─▶ Uniform buffer (time/resolution, written per frame)
///                └─▶ Series texture (uploaded once at startup)
/// ```
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    series_bind_group: wgpu::BindGroup,
    _series_texture: SeriesTexture,
    multisample_target: Option<MultisampleTarget>,
    uniforms: SceneUniforms,
}

impl GpuState {
    /// Creates a GPU pipeline targeting the supplied surface and size,
    /// compiling the fragment program and uploading the packed series
    /// texture exactly once.
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let (tex_w, tex_h) = config.viz.texture_size;
        if config.grid.width() != tex_w || config.grid.height() != tex_h {
            anyhow::bail!(
                "packed grid is {}x{} but the scene expects a {}x{} texture",
                config.grid.width(),
                config.grid.height(),
                tex_w,
                tex_h
            );
        }

        let context = GpuContext::new(target, initial_size, config.antialiasing)?;

        let layouts = PipelineLayouts::new(&context.device)?;
        let pipeline = build_pipeline(
            &context.device,
            &layouts,
            context.surface_format,
            context.sample_count,
            &config.viz,
        )?;

        let series_texture = SeriesTexture::new(&context.device, &context.queue, &config.grid);
        let series_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("series bind group"),
                layout: &layouts.series_layout,
                entries: &series_texture.bind_entries(),
            });

        let uniforms = SceneUniforms::new(context.size.width, context.size.height);
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let multisample_target = MultisampleTarget::for_context(&context);

        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            series_bind_group,
            _series_texture: series_texture,
            multisample_target,
            uniforms,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reconfigures the swapchain and resolution uniform; the new
    /// dimensions are used by the very next frame.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if !self.context.resize(new_size) {
            return;
        }
        self.multisample_target = MultisampleTarget::for_context(&self.context);
        self.uniforms
            .set_resolution(new_size.width as f32, new_size.height as f32);
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            "resized GPU surface"
        );
    }

    /// Records and submits one frame at the given time sample.
    pub(crate) fn render_frame(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.apply_sample(sample);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.series_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            time = self.uniforms.time,
            frame = self.uniforms.frame,
            width = self.context.size.width,
            height = self.context.size.height,
            "presented frame"
        );
        Ok(())
    }
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn for_context(context: &GpuContext) -> Option<Self> {
        if context.sample_count <= 1 {
            return None;
        }
        Some(Self::new(
            &context.device,
            context.surface_format,
            context.size,
            context.sample_count,
        ))
    }

    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}
