use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::WindowBuilder;

use crate::gpu::GpuState;
use crate::runtime::{time_source_for_policy, FrameDriver, RenderPolicy};
use crate::types::RendererConfig;

const WINDOW_TITLE: &str = "lumigrid";

struct WindowState {
    window: Arc<winit::window::Window>,
    gpu: GpuState,
    driver: FrameDriver,
    animate: bool,
    frame_interval: Option<Duration>,
    last_render: Option<Instant>,
}

impl WindowState {
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.driver.resize(new_size.width, new_size.height);
        self.gpu.resize(new_size);
        // Still scenes repaint on demand only; push a fresh frame out.
        if !self.animate {
            self.window.request_redraw();
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) {
        let frame = self.driver.next_frame();
        match self.gpu.render_frame(frame.sample) {
            Ok(()) => {
                self.last_render = Some(Instant::now());
            }
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                let size = self.gpu.size();
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.gpu.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU reported out of memory; exiting");
                elwt.exit();
            }
            Err(err) => {
                tracing::warn!(error = %err, "frame skipped");
            }
        }
    }

    /// Schedules the next frame according to the render policy.
    fn schedule(&mut self, elwt: &EventLoopWindowTarget<()>) {
        if !self.animate {
            if self.last_render.is_none() {
                self.window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::Wait);
            return;
        }

        match (self.frame_interval, self.last_render) {
            (Some(interval), Some(last)) if last.elapsed() < interval => {
                elwt.set_control_flow(ControlFlow::WaitUntil(last + interval));
            }
            _ => {
                elwt.set_control_flow(ControlFlow::Poll);
                self.window.request_redraw();
            }
        }
    }
}

/// Opens a window and pumps the event loop until it is closed.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (width, height) = config.surface_size;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let initial_size = window.inner_size();
    let gpu = GpuState::new(window.as_ref(), initial_size, config)?;

    let driver = FrameDriver::new(
        time_source_for_policy(&config.policy),
        (initial_size.width, initial_size.height),
    );
    let (animate, frame_interval) = match config.policy {
        RenderPolicy::Animate { target_fps } => (
            true,
            target_fps
                .filter(|fps| *fps > 0.0)
                .map(|fps| Duration::from_secs_f32(1.0 / fps)),
        ),
        RenderPolicy::Still { .. } => (false, None),
    };

    let mut state = WindowState {
        window,
        gpu,
        driver,
        animate,
        frame_interval,
        last_render: None,
    };

    tracing::info!(width, height, animate, "entering window loop");

    event_loop
        .run(move |event, elwt| match event {
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                state.window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::ScaleFactorChanged { .. } => {
                        // winit delivers a Resized event with the new
                        // physical size right after this one.
                    }
                    WindowEvent::RedrawRequested => state.redraw(elwt),
                    _ => {}
                }
            }
            Event::AboutToWait => state.schedule(elwt),
            _ => {}
        })
        .context("event loop terminated abnormally")?;

    Ok(())
}
