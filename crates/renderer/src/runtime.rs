use std::time::Instant;

use anyhow::Result;

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Evaluate the shader at a fixed timestamp every frame.
    Still {
        /// Timestamp in seconds; `None` means zero.
        time: Option<f32>,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } => Box::new(FixedTimeSource::new(time.unwrap_or(0.0))),
    }
}

/// Everything one frame needs: the time sample and the surface resolution
/// the draw call will target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    pub sample: TimeSample,
    pub resolution: (u32, u32),
}

/// Consumes frame requests; the GPU state in production, a recording mock
/// in tests.
pub trait FramePresenter {
    fn present(&mut self, frame: &FrameRequest) -> Result<()>;
}

/// Explicit core of the animation loop.
///
/// The continuous, self-rescheduling redraw callback is modeled as this
/// explicit driver with an injectable clock so frame sequencing is
/// deterministic without a display. A resize lands on the very next frame;
/// frame indices stay contiguous across it.
pub struct FrameDriver {
    time_source: BoxedTimeSource,
    resolution: (u32, u32),
}

impl FrameDriver {
    pub fn new(time_source: BoxedTimeSource, resolution: (u32, u32)) -> Self {
        Self {
            time_source,
            resolution,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// Records a new surface size; zero-area sizes are ignored, matching
    /// the swapchain's refusal to configure them.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.resolution = (width, height);
    }

    /// Advances the clock and describes the next frame.
    pub fn next_frame(&mut self) -> FrameRequest {
        FrameRequest {
            sample: self.time_source.sample(),
            resolution: self.resolution,
        }
    }

    /// Advances the clock and hands the frame to the presenter.
    pub fn tick(&mut self, presenter: &mut dyn FramePresenter) -> Result<FrameRequest> {
        let frame = self.next_frame();
        presenter.present(&frame)?;
        Ok(frame)
    }

    /// Restarts the clock from zero without touching the resolution.
    pub fn reset(&mut self) {
        self.time_source.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPresenter {
        frames: Vec<FrameRequest>,
    }

    impl FramePresenter for RecordingPresenter {
        fn present(&mut self, frame: &FrameRequest) -> Result<()> {
            self.frames.push(*frame);
            Ok(())
        }
    }

    fn driver_at(width: u32, height: u32) -> FrameDriver {
        FrameDriver::new(Box::new(FixedTimeSource::new(1.5)), (width, height))
    }

    #[test]
    fn resize_applies_on_the_very_next_frame() {
        let mut presenter = RecordingPresenter::default();
        let mut driver = driver_at(800, 600);

        driver.tick(&mut presenter).unwrap();
        driver.resize(1024, 768);
        driver.tick(&mut presenter).unwrap();

        assert_eq!(presenter.frames[0].resolution, (800, 600));
        assert_eq!(presenter.frames[1].resolution, (1024, 768));
    }

    #[test]
    fn frame_indices_stay_contiguous_across_resize() {
        let mut presenter = RecordingPresenter::default();
        let mut driver = driver_at(800, 600);

        driver.tick(&mut presenter).unwrap();
        driver.resize(1024, 768);
        driver.tick(&mut presenter).unwrap();
        driver.tick(&mut presenter).unwrap();

        let indices: Vec<u64> = presenter
            .frames
            .iter()
            .map(|frame| frame.sample.frame_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn zero_area_resizes_are_ignored() {
        let mut driver = driver_at(800, 600);
        driver.resize(0, 600);
        driver.resize(800, 0);
        assert_eq!(driver.resolution(), (800, 600));
    }

    #[test]
    fn fixed_source_holds_its_timestamp() {
        let mut source = FixedTimeSource::new(4.25);
        assert_eq!(source.sample().seconds, 4.25);
        assert_eq!(source.sample().seconds, 4.25);
        assert_eq!(source.sample().frame_index, 2);
        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }

    #[test]
    fn system_source_is_monotonic() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        let second = source.sample();
        assert!(second.seconds >= first.seconds);
        assert_eq!(second.frame_index, first.frame_index + 1);
    }

    #[test]
    fn policy_selects_the_matching_source() {
        let mut still = time_source_for_policy(&RenderPolicy::Still { time: Some(2.0) });
        assert_eq!(still.sample().seconds, 2.0);

        let mut animate = time_source_for_policy(&RenderPolicy::default());
        assert!(animate.sample().seconds < 1.0);
    }
}
