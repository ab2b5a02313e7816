use std::time::{Duration, Instant};

use bendconfig::Config;
use field::{rotation_vector, Uniforms};
use tracing::{debug, error, warn};

use crate::frame::{FrameError, FrameScheduler, FrameSink, FrameToken};
use crate::input::SurfaceSize;
use crate::pointer::{smooth_toward, PointerTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Uniforms advanced and the sink drew a frame.
    Drawn,
    /// Uniforms advanced but the sink dropped the frame.
    Skipped,
    /// Stale or unexpected token; nothing happened.
    Ignored,
}

struct FrameStats {
    last_report: Instant,
    frames_since_report: u32,
    frame_count: u64,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            last_report: now,
            frames_since_report: 0,
            frame_count: 0,
        }
    }

    fn record(&mut self, now: Instant, elapsed: f32) {
        self.frames_since_report += 1;
        self.frame_count = self.frame_count.saturating_add(1);
        let window = now.saturating_duration_since(self.last_report);
        if window >= Duration::from_secs(1) {
            let fps = self.frames_since_report as f32 / window.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame_count = self.frame_count,
                time = elapsed,
                "render stats"
            );
            self.frames_since_report = 0;
            self.last_report = now;
        }
    }
}

/// Owns the render loop and is the only writer of [`Uniforms`].
///
/// Each tick integrates time, derives rotation, smooths the pointer, then
/// hands the uniforms to the sink and asks the scheduler for the next frame.
pub struct AnimationDriver<S, F> {
    rotation: f32,
    auto_rotate: f32,
    uniforms: Uniforms,
    sink: Option<S>,
    scheduler: F,
    pointer_target: PointerTarget,
    pointer_current: [f32; 2],
    state: DriverState,
    pending: Option<FrameToken>,
    elapsed: Duration,
    last_tick: Option<Instant>,
    stats: Option<FrameStats>,
}

impl<S, F> AnimationDriver<S, F>
where
    S: FrameSink,
    F: FrameScheduler,
{
    pub fn new(config: &Config, sink: S, scheduler: F, pointer_target: PointerTarget) -> Self {
        Self {
            rotation: config.rotation,
            auto_rotate: config.auto_rotate,
            uniforms: Uniforms::from_config(config, 1, 1),
            sink: Some(sink),
            scheduler,
            pointer_target,
            pointer_current: [0.0, 0.0],
            state: DriverState::Stopped,
            pending: None,
            elapsed: Duration::ZERO,
            last_tick: None,
            stats: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pointer_current(&self) -> [f32; 2] {
        self.pointer_current
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    /// Stopped -> Running; schedules the first frame. No-op while running.
    ///
    /// Elapsed time resumes where it left off; the stopped interval is not
    /// counted.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() || self.sink.is_none() {
            return;
        }
        self.state = DriverState::Running;
        self.last_tick = Some(now);
        self.stats = Some(FrameStats::new(now));
        self.pending = Some(self.scheduler.request_frame());
        debug!(elapsed = self.elapsed.as_secs_f32(), "animation started");
    }

    /// Running -> Stopped; cancels the outstanding frame request.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = DriverState::Stopped;
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        debug!(elapsed = self.elapsed.as_secs_f32(), "animation stopped");
    }

    /// Resizes the sink; the canvas uniform follows the size the sink applied.
    pub fn resize(&mut self, size: SurfaceSize) {
        let applied = match self.sink.as_mut() {
            Some(sink) => sink.resize(size),
            None => size,
        };
        self.uniforms.set_canvas(applied.width, applied.height);
    }

    /// Runs one frame for `token`.
    ///
    /// Tokens other than the outstanding request are ignored, so a frame that
    /// fires after [`stop`](Self::stop) never draws. A fatal sink error stops
    /// the driver and is returned.
    pub fn tick(&mut self, token: FrameToken, now: Instant) -> Result<TickStatus, FrameError> {
        if !self.is_running() || self.pending != Some(token) {
            return Ok(TickStatus::Ignored);
        }
        self.pending = None;

        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.elapsed += delta;

        let seconds = self.elapsed.as_secs_f32();
        self.uniforms.set_time(seconds);
        self.uniforms
            .set_rotation(rotation_vector(self.rotation, self.auto_rotate, seconds));
        self.pointer_current = smooth_toward(
            self.pointer_current,
            self.pointer_target.get(),
            delta.as_secs_f32(),
        );
        self.uniforms.set_pointer(self.pointer_current);

        let Some(sink) = self.sink.as_mut() else {
            self.stop();
            return Ok(TickStatus::Ignored);
        };

        let status = match sink.draw(&self.uniforms) {
            Ok(()) => {
                if let Some(stats) = self.stats.as_mut() {
                    stats.record(now, seconds);
                }
                TickStatus::Drawn
            }
            Err(FrameError::Recoverable(reason)) => {
                warn!(%reason, "frame skipped");
                TickStatus::Skipped
            }
            Err(err @ FrameError::Fatal(_)) => {
                error!(error = %err, "stopping animation after fatal draw error");
                self.stop();
                return Err(err);
            }
        };

        self.pending = Some(self.scheduler.request_frame());
        Ok(status)
    }

    /// Stops the loop and releases the sink. Later calls return `None`.
    pub fn dispose(&mut self) -> Option<S> {
        self.stop();
        let sink = self.sink.take();
        if sink.is_some() {
            debug!("animation driver disposed");
        }
        sink
    }
}
