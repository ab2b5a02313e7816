use field::Uniforms;

use crate::input::SurfaceSize;

/// Handle for one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn new(id: u64) -> Self {
        FrameToken(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// The frame was dropped but the loop can keep going.
    #[error("frame skipped: {0}")]
    Recoverable(String),
    /// Nothing more can be drawn; the driver stops.
    #[error("rendering failed: {0}")]
    Fatal(String),
}

/// Where frames go: the GPU surface in production, a recorder in tests.
pub trait FrameSink {
    /// Adopts `size`, returning the size actually applied (which may be
    /// clamped to device limits).
    fn resize(&mut self, size: SurfaceSize) -> SurfaceSize;
    fn draw(&mut self, uniforms: &Uniforms) -> Result<(), FrameError>;
}

/// Source of display-refresh callbacks.
///
/// A requested frame fires at most once; a cancelled token never fires.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Scheduler whose frames fire only when the host drains them.
///
/// Used by headless hosts and by tests to advance time explicitly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every frame that is due.
    pub fn take_due(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|pending| *pending != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_hands_out_unique_tokens() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.request_frame();
        let second = scheduler.request_frame();
        assert_ne!(first, second);
        assert_eq!(scheduler.take_due(), vec![first, second]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn cancelled_tokens_never_fire() {
        let mut scheduler = ManualScheduler::new();
        let token = scheduler.request_frame();
        scheduler.cancel_frame(token);
        assert!(scheduler.take_due().is_empty());
    }
}
