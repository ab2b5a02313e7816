use std::cell::Cell;
use std::rc::Rc;

/// Exponential smoothing rate for the pointer, per second.
pub const POINTER_SMOOTHING: f32 = 8.0;

/// Latest raw pointer position in NDC, written by input and read by the driver.
///
/// Cloning shares the same slot; everything runs on one thread.
#[derive(Debug, Clone, Default)]
pub struct PointerTarget(Rc<Cell<[f32; 2]>>);

impl PointerTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, position: [f32; 2]) {
        self.0.set(position);
    }

    pub fn get(&self) -> [f32; 2] {
        self.0.get()
    }
}

/// Moves `current` toward `target` by `min(1, delta * 8)` of the gap.
pub fn smooth_toward(current: [f32; 2], target: [f32; 2], delta_seconds: f32) -> [f32; 2] {
    let amount = (delta_seconds * POINTER_SMOOTHING).clamp(0.0, 1.0);
    [
        current[0] + (target[0] - current[0]) * amount,
        current[1] + (target[1] - current[1]) * amount,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_target() {
        let target = PointerTarget::new();
        assert_eq!(target.get(), [0.0, 0.0]);
        let writer = target.clone();
        writer.set([0.5, -0.25]);
        assert_eq!(target.get(), [0.5, -0.25]);
    }

    #[test]
    fn smoothing_approaches_without_overshoot() {
        let target = [1.0, 1.0];
        let mut current = [0.0, 0.0];
        let mut last = current;
        for _ in 0..240 {
            current = smooth_toward(current, target, 1.0 / 60.0);
            assert!(current[0] >= last[0] && current[1] >= last[1]);
            assert!(current[0] <= 1.0 && current[1] <= 1.0);
            last = current;
        }
        assert!((1.0 - current[0]).abs() < 1e-3);
    }

    #[test]
    fn long_frames_snap_to_target() {
        assert_eq!(smooth_toward([0.2, -0.4], [1.0, 1.0], 0.5), [1.0, 1.0]);
        assert_eq!(smooth_toward([0.2, -0.4], [1.0, 1.0], 0.0), [0.2, -0.4]);
    }
}
