use tracing::debug;

use crate::pointer::PointerTarget;

/// Device pixel ratio ceiling applied when sizing the surface.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Surface size in physical pixels; never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Scales a logical size by the device pixel ratio, capped at 2x.
    pub fn from_logical(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        let scale = |logical: f64| {
            let logical = if logical.is_finite() { logical.max(0.0) } else { 0.0 };
            (logical * ratio).round().min(u32::MAX as f64) as u32
        };
        Self::new(scale(width), scale(height))
    }
}

/// Container bounds expressed in the same client space as pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Maps client coordinates to NDC: x grows rightward, y grows upward.
pub fn client_to_ndc(client_x: f64, client_y: f64, rect: ContainerRect) -> [f32; 2] {
    let width = if rect.width > 0.0 { rect.width } else { 1.0 };
    let height = if rect.height > 0.0 { rect.height } else { 1.0 };
    let x = ((client_x - rect.left) / width) * 2.0 - 1.0;
    let y = -(((client_y - rect.top) / height) * 2.0 - 1.0);
    [x.clamp(-1.0, 1.0) as f32, y.clamp(-1.0, 1.0) as f32]
}

/// Translates raw pointer and resize events into driver inputs.
///
/// Pointer positions are written straight to the shared [`PointerTarget`];
/// smoothing happens in the driver. Once detached, every event is ignored.
#[derive(Debug)]
pub struct InputAdapter {
    target: PointerTarget,
    attached: bool,
}

impl InputAdapter {
    pub fn attach(target: PointerTarget) -> Self {
        Self {
            target,
            attached: true,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns `true` when the event updated the pointer target.
    pub fn pointer_moved(&self, client_x: f64, client_y: f64, rect: ContainerRect) -> bool {
        if !self.attached {
            return false;
        }
        self.target.set(client_to_ndc(client_x, client_y, rect));
        true
    }

    /// Returns the surface size the renderer should adopt, if still attached.
    pub fn resized(
        &self,
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> Option<SurfaceSize> {
        if !self.attached {
            return None;
        }
        Some(SurfaceSize::from_logical(
            logical_width,
            logical_height,
            device_pixel_ratio,
        ))
    }

    /// Removes every listener. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if std::mem::replace(&mut self.attached, false) {
            debug!("input listeners detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_follow_screen_orientation() {
        let rect = ContainerRect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(client_to_ndc(10.0, 20.0, rect), [-1.0, 1.0]);
        assert_eq!(client_to_ndc(210.0, 120.0, rect), [1.0, -1.0]);
        assert_eq!(client_to_ndc(110.0, 70.0, rect), [0.0, 0.0]);
    }

    #[test]
    fn ndc_handles_empty_rect() {
        let rect = ContainerRect::new(0.0, 0.0, 0.0, 0.0);
        let [x, y] = client_to_ndc(0.5, 0.5, rect);
        assert!(x.is_finite() && y.is_finite());
        assert_eq!([x, y], [0.0, 0.0]);
    }

    #[test]
    fn surface_size_caps_pixel_ratio_and_floors_at_one() {
        assert_eq!(
            SurfaceSize::from_logical(800.0, 600.0, 3.0),
            SurfaceSize::new(1600, 1200)
        );
        assert_eq!(
            SurfaceSize::from_logical(800.0, 600.0, 1.5),
            SurfaceSize::new(1200, 900)
        );
        assert_eq!(
            SurfaceSize::from_logical(0.0, 0.0, 1.0),
            SurfaceSize::new(1, 1)
        );
        assert_eq!(
            SurfaceSize::from_logical(100.0, 50.0, f64::NAN),
            SurfaceSize::new(100, 50)
        );
        let zero = SurfaceSize::new(0, 0);
        assert_eq!((zero.width, zero.height), (1, 1));
    }

    #[test]
    fn pointer_target_defaults_to_origin_before_events() {
        let target = PointerTarget::new();
        let _adapter = InputAdapter::attach(target.clone());
        assert_eq!(target.get(), [0.0, 0.0]);
    }

    #[test]
    fn pointer_moves_write_target_directly() {
        let target = PointerTarget::new();
        let adapter = InputAdapter::attach(target.clone());
        assert!(adapter.is_attached());
        let rect = ContainerRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(adapter.pointer_moved(75.0, 25.0, rect));
        assert_eq!(
            adapter.resized(640.0, 480.0, 1.0),
            Some(SurfaceSize::new(640, 480))
        );
        assert_eq!(target.get(), [0.5, 0.5]);
    }

    #[test]
    fn detached_adapter_ignores_events() {
        let target = PointerTarget::new();
        let mut adapter = InputAdapter::attach(target.clone());
        adapter.detach();
        adapter.detach();
        assert!(!adapter.is_attached());
        let rect = ContainerRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!adapter.pointer_moved(100.0, 0.0, rect));
        assert_eq!(target.get(), [0.0, 0.0]);
        assert_eq!(adapter.resized(640.0, 480.0, 1.0), None);
    }
}
