use std::sync::Arc;
use std::time::Instant;

use animator::{
    AnimationDriver, FrameError, FrameScheduler, FrameToken, InputAdapter, PointerTarget,
    TickStatus,
};
use bendconfig::{Config, Options};
use tracing::{debug, info};

use crate::gpu::GpuState;
use crate::types::{Container, InitError};

/// Frame scheduler backed by the container's redraw requests.
///
/// Platform redraws cannot be revoked, so cancellation only forgets the
/// token; the host hands the driver whatever [`take_pending`] returns and
/// the driver ignores anything stale.
///
/// [`take_pending`]: RedrawScheduler::take_pending
pub struct RedrawScheduler<C> {
    container: Arc<C>,
    next_id: u64,
    pending: Option<FrameToken>,
}

impl<C: Container> RedrawScheduler<C> {
    pub fn new(container: Arc<C>) -> Self {
        Self {
            container,
            next_id: 0,
            pending: None,
        }
    }

    pub fn take_pending(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}

impl<C: Container> FrameScheduler for RedrawScheduler<C> {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(token);
        self.container.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

/// Animated color-band background attached to one container.
///
/// Created stopped; call [`start`](Self::start) to begin animating. The host
/// forwards pointer, resize and redraw events to the `handle_*` methods.
pub struct ColorBends<C: Container> {
    container: Arc<C>,
    config: Config,
    driver: AnimationDriver<GpuState, RedrawScheduler<C>>,
    input: InputAdapter,
}

impl<C: Container> ColorBends<C> {
    pub fn init(container: Arc<C>, options: Options) -> Result<Self, InitError> {
        let config = options.resolve()?;
        Self::with_config(container, config)
    }

    pub fn with_config(container: Arc<C>, config: Config) -> Result<Self, InitError> {
        check_target(container.as_ref())?;

        let size = container.surface_size();
        let gpu = GpuState::new(container.clone(), size, config.transparent)
            .map_err(InitError::RenderContext)?;

        let pointer_target = PointerTarget::new();
        let scheduler = RedrawScheduler::new(container.clone());
        let mut driver = AnimationDriver::new(&config, gpu, scheduler, pointer_target.clone());
        driver.resize(size);
        let input = InputAdapter::attach(pointer_target);

        info!(
            width = size.width,
            height = size.height,
            colors = config.colors.len(),
            transparent = config.transparent,
            "color bends initialised"
        );

        Ok(Self {
            container,
            config,
            driver,
            input,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn start(&mut self) {
        self.driver.start(Instant::now());
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn is_disposed(&self) -> bool {
        self.driver.sink().is_none()
    }

    /// Pointer position in the container's logical client coordinates.
    pub fn handle_pointer_moved(&mut self, client_x: f64, client_y: f64) {
        self.input
            .pointer_moved(client_x, client_y, self.container.bounds());
    }

    /// Re-reads the container size and resizes the surface to match.
    pub fn handle_resized(&mut self) {
        let (width, height) = self.container.logical_size();
        let ratio = self.container.device_pixel_ratio();
        if let Some(size) = self.input.resized(width, height, ratio) {
            debug!(width = size.width, height = size.height, "resized surface");
            self.driver.resize(size);
        }
    }

    /// Runs the pending frame, if any. Redraws nobody asked for are ignored.
    pub fn handle_redraw(&mut self) -> Result<TickStatus, FrameError> {
        match self.driver.scheduler_mut().take_pending() {
            Some(token) => self.driver.tick(token, Instant::now()),
            None => Ok(TickStatus::Ignored),
        }
    }

    /// Stops the loop, detaches input and releases GPU resources. Idempotent.
    pub fn dispose(&mut self) {
        self.input.detach();
        if let Some(gpu) = self.driver.dispose() {
            let size = gpu.size();
            drop(gpu);
            info!(
                width = size.width,
                height = size.height,
                "released GPU surface"
            );
        }
    }
}

impl<C: Container> Drop for ColorBends<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn check_target<C: Container>(container: &C) -> Result<(), InitError> {
    container
        .window_handle()
        .map_err(|err| InitError::InvalidTarget(format!("window handle unavailable: {err}")))?;
    container
        .display_handle()
        .map_err(|err| InitError::InvalidTarget(format!("display handle unavailable: {err}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use raw_window_handle::{
        DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
    };

    use super::*;

    #[derive(Default)]
    struct DetachedContainer {
        redraws: AtomicUsize,
    }

    impl HasWindowHandle for DetachedContainer {
        fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl HasDisplayHandle for DetachedContainer {
        fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl Container for DetachedContainer {
        fn logical_size(&self) -> (f64, f64) {
            (320.0, 200.0)
        }

        fn device_pixel_ratio(&self) -> f64 {
            1.0
        }

        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn init_rejects_container_without_handles() {
        let container = Arc::new(DetachedContainer::default());
        let err = ColorBends::init(container, Options::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), "invalid-target");
    }

    #[test]
    fn init_rejects_bad_colors_before_touching_target() {
        let container = Arc::new(DetachedContainer::default());
        let options = Options {
            colors: Some(vec!["#12345".into()]),
            ..Options::default()
        };
        let err = ColorBends::init(container, options).err().unwrap();
        assert!(matches!(err, InitError::Configuration(_)));
        assert_eq!(err.kind(), "invalid-color");
    }

    #[test]
    fn redraw_scheduler_requests_and_forgets_frames() {
        let container = Arc::new(DetachedContainer::default());
        let mut scheduler = RedrawScheduler::new(container.clone());

        let first = scheduler.request_frame();
        let second = scheduler.request_frame();
        assert_ne!(first, second);
        assert_eq!(container.redraws.load(Ordering::SeqCst), 2);

        scheduler.cancel_frame(first);
        assert_eq!(scheduler.take_pending(), Some(second));
        assert_eq!(scheduler.take_pending(), None);

        let third = scheduler.request_frame();
        scheduler.cancel_frame(third);
        assert_eq!(scheduler.take_pending(), None);
    }

    #[test]
    fn container_surface_size_uses_capped_ratio() {
        struct Retina;
        impl HasWindowHandle for Retina {
            fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
                Err(HandleError::Unavailable)
            }
        }
        impl HasDisplayHandle for Retina {
            fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
                Err(HandleError::Unavailable)
            }
        }
        impl Container for Retina {
            fn logical_size(&self) -> (f64, f64) {
                (400.0, 300.0)
            }
            fn device_pixel_ratio(&self) -> f64 {
                3.0
            }
            fn request_redraw(&self) {}
        }

        let size = Retina.surface_size();
        assert_eq!((size.width, size.height), (800, 600));
        let bounds = Retina.bounds();
        assert_eq!((bounds.width, bounds.height), (400.0, 300.0));
    }
}
