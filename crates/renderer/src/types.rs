use animator::{ContainerRect, SurfaceSize};
use bendconfig::ConfigError;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// Host element the background fills.
///
/// Sizes are logical; the surface is allocated at
/// `logical * min(device_pixel_ratio, 2)`.
pub trait Container: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static {
    fn logical_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Asks the platform to deliver one redraw callback.
    fn request_redraw(&self);

    fn surface_size(&self) -> SurfaceSize {
        let (width, height) = self.logical_size();
        SurfaceSize::from_logical(width, height, self.device_pixel_ratio())
    }

    /// Bounds in the coordinate space pointer events are reported in.
    fn bounds(&self) -> ContainerRect {
        let (width, height) = self.logical_size();
        ContainerRect::new(0.0, 0.0, width, height)
    }
}

impl Container for winit::window::Window {
    fn logical_size(&self) -> (f64, f64) {
        let logical = self.inner_size().to_logical::<f64>(self.scale_factor());
        (logical.width, logical.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.scale_factor()
    }

    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("invalid render target: {0}")]
    InvalidTarget(String),
    #[error("GPU rendering context unavailable: {0:#}")]
    RenderContext(#[source] anyhow::Error),
}

impl InitError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            InitError::Configuration(err) => err.kind(),
            InitError::InvalidTarget(_) => "invalid-target",
            InitError::RenderContext(_) => "render-context",
        }
    }
}
