use std::sync::Arc;

use animator::SurfaceSize;
use anyhow::{Context as AnyhowContext, Result};

use crate::types::Container;

/// Device, queue and configured surface for one container.
pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: SurfaceSize,
    pub surface_format: wgpu::TextureFormat,
    max_dimension: u32,
}

impl GpuContext {
    pub(crate) fn new<C: Container>(
        container: Arc<C>,
        initial_size: SurfaceSize,
        transparent: bool,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance
            .create_surface(container)
            .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        let limits = adapter.limits();
        tracing::debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "selected GPU adapter"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("colorbends device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let Some(&first_format) = surface_caps.formats.first() else {
            anyhow::bail!("surface is incompatible with the selected adapter");
        };

        // Field colors are written as-is; no sRGB encode on store.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .unwrap_or_else(|| {
                tracing::warn!(
                    fallback = ?first_format,
                    "no linear (non-sRGB) surface format available; falling back to {:?}",
                    first_format
                );
                first_format
            });

        let alpha_mode = select_alpha_mode(&surface_caps.alpha_modes, transparent);
        if transparent && alpha_mode == wgpu::CompositeAlphaMode::Opaque {
            tracing::warn!("compositor does not support transparent surfaces; output will be opaque");
        }

        let present_mode = surface_caps
            .present_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::PresentMode::Fifo)
            .or_else(|| surface_caps.present_modes.first().copied())
            .unwrap_or(wgpu::PresentMode::Fifo);

        tracing::debug!(?surface_format, ?alpha_mode, ?present_mode, "configuring surface");

        let max_dimension = limits.max_texture_dimension_2d.max(1);
        let size = clamp_size(initial_size, max_dimension);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            surface_format,
            max_dimension,
        })
    }

    /// Reconfigures the surface and returns the size in use, clamped to the
    /// texture limit. A repeat of the current size is a no-op.
    pub(crate) fn resize(&mut self, new_size: SurfaceSize) -> SurfaceSize {
        let size = clamp_size(new_size, self.max_dimension);
        if size != self.size {
            self.size = size;
            self.reconfigure();
        }
        size
    }

    pub(crate) fn reconfigure(&mut self) {
        self.config.width = self.size.width;
        self.config.height = self.size.height;
        self.surface.configure(&self.device, &self.config);
    }
}

fn clamp_size(size: SurfaceSize, max_dimension: u32) -> SurfaceSize {
    if size.width > max_dimension || size.height > max_dimension {
        tracing::warn!(
            width = size.width,
            height = size.height,
            max_dimension,
            "surface exceeds GPU texture limit; clamping"
        );
    }
    SurfaceSize::new(
        size.width.min(max_dimension),
        size.height.min(max_dimension),
    )
}

fn select_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    let preferred: &[wgpu::CompositeAlphaMode] = if transparent {
        &[
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::Inherit,
        ]
    } else {
        &[wgpu::CompositeAlphaMode::Opaque]
    };
    preferred
        .iter()
        .copied()
        .find(|mode| supported.contains(mode))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
