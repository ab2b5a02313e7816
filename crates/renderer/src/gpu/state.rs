use std::sync::Arc;

use animator::{FrameError, FrameSink, SurfaceSize};
use anyhow::Result;
use field::Uniforms;
use tracing::{debug, warn};

use crate::types::Container;

use super::context::GpuContext;
use super::pipeline::BendsPipeline;

/// GPU resources behind one ColorBends surface.
///
/// Each draw uploads the uniform block, clears the target and covers it with
/// a single full-screen triangle.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: BendsPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub(crate) fn new<C: Container>(
        container: Arc<C>,
        size: SurfaceSize,
        transparent: bool,
    ) -> Result<Self> {
        let context = GpuContext::new(container, size, transparent)?;
        let pipeline = BendsPipeline::new(&context.device, context.surface_format, transparent);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            clear_color: clear_color(transparent),
        })
    }

    pub(crate) fn size(&self) -> SurfaceSize {
        self.context.size
    }

    fn render(&mut self, uniforms: &Uniforms) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn handle_surface_error(&mut self, error: wgpu::SurfaceError) -> FrameError {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                debug!(?error, "surface needs reconfiguring");
                self.context.reconfigure();
                FrameError::Recoverable(format!("surface {error}; reconfigured"))
            }
            wgpu::SurfaceError::OutOfMemory => {
                FrameError::Fatal("surface out of memory".to_string())
            }
            wgpu::SurfaceError::Timeout => {
                FrameError::Recoverable("surface timeout; retrying next frame".to_string())
            }
            wgpu::SurfaceError::Other => {
                warn!("surface reported an unknown error");
                FrameError::Recoverable("unknown surface error; retrying next frame".to_string())
            }
        }
    }
}

impl FrameSink for GpuState {
    fn resize(&mut self, size: SurfaceSize) -> SurfaceSize {
        self.context.resize(size)
    }

    fn draw(&mut self, uniforms: &Uniforms) -> Result<(), FrameError> {
        self.render(uniforms)
            .map_err(|error| self.handle_surface_error(error))
    }
}

/// Transparent surfaces clear to transparent black, opaque ones to black.
fn clear_color(transparent: bool) -> wgpu::Color {
    if transparent {
        wgpu::Color::TRANSPARENT
    } else {
        wgpu::Color::BLACK
    }
}
