use std::sync::Arc;

use anyhow::{anyhow, Result};
use bendconfig::Config;
use tracing::{error, info};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::handle::ColorBends;

/// Settings for the standalone preview window.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    /// Logical window size.
    pub size: (u32, u32),
    pub config: Config,
}

/// Opens a window filled by the background and runs until it is closed.
///
/// Space pauses and resumes the animation; Escape closes the window.
pub fn run_window(options: WindowOptions) -> Result<()> {
    let WindowOptions {
        title,
        size,
        config,
    } = options;

    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(LogicalSize::new(size.0.max(1), size.1.max(1)))
        .with_transparent(config.transparent)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);
    let window_id = window.id();

    let mut bends = ColorBends::with_config(window.clone(), config)?;
    bends.start();
    info!(width = size.0, height = size.1, "preview window running");

    let run_result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);
        let Event::WindowEvent {
            window_id: id,
            event,
        } = event
        else {
            return;
        };
        if id != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                bends.dispose();
                elwt.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => {
                        bends.dispose();
                        elwt.exit();
                    }
                    Key::Named(NamedKey::Space) => {
                        if bends.is_running() {
                            bends.stop();
                        } else {
                            bends.start();
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(window.scale_factor());
                bends.handle_pointer_moved(logical.x, logical.y);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                bends.handle_resized();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = bends.handle_redraw() {
                    error!(error = %err, "rendering stopped; closing preview");
                    bends.dispose();
                    elwt.exit();
                }
            }
            _ => {}
        }
    });

    run_result.map_err(|err| anyhow!("window event loop failed: {err}"))
}
