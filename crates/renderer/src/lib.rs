//! GPU binding for the ColorBends background.
//!
//! [`ColorBends`] attaches to any [`Container`] exposing raw window and
//! display handles, compiles the color field shader with wgpu (GLSL through
//! naga) and renders one full-screen triangle per display refresh. Frame
//! timing and uniform updates live in the `animator` crate; this crate only
//! owns the surface, the pipeline and the uniform buffer.
//!
//! [`run_window`] hosts the background in a standalone winit window.

mod compile;
mod gpu;
mod handle;
mod types;
mod window;

pub use handle::{ColorBends, RedrawScheduler};
pub use types::{Container, InitError};
pub use window::{run_window, WindowOptions};
