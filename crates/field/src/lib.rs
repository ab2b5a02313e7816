//! The ColorBends color field.
//!
//! - `uniforms` holds the std140 parameter block uploaded to the GPU each
//!   frame and the helpers that derive rotation from configuration.
//! - `shade` is the scalar reference implementation of the fragment shader.
//! - `raster` evaluates the reference over a pixel grid for still frames.

mod raster;
mod shade;
mod uniforms;

pub use raster::render_rgba8;
pub use shade::{glow, shade};
pub use uniforms::{rotation_vector, Uniforms};
