//! Per-frame driving of the ColorBends field.
//!
//! The host owns an [`AnimationDriver`] and forwards two kinds of events to
//! it: frames fired by its [`FrameScheduler`] and input translated by an
//! [`InputAdapter`]. The driver integrates time, smooths the pointer and hands
//! a consistent [`field::Uniforms`] snapshot to its [`FrameSink`] once per
//! frame.
//!
//! ```text
//!   pointer / resize ──▶ InputAdapter ──▶ PointerTarget ─┐
//!                                                        ▼
//!   FrameScheduler ──token──▶ AnimationDriver::tick ──▶ FrameSink::draw
//!          ▲                                  │
//!          └──────────── request_frame ◀──────┘
//! ```

mod driver;
mod frame;
mod input;
mod pointer;

pub use driver::{AnimationDriver, DriverState, TickStatus};
pub use frame::{FrameError, FrameScheduler, FrameSink, FrameToken, ManualScheduler};
pub use input::{client_to_ndc, ContainerRect, InputAdapter, SurfaceSize, MAX_PIXEL_RATIO};
pub use pointer::{smooth_toward, PointerTarget, POINTER_SMOOTHING};
