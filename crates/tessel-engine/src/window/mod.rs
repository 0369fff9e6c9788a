//! Event-loop runtime.
//!
//! Owns the `winit` event loop, creates the [`Renderer`](crate::render::Renderer)
//! once the platform is ready and drives an [`App`] frame by frame.

mod clock;
mod runtime;

pub use clock::{FrameClock, FrameTime};
pub use runtime::{App, AppControl, Runtime};
