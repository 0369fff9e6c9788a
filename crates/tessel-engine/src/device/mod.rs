//! Window, surface and device bootstrap.
//!
//! This module is responsible for:
//! - creating the window the renderer draws into
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating and configuring the Surface and its depth target
//! - acquiring surface textures and recovering from surface errors

mod gpu;
mod init;
mod surface;

pub use gpu::Gpu;
pub use init::{create_window, SurfaceHints};
pub use surface::SurfaceErrorAction;

pub(crate) use surface::DEPTH_FORMAT;
