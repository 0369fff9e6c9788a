//! Tessel engine crate.
//!
//! The rendering core of a small real-time 3D engine: window and surface
//! bootstrap, shader tier negotiation, a named texture cache, and the scene,
//! text and image draw passes. Higher layers drive it through
//! [`render::Renderer`] directly or through [`window::Runtime`].

pub mod caps;
pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shader;
pub mod text;
pub mod texture;
pub mod window;

pub use caps::CapabilityTier;
pub use config::RendererConfig;
pub use error::{RenderError, Result};
pub use render::Renderer;
