//! The rendering context and its draw passes.
//!
//! Every draw goes through a [`scope::DrawScope`], which releases the
//! per-draw buffers, attribute slots, texture binding and vertex array on
//! every exit path. Persistent GPU state (programs, cached textures) is
//! owned by [`Renderer`] and released by [`Renderer::shutdown`].

mod diagnostics;
mod quad;
mod renderer;
mod scene_pass;
mod scope;
mod text;

pub use diagnostics::check_errors;
pub use quad::quad_vertices;
pub use renderer::Renderer;
pub use scene_pass::SCENE_LIGHT_DIRECTION;
pub use text::{text_cache_key, text_corners};
