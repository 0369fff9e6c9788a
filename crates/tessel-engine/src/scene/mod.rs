//! Contracts for the data the renderer consumes.
//!
//! Scene objects and images are owned by the caller; the renderer only reads
//! them while drawing.

mod image;
mod mesh;
mod object;

pub use image::Image;
pub use mesh::{Mesh, StaticObject};
pub use object::{Geometry, SceneObject};
