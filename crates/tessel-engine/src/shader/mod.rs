//! Shader sources, compilation and program linking.
//!
//! Two programs exist for the lifetime of a renderer: [`ProgramKind::Geometry`]
//! for lit 3D objects and [`ProgramKind::Text`] for flat textured quads. Which
//! source directory they are built from depends only on the capability tier.

pub mod contract;
mod manager;

pub use contract::{AttributeSlot, ProgramKind, UniformSlot};
pub use manager::{
    perspective_matrix, ShaderManager, GEOMETRY_FRAGMENT_FILE, GEOMETRY_VERTEX_FILE,
    TEXT_FRAGMENT_FILE, TEXT_VERTEX_FILE,
};
