//! Names and layouts shared between shader sources and binding code.
//!
//! Uniform names must match the shader sources exactly. Offsets describe the
//! std140-style block the WGSL shaders declare at group 0, binding 0.

use std::fmt;

pub const PERSPECTIVE_MATRIX: &str = "perspectiveMatrix";
pub const COLOUR: &str = "colour";
pub const LIGHT_DIRECTION: &str = "lightDirection";
pub const X_ROTATION_MATRIX: &str = "xRotationMatrix";
pub const Y_ROTATION_MATRIX: &str = "yRotationMatrix";
pub const Z_ROTATION_MATRIX: &str = "zRotationMatrix";
pub const OFFSET: &str = "offset";

/// Geometry program attribute slots.
pub const POSITION_SLOT: u32 = 0;
pub const NORMAL_SLOT: u32 = 1;
pub const UV_SLOT: u32 = 2;

/// Flat-quad (text program) attribute slots.
pub const QUAD_POSITION_SLOT: u32 = 0;
pub const QUAD_UV_SLOT: u32 = 1;

/// A uniform inside a program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub name: &'static str,
    /// Byte offset inside the block.
    pub offset: u32,
    /// Bytes written by the setter (a vec3 occupies 12 of its 16).
    pub size: u32,
}

/// A vertex attribute a program reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeSlot {
    pub slot: u32,
    /// `f32` components per vertex.
    pub components: u32,
}

const GEOMETRY_UNIFORMS: [UniformSlot; 7] = [
    UniformSlot { name: PERSPECTIVE_MATRIX, offset: 0, size: 64 },
    UniformSlot { name: X_ROTATION_MATRIX, offset: 64, size: 64 },
    UniformSlot { name: Y_ROTATION_MATRIX, offset: 128, size: 64 },
    UniformSlot { name: Z_ROTATION_MATRIX, offset: 192, size: 64 },
    UniformSlot { name: COLOUR, offset: 256, size: 16 },
    UniformSlot { name: LIGHT_DIRECTION, offset: 272, size: 12 },
    UniformSlot { name: OFFSET, offset: 288, size: 12 },
];

/// Size of the geometry uniform block, rounded to 16 bytes.
const GEOMETRY_BLOCK_SIZE: u32 = 304;

const GEOMETRY_ATTRIBUTES: [AttributeSlot; 3] = [
    AttributeSlot { slot: POSITION_SLOT, components: 4 },
    AttributeSlot { slot: NORMAL_SLOT, components: 3 },
    AttributeSlot { slot: UV_SLOT, components: 2 },
];

const QUAD_ATTRIBUTES: [AttributeSlot; 2] = [
    AttributeSlot { slot: QUAD_POSITION_SLOT, components: 4 },
    AttributeSlot { slot: QUAD_UV_SLOT, components: 2 },
];

/// The two programs the renderer links.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramKind {
    /// Lit, coloured or textured 3D geometry.
    Geometry,
    /// Flat textured quads: images, backgrounds and text.
    Text,
}

impl ProgramKind {
    pub fn uniforms(self) -> &'static [UniformSlot] {
        match self {
            ProgramKind::Geometry => &GEOMETRY_UNIFORMS,
            ProgramKind::Text => &[],
        }
    }

    pub fn uniform_block_size(self) -> u32 {
        match self {
            ProgramKind::Geometry => GEOMETRY_BLOCK_SIZE,
            // The pipeline layout is shared, so the text program still owns
            // a (never written) block of the same size.
            ProgramKind::Text => GEOMETRY_BLOCK_SIZE,
        }
    }

    pub fn attributes(self) -> &'static [AttributeSlot] {
        match self {
            ProgramKind::Geometry => &GEOMETRY_ATTRIBUTES,
            ProgramKind::Text => &QUAD_ATTRIBUTES,
        }
    }

    pub fn uniform(self, name: &str) -> Option<(usize, &'static UniformSlot)> {
        self.uniforms()
            .iter()
            .enumerate()
            .find(|(_, u)| u.name == name)
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProgramKind::Geometry => "geometry",
            ProgramKind::Text => "text",
        })
    }
}
