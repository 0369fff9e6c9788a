//! GPU driver seam.
//!
//! The rendering core is written against [`Driver`], an immediate-mode view of
//! the graphics API: a current program, a current vertex array, a current
//! texture, numbered attribute slots and a queue of pending errors. The
//! production implementation lives in [`wgpu`](self::wgpu); tests use a
//! recording driver that counts allocations.

mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod wgpu;

pub use error::{GpuError, GpuErrorCode};

use crate::shader::ProgramKind;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Raw driver-assigned id. Never zero for a live object.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

handle!(
    /// A compiled, not yet linked, shader object.
    ShaderId
);
handle!(
    /// A linked shader program.
    ProgramId
);
handle!(
    /// A GPU data buffer.
    BufferId
);
handle!(
    /// A 2D texture.
    TextureId
);
handle!(
    /// A vertex-array object: a saved set of attribute bindings.
    VertexArrayId
);

/// Location of a named uniform inside a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub(crate) u32);

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// What a buffer will be bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data (`f32` components).
    Vertex,
    /// Triangle indices (`u32`).
    Index,
}

/// Internal storage format of a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFormat {
    /// Four 32-bit float channels.
    Rgba32Float,
    /// Four 8-bit normalized channels.
    Rgba8Unorm,
}

/// Pixel data for a new texture: tightly packed RGBA, one `f32` per channel
/// in `0.0..=1.0`, rows top to bottom.
#[derive(Debug, Copy, Clone)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub pixels: &'a [f32],
}

/// Capability set advertised by the active driver.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DriverCaps {
    /// Human-readable driver / adapter description.
    pub version: String,
    /// Higher shader tier is available.
    pub tier_a: bool,
    /// Lower shader tier is available.
    pub tier_b: bool,
}

/// Immediate-mode graphics driver.
///
/// Every call is synchronous from the caller's point of view. Misuse that a
/// state-machine API would flag (drawing without a program, unknown handles)
/// is reported through [`Driver::pop_error`], not by panicking.
pub trait Driver {
    /// Capabilities read when the driver was created.
    fn caps(&self) -> &DriverCaps;

    /// Current size of the drawing surface in pixels, if the driver knows it.
    /// A full-screen window may differ from the size that was requested.
    fn drawable_size(&self) -> Option<(u32, u32)>;

    fn set_clear_color(&mut self, rgba: [f32; 4]);
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clears colour and depth of the current frame.
    fn clear(&mut self);

    /// Presents the current frame (buffer swap).
    fn present(&mut self);

    /// Compiles `source` for `stage`. On failure returns the compiler log.
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String>;
    fn delete_shader(&mut self, shader: ShaderId);

    /// Links a vertex/fragment pair into a program with `kind`'s attribute
    /// and uniform layout. On failure returns the linker log. The shader
    /// objects stay alive; callers release them.
    fn link_program(
        &mut self,
        kind: ProgramKind,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId, String>;
    fn delete_program(&mut self, program: ProgramId);
    fn use_program(&mut self, program: Option<ProgramId>);

    /// Looks up a uniform by name. `None` if the program has no such uniform.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Uniform setters apply to the program bound with [`Driver::use_program`].
    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]);
    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]);
    fn set_uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]);

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> BufferId;
    fn delete_buffer(&mut self, buffer: BufferId);

    /// Binds the index buffer used by [`Driver::draw_indexed`]. Recorded in
    /// the current vertex array.
    fn bind_index_buffer(&mut self, buffer: BufferId);

    /// Feeds attribute `slot` from `buffer`, `components` floats per vertex.
    fn enable_attribute(&mut self, slot: u32, buffer: BufferId, components: u32);
    fn disable_attribute(&mut self, slot: u32);

    fn create_vertex_array(&mut self) -> VertexArrayId;
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>);
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    fn create_texture(&mut self, upload: TextureUpload<'_>) -> TextureId;
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn delete_texture(&mut self, texture: TextureId);

    /// Draws indexed triangles from the bound index buffer.
    fn draw_indexed(&mut self, index_count: u32);

    /// Draws non-indexed triangles.
    fn draw_arrays(&mut self, vertex_count: u32);

    /// Pops the oldest pending error, if any.
    fn pop_error(&mut self) -> Option<GpuError>;

    /// Releases the drawing surface and the window it belongs to.
    fn release_surface(&mut self);
}
