use glam::{Vec3, Vec4};

use super::Image;

/// Geometry snapshot for one frame.
///
/// Buffers are tightly packed per vertex: positions as `x, y, z, 1.0`,
/// normals as `x, y, z`, texture coordinates as `u, v`.
#[derive(Debug, Copy, Clone)]
pub struct Geometry<'a> {
    pub vertices: &'a [f32],
    pub indices: &'a [u32],
    pub normals: &'a [f32],
    pub uvs: Option<&'a [f32]>,
}

impl Geometry<'_> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Something the scene pass can draw.
///
/// `name` doubles as the texture cache key for the object's texture, so it
/// must be stable across frames.
pub trait SceneObject {
    fn name(&self) -> &str;

    /// Geometry for the current animation frame.
    fn geometry(&self) -> Geometry<'_>;

    /// Texture image, if the object is textured.
    fn texture(&self) -> Option<&Image>;

    /// RGBA colour, only used when there is no texture.
    fn colour(&self) -> Vec4;

    /// Euler angles in radians, applied X, then Y, then Z.
    fn rotation(&self) -> Vec3;

    fn offset(&self) -> Vec3;
}

impl<T: SceneObject + ?Sized> SceneObject for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn geometry(&self) -> Geometry<'_> {
        (**self).geometry()
    }

    fn texture(&self) -> Option<&Image> {
        (**self).texture()
    }

    fn colour(&self) -> Vec4 {
        (**self).colour()
    }

    fn rotation(&self) -> Vec3 {
        (**self).rotation()
    }

    fn offset(&self) -> Vec3 {
        (**self).offset()
    }
}
