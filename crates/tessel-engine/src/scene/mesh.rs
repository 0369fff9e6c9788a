use glam::{Vec3, Vec4};

use super::{Geometry, Image, SceneObject};

/// Owned vertex data in the layout [`Geometry`] describes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
    pub uvs: Option<Vec<f32>>,
}

// (normal, right, up) with right x up == normal, so each face winds
// counter-clockwise seen from outside.
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

impl Mesh {
    /// Axis-aligned cube centred on the origin with flat per-face normals and
    /// one full copy of the texture on every face.
    pub fn cube(half_extent: f32) -> Self {
        let mut mesh = Mesh {
            uvs: Some(Vec::with_capacity(48)),
            ..Default::default()
        };

        for (face, (normal, right, up)) in CUBE_FACES.iter().enumerate() {
            let (n, r, u) = (Vec3::from(*normal), Vec3::from(*right), Vec3::from(*up));
            for (sr, su, uv) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                let p = (n + r * sr + u * su) * half_extent;
                mesh.vertices.extend_from_slice(&[p.x, p.y, p.z, 1.0]);
                mesh.normals.extend_from_slice(normal);
                if let Some(uvs) = mesh.uvs.as_mut() {
                    uvs.extend_from_slice(&uv);
                }
            }

            let base = face as u32 * 4;
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    pub fn geometry(&self) -> Geometry<'_> {
        Geometry {
            vertices: &self.vertices,
            indices: &self.indices,
            normals: &self.normals,
            uvs: self.uvs.as_deref(),
        }
    }
}

/// A mesh placed in the scene with either a texture or a flat colour.
#[derive(Debug, Clone)]
pub struct StaticObject {
    name: String,
    mesh: Mesh,
    texture: Option<Image>,
    pub colour: Vec4,
    pub rotation: Vec3,
    pub offset: Vec3,
}

impl StaticObject {
    pub fn coloured(name: impl Into<String>, mesh: Mesh, colour: Vec4) -> Self {
        Self {
            name: name.into(),
            mesh,
            texture: None,
            colour,
            rotation: Vec3::ZERO,
            offset: Vec3::ZERO,
        }
    }

    pub fn textured(name: impl Into<String>, mesh: Mesh, texture: Image) -> Self {
        Self {
            name: name.into(),
            mesh,
            texture: Some(texture),
            colour: Vec4::ZERO,
            rotation: Vec3::ZERO,
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

impl SceneObject for StaticObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn geometry(&self) -> Geometry<'_> {
        self.mesh.geometry()
    }

    fn texture(&self) -> Option<&Image> {
        self.texture.as_ref()
    }

    fn colour(&self) -> Vec4 {
        self.colour
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn offset(&self) -> Vec3 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(mesh: &Mesh, i: u32) -> Vec3 {
        let i = i as usize * 4;
        Vec3::new(mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2])
    }

    #[test]
    fn cube_buffer_sizes() {
        let cube = Mesh::cube(0.5);
        let g = cube.geometry();
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.index_count(), 36);
        assert_eq!(cube.normals.len(), 24 * 3);
        assert_eq!(cube.uvs.as_ref().map(Vec::len), Some(24 * 2));
        assert!(cube.indices.iter().all(|&i| i < 24));
        assert!(cube.vertices.chunks(4).all(|v| v[3] == 1.0));
    }

    #[test]
    fn cube_triangles_face_outwards() {
        let cube = Mesh::cube(1.0);
        for tri in cube.indices.chunks(3) {
            let (a, b, c) = (vertex(&cube, tri[0]), vertex(&cube, tri[1]), vertex(&cube, tri[2]));
            let n = Vec3::from_slice(&cube.normals[tri[0] as usize * 3..]);
            assert!((b - a).cross(c - a).dot(n) > 0.0, "triangle {tri:?} winds inwards");
            // Every corner sits on the face plane.
            assert!((a.dot(n) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn static_object_exposes_texture_or_colour() {
        let plain = StaticObject::coloured("crate", Mesh::cube(1.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(plain.texture().is_none());
        assert_eq!(plain.colour(), Vec4::new(1.0, 0.0, 0.0, 1.0));

        let skin = StaticObject::textured("goat", Mesh::cube(1.0), Image::solid(1, 1, [1.0; 4]))
            .with_offset(Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(skin.name(), "goat");
        assert!(skin.texture().is_some());
        assert_eq!(skin.offset().z, -5.0);
    }
}
