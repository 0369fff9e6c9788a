use glam::Vec3;

use crate::driver::Driver;
use crate::error::{RenderError, Result};
use crate::shader::contract::{QUAD_POSITION_SLOT, QUAD_UV_SLOT};
use crate::shader::ProgramKind;

use super::diagnostics::check_errors;
use super::scope::DrawScope;
use super::Renderer;

/// Corner order of the two triangles; they share the 1-3 diagonal.
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 3, 3, 1, 2];

/// Texture coordinates matching [`QUAD_TRIANGLES`]: corner 0 samples the
/// top-right of the texture, corner 2 the bottom-left.
const QUAD_UVS: [f32; 12] = [
    1.0, 0.0, //
    0.0, 0.0, //
    1.0, 1.0, //
    1.0, 1.0, //
    0.0, 0.0, //
    0.0, 1.0, //
];

/// Expands four corners into six `x, y, z, 1.0` vertices.
pub fn quad_vertices(corners: &[Vec3; 4]) -> [f32; 24] {
    let mut out = [0.0; 24];
    for (vertex, &corner) in out.chunks_exact_mut(4).zip(QUAD_TRIANGLES.iter()) {
        vertex.copy_from_slice(&corners[corner].extend(1.0).to_array());
    }
    out
}

impl<D: Driver> Renderer<D> {
    /// Draws a background or image quad with a texture registered through
    /// [`Renderer::generate_texture`].
    pub fn render_image(&mut self, corners: [Vec3; 4], texture_name: &str) -> Result<()> {
        self.render_textured_quad(&corners, texture_name)
    }

    /// Draws a flat quad with the text program and the cached texture
    /// `texture_name`.
    ///
    /// Fails with [`RenderError::TextureNotGenerated`], without touching the
    /// GPU, when the name is not in the cache.
    pub fn render_textured_quad(&mut self, corners: &[Vec3; 4], texture_name: &str) -> Result<()> {
        let texture = self
            .textures
            .lookup(texture_name)
            .ok_or_else(|| RenderError::TextureNotGenerated {
                name: texture_name.to_string(),
            })?;
        let program = self.program(ProgramKind::Text)?;
        let positions = quad_vertices(corners);

        {
            let mut scope = DrawScope::begin(&mut self.driver, self.tier);
            scope.bind_texture(texture);
            scope.use_program(Some(program));
            scope.attribute(QUAD_POSITION_SLOT, &positions, 4);
            scope.attribute(QUAD_UV_SLOT, &QUAD_UVS, 2);
            scope.draw_arrays(6);
        }

        check_errors(&mut self.driver, "rendering textured quad", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{Call, RecordingDriver};
    use crate::driver::{BufferTarget, GpuErrorCode};
    use crate::render::test_support::renderer;
    use crate::scene::Image;

    const SCREEN: [Vec3; 4] = [
        Vec3::new(1.0, 1.0, 0.9),
        Vec3::new(-1.0, 1.0, 0.9),
        Vec3::new(-1.0, -1.0, 0.9),
        Vec3::new(1.0, -1.0, 0.9),
    ];

    #[test]
    fn triangles_share_a_diagonal() {
        let v = quad_vertices(&SCREEN);
        let corner = |i: usize| &v[i * 4..i * 4 + 4];
        assert_eq!(corner(0), &[1.0, 1.0, 0.9, 1.0]);
        assert_eq!(corner(1), &[-1.0, 1.0, 0.9, 1.0]);
        assert_eq!(corner(2), &[1.0, -1.0, 0.9, 1.0]);
        assert_eq!(corner(3), corner(2));
        assert_eq!(corner(4), corner(1));
        assert_eq!(corner(5), &[-1.0, -1.0, 0.9, 1.0]);
    }

    #[test]
    fn registered_texture_is_drawn_and_transients_released() {
        let mut r = renderer(RecordingDriver::tier_a());
        let sky = r.generate_texture("sky", &Image::solid(4, 4, [0.3, 0.5, 0.9, 1.0]));
        r.driver().clear_journal();

        r.render_image(SCREEN, "sky").unwrap();

        let d = r.driver();
        assert_eq!(d.count(|c| *c == Call::DrawArrays(6)), 1);
        assert_eq!(d.count(|c| *c == Call::BindTexture(Some(sky))), 1);
        assert_eq!(
            d.count(|c| matches!(c, Call::CreateBuffer(BufferTarget::Vertex, _, 96))),
            1
        );
        assert_eq!(
            d.count(|c| matches!(c, Call::CreateBuffer(BufferTarget::Vertex, _, 48))),
            1
        );
        assert_eq!(d.live_buffers(), 0);
        assert_eq!(d.live_vertex_arrays(), 0);
        assert_eq!(d.enabled_slots(), 0);
        assert_eq!(d.live_textures(), 1);
    }

    #[test]
    fn unknown_texture_is_an_error_without_gpu_work() {
        let mut r = renderer(RecordingDriver::tier_b_only());
        r.driver().clear_journal();

        let err = r.render_image(SCREEN, "ocean").unwrap_err();

        assert_eq!(err.to_string(), "texture ocean has not been generated");
        assert!(r.driver().calls().is_empty());
    }

    #[test]
    fn draw_errors_are_fatal_after_cleanup() {
        let mut r = renderer(RecordingDriver::tier_a());
        r.generate_texture("sky", &Image::solid(1, 1, [1.0; 4]));
        r.driver_mut().errors_on_next_draw = vec![crate::driver::GpuError::new(GpuErrorCode::InvalidOperation)];

        let err = r.render_image(SCREEN, "sky").unwrap_err();

        assert!(matches!(err, RenderError::Gpu { ref when, .. } if when == "rendering textured quad"));
        assert_eq!(r.driver().live_buffers(), 0);
        assert_eq!(r.driver().live_vertex_arrays(), 0);
    }
}
