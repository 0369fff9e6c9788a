use glam::Mat4;

use crate::driver::{Driver, ProgramId};
use crate::error::Result;
use crate::scene::SceneObject;
use crate::shader::contract::{
    COLOUR, LIGHT_DIRECTION, NORMAL_SLOT, OFFSET, POSITION_SLOT, UV_SLOT, X_ROTATION_MATRIX,
    Y_ROTATION_MATRIX, Z_ROTATION_MATRIX,
};
use crate::shader::ProgramKind;

use super::diagnostics::check_errors;
use super::scope::DrawScope;
use super::Renderer;

/// Direction of the single scene light.
pub const SCENE_LIGHT_DIRECTION: [f32; 3] = [0.0, 0.9, 0.2];

// Uniforms a program does not declare are skipped, like a GL location of -1.
fn set_mat4<D: Driver + ?Sized>(driver: &mut D, program: ProgramId, name: &str, value: &Mat4) {
    if let Some(location) = driver.uniform_location(program, name) {
        driver.set_uniform_mat4(location, &value.to_cols_array());
    }
}

fn set_vec4<D: Driver + ?Sized>(driver: &mut D, program: ProgramId, name: &str, value: [f32; 4]) {
    if let Some(location) = driver.uniform_location(program, name) {
        driver.set_uniform_vec4(location, value);
    }
}

fn set_vec3<D: Driver + ?Sized>(driver: &mut D, program: ProgramId, name: &str, value: [f32; 3]) {
    if let Some(location) = driver.uniform_location(program, name) {
        driver.set_uniform_vec3(location, value);
    }
}

impl<D: Driver> Renderer<D> {
    /// Draws every object with the geometry program, in iteration order.
    ///
    /// Geometry is uploaded fresh for each object and released before the
    /// next one; object textures are created once, keyed by object name.
    /// Stops at the first object whose diagnostic checkpoint fails.
    pub fn render_scene_objects<'o, I, O>(&mut self, objects: I) -> Result<()>
    where
        I: IntoIterator<Item = &'o O>,
        O: SceneObject + ?Sized + 'o,
    {
        let program = self.program(ProgramKind::Geometry)?;
        self.driver.use_program(Some(program));

        let result = objects
            .into_iter()
            .try_for_each(|object| self.draw_object(program, object));

        self.driver.use_program(None);
        result
    }

    pub fn render_scene_object<O: SceneObject + ?Sized>(&mut self, object: &O) -> Result<()> {
        self.render_scene_objects(std::iter::once(object))
    }

    fn draw_object<O: SceneObject + ?Sized>(&mut self, program: ProgramId, object: &O) -> Result<()> {
        let geometry = object.geometry();
        let mut scope = DrawScope::begin(&mut self.driver, self.tier);

        scope.attribute(POSITION_SLOT, geometry.vertices, 4);
        scope.indices(geometry.indices);
        scope.attribute(NORMAL_SLOT, geometry.normals, 3);

        match object.texture() {
            Some(image) => {
                set_vec4(&mut *scope, program, COLOUR, [0.0; 4]);
                let texture = self.textures.get_or_create(
                    &mut *scope,
                    object.name(),
                    image.data(),
                    image.width(),
                    image.height(),
                );
                scope.bind_texture(texture);
                match geometry.uvs {
                    Some(uvs) => {
                        scope.attribute(UV_SLOT, uvs, 2);
                    }
                    None => log::debug!("{} is textured but has no UVs", object.name()),
                }
            }
            None => set_vec4(&mut *scope, program, COLOUR, object.colour().to_array()),
        }

        set_vec3(&mut *scope, program, LIGHT_DIRECTION, SCENE_LIGHT_DIRECTION);

        let rotation = object.rotation();
        set_mat4(&mut *scope, program, X_ROTATION_MATRIX, &Mat4::from_rotation_x(rotation.x));
        set_mat4(&mut *scope, program, Y_ROTATION_MATRIX, &Mat4::from_rotation_y(rotation.y));
        set_mat4(&mut *scope, program, Z_ROTATION_MATRIX, &Mat4::from_rotation_z(rotation.z));
        set_vec3(&mut *scope, program, OFFSET, object.offset().to_array());

        check_errors(&mut *scope, "rendering scene", true)?;

        scope.draw_indexed(geometry.index_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;
    use crate::driver::mock::{Call, RecordingDriver};
    use crate::driver::{BufferTarget, GpuErrorCode};
    use crate::error::RenderError;
    use crate::render::test_support::renderer;
    use crate::scene::{Image, Mesh, StaticObject};

    fn crate_box() -> StaticObject {
        StaticObject::coloured("crate", Mesh::cube(0.5), Vec4::new(0.8, 0.4, 0.1, 1.0))
            .with_offset(Vec3::new(0.0, 0.0, -4.0))
    }

    fn goat() -> StaticObject {
        StaticObject::textured("goat", Mesh::cube(0.5), Image::solid(2, 2, [1.0, 1.0, 1.0, 1.0]))
    }

    fn uniform(calls: &[Call], name: &str) -> Option<Vec<f32>> {
        calls.iter().rev().find_map(|c| match c {
            Call::SetUniform(n, v) if *n == name => Some(v.clone()),
            _ => None,
        })
    }

    #[test]
    fn coloured_object_leaves_nothing_behind() {
        let mut r = renderer(RecordingDriver::tier_a());
        r.driver().clear_journal();

        r.render_scene_object(&crate_box()).unwrap();

        let d = r.driver();
        assert_eq!(d.live_buffers(), 0);
        assert_eq!(d.live_vertex_arrays(), 0);
        assert_eq!(d.enabled_slots(), 0);
        assert_eq!(d.count(|c| matches!(c, Call::DrawIndexed(36))), 1);
        assert_eq!(d.count(|c| matches!(c, Call::CreateTexture(..))), 0);
        assert_eq!(d.count(|c| matches!(c, Call::EnableAttribute(UV_SLOT, ..))), 0);

        let calls = d.calls();
        assert_eq!(uniform(&calls, COLOUR), Some(vec![0.8, 0.4, 0.1, 1.0]));
        assert_eq!(uniform(&calls, LIGHT_DIRECTION), Some(SCENE_LIGHT_DIRECTION.to_vec()));
        assert_eq!(uniform(&calls, OFFSET), Some(vec![0.0, 0.0, -4.0]));
        assert_eq!(calls.last(), Some(&Call::UseProgram(None)));
    }

    #[test]
    fn buffers_are_uploaded_in_attribute_order() {
        let mut r = renderer(RecordingDriver::tier_b_only());
        r.driver().clear_journal();

        r.render_scene_object(&goat()).unwrap();

        let created: Vec<(BufferTarget, usize)> = r
            .driver()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::CreateBuffer(target, _, len) => Some((*target, *len)),
                _ => None,
            })
            .collect();
        assert_eq!(
            created,
            vec![
                (BufferTarget::Vertex, 24 * 4 * 4),
                (BufferTarget::Index, 36 * 4),
                (BufferTarget::Vertex, 24 * 3 * 4),
                (BufferTarget::Vertex, 24 * 2 * 4),
            ]
        );
        // Tier B draws with the default attribute state.
        assert_eq!(r.driver().count(|c| matches!(c, Call::CreateVertexArray(_))), 0);
    }

    #[test]
    fn textured_object_zeroes_colour_and_caches_texture() {
        let mut r = renderer(RecordingDriver::tier_a());
        let goat = goat();

        r.render_scene_objects([&goat, &goat]).unwrap();

        let d = r.driver();
        assert_eq!(d.count(|c| matches!(c, Call::CreateTexture(..))), 1);
        assert_eq!(d.count(|c| matches!(c, Call::DrawIndexed(36))), 2);
        assert_eq!(d.count(|c| matches!(c, Call::EnableAttribute(UV_SLOT, _, 2))), 2);
        assert_eq!(uniform(&d.calls(), COLOUR), Some(vec![0.0; 4]));

        let handle = r.texture_handle("goat").unwrap();
        assert_eq!(d.count(|c| *c == Call::BindTexture(Some(handle))), 2);
        assert_eq!(d.live_buffers(), 0);
        assert_eq!(d.enabled_slots(), 0);
    }

    #[test]
    fn rotation_matrices_follow_euler_angles() {
        let mut r = renderer(RecordingDriver::tier_a());
        let mut spun = crate_box();
        spun.rotation = Vec3::new(0.3, -1.2, 2.0);

        r.render_scene_object(&spun).unwrap();

        let calls = r.driver().calls();
        assert_eq!(
            uniform(&calls, X_ROTATION_MATRIX),
            Some(Mat4::from_rotation_x(0.3).to_cols_array().to_vec())
        );
        assert_eq!(
            uniform(&calls, Y_ROTATION_MATRIX),
            Some(Mat4::from_rotation_y(-1.2).to_cols_array().to_vec())
        );
        assert_eq!(
            uniform(&calls, Z_ROTATION_MATRIX),
            Some(Mat4::from_rotation_z(2.0).to_cols_array().to_vec())
        );
    }

    #[test]
    fn fatal_checkpoint_mid_draw_still_releases_transients() {
        let mut r = renderer(RecordingDriver::tier_a());
        r.driver_mut().queue_error(GpuErrorCode::InvalidValue);

        let err = r.render_scene_objects([&crate_box(), &goat()]).unwrap_err();

        assert!(matches!(err, RenderError::Gpu { ref when, .. } if when == "rendering scene"));
        let d = r.driver();
        assert_eq!(d.count(|c| matches!(c, Call::DrawIndexed(_))), 0);
        assert_eq!(d.live_buffers(), 0);
        assert_eq!(d.live_vertex_arrays(), 0);
        assert_eq!(d.enabled_slots(), 0);
        // The second object was never reached.
        assert!(r.texture_handle("goat").is_none());
        assert_eq!(d.calls().last(), Some(&Call::UseProgram(None)));
    }

    #[test]
    fn errors_raised_by_a_draw_surface_at_the_next_checkpoint() {
        let mut r = renderer(RecordingDriver::tier_b_only());
        r.driver_mut().errors_on_next_draw = vec![crate::driver::GpuError::new(GpuErrorCode::OutOfMemory)];
        let first = crate_box();
        let second = crate_box();

        let err = r.render_scene_objects([&first, &second]).unwrap_err();

        assert!(matches!(err, RenderError::Gpu { .. }));
        assert_eq!(r.driver().count(|c| matches!(c, Call::DrawIndexed(_))), 1);
        assert_eq!(r.driver().live_buffers(), 0);
    }
}
