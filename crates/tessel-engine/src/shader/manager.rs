use std::path::{Path, PathBuf};

use crate::caps::CapabilityTier;
use crate::driver::{Driver, ProgramId, ShaderId, ShaderStage};
use crate::error::{RenderError, Result};

use super::contract::{self, ProgramKind};

pub const GEOMETRY_VERTEX_FILE: &str = "perspective_lighted.vert.wgsl";
pub const GEOMETRY_FRAGMENT_FILE: &str = "texture.frag.wgsl";
pub const TEXT_VERTEX_FILE: &str = "text.vert.wgsl";
pub const TEXT_FRAGMENT_FILE: &str = "text.frag.wgsl";

const FRUSTUM_SCALE_X: f32 = 1.0;
const FRUSTUM_SCALE_Y: f32 = 1.8;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 25.0;

/// Projection uploaded once to the geometry program, column-major.
///
/// Maps eye-space depth `[-Z_NEAR, -Z_FAR]` to clip space with `w = -z`.
pub fn perspective_matrix() -> [f32; 16] {
    let mut m = [0.0f32; 16];
    m[0] = FRUSTUM_SCALE_X;
    m[5] = FRUSTUM_SCALE_Y;
    m[10] = (Z_NEAR + Z_FAR) / (Z_NEAR - Z_FAR);
    m[11] = -1.0;
    m[14] = 2.0 * Z_NEAR * Z_FAR / (Z_NEAR - Z_FAR);
    m
}

/// Loads, compiles and links the shader programs for one capability tier.
#[derive(Debug, Clone)]
pub struct ShaderManager {
    source_dir: PathBuf,
}

impl ShaderManager {
    /// Selects `shaders_root/<tier dir>` as the source directory.
    pub fn new(shaders_root: &Path, tier: CapabilityTier) -> Result<Self> {
        let dir = tier.shader_dir().ok_or_else(|| RenderError::UnsupportedDriver {
            driver: format!("no shader directory for {tier}"),
        })?;
        Ok(Self {
            source_dir: shaders_root.join(dir),
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Reads a shader source file from the tier directory.
    pub fn load_source(&self, file: &str) -> Result<String> {
        let path = self.source_dir.join(file);
        std::fs::read_to_string(&path).map_err(|source| RenderError::ShaderSource { path, source })
    }

    /// Compiles `file` for `stage`.
    pub fn compile<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        file: &str,
        stage: ShaderStage,
    ) -> Result<ShaderId> {
        let source_text = self.load_source(file)?;
        match driver.create_shader(stage, &source_text) {
            Ok(shader) => {
                log::info!("shader {file} compiled successfully");
                Ok(shader)
            }
            Err(log) => {
                log::error!("{} shader {file} failed to compile", stage.name());
                Err(RenderError::ShaderCompile {
                    path: self.source_dir.join(file),
                    source_text,
                    log,
                })
            }
        }
    }

    /// Links `vertex` and `fragment` into a `kind` program.
    ///
    /// The shader objects are released whether or not linking succeeds, so
    /// only the program stays resident.
    pub fn link<D: Driver + ?Sized>(
        &self,
        driver: &mut D,
        kind: ProgramKind,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId> {
        let linked = driver.link_program(kind, vertex, fragment);
        driver.delete_shader(vertex);
        driver.delete_shader(fragment);

        match linked {
            Ok(program) => {
                log::info!("linked {kind} rendering program successfully");
                Ok(program)
            }
            Err(log) => {
                log::error!("failed to link {kind} program");
                Err(RenderError::ProgramLink { program: kind, log })
            }
        }
    }

    /// Compiles both stages of `kind` and links them.
    pub fn build<D: Driver + ?Sized>(&self, driver: &mut D, kind: ProgramKind) -> Result<ProgramId> {
        let (vertex_file, fragment_file) = match kind {
            ProgramKind::Geometry => (GEOMETRY_VERTEX_FILE, GEOMETRY_FRAGMENT_FILE),
            ProgramKind::Text => (TEXT_VERTEX_FILE, TEXT_FRAGMENT_FILE),
        };

        let vertex = self.compile(driver, vertex_file, ShaderStage::Vertex)?;
        let fragment = match self.compile(driver, fragment_file, ShaderStage::Fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                driver.delete_shader(vertex);
                return Err(e);
            }
        };
        self.link(driver, kind, vertex, fragment)
    }

    /// Uploads the fixed projection to the geometry program.
    pub fn upload_perspective<D: Driver + ?Sized>(&self, driver: &mut D, geometry: ProgramId) {
        driver.use_program(Some(geometry));
        match driver.uniform_location(geometry, contract::PERSPECTIVE_MATRIX) {
            Some(location) => driver.set_uniform_mat4(location, &perspective_matrix()),
            None => log::warn!(
                "geometry program has no `{}` uniform",
                contract::PERSPECTIVE_MATRIX
            ),
        }
        driver.use_program(None);
    }
}
