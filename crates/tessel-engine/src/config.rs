//! Renderer initialization parameters.

use std::path::{Path, PathBuf};

/// Parameters for [`Renderer`](crate::render::Renderer) creation.
///
/// Relative paths are resolved against the directory of the running
/// executable (see [`resource_path`]), not the working directory.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub title: String,
    /// Window width in physical pixels.
    pub width: u32,
    /// Window height in physical pixels.
    pub height: u32,
    /// Borderless full-screen on the current monitor.
    pub full_screen: bool,
    pub font_path: PathBuf,
    /// Pixel size the font face is rasterized at.
    pub font_size: f32,
    /// Directory holding one sub-directory of shader sources per tier.
    pub shaders_root: PathBuf,
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "tessel".to_string(),
            width: 854,
            height: 480,
            full_screen: false,
            font_path: PathBuf::from("resources/fonts/DejaVuSans/DejaVuSans.ttf"),
            font_size: 48.0,
            shaders_root: PathBuf::from("resources/shaders/"),
            clear_color: [0.0, 0.0, 1.0, 0.0],
        }
    }
}

impl RendererConfig {
    pub fn resolved_font_path(&self) -> PathBuf {
        resource_path(&self.font_path)
    }

    pub fn resolved_shaders_root(&self) -> PathBuf {
        resource_path(&self.shaders_root)
    }
}

/// Directory containing the running executable.
///
/// Falls back to the current directory when the platform cannot report the
/// executable location.
pub fn base_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolves `relative` against [`base_path`]. Absolute paths are returned
/// unchanged.
pub fn resource_path(relative: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        base_path().join(relative)
    }
}
