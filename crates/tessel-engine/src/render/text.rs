use glam::Vec3;

use crate::driver::Driver;
use crate::error::{RenderError, Result};
use crate::text::TextColour;

use super::Renderer;

/// Depth every text quad is drawn at, in front of the scene.
const TEXT_DEPTH: f32 = -0.5;

/// Texture cache name for a rasterized string.
pub fn text_cache_key(text: &str) -> String {
    format!("text_{text}")
}

/// Quad corners for a text box given in normalized device coordinates.
pub fn text_corners(top_x: f32, top_y: f32, bottom_x: f32, bottom_y: f32) -> [Vec3; 4] {
    [
        Vec3::new(bottom_x, top_y, TEXT_DEPTH),
        Vec3::new(top_x, top_y, TEXT_DEPTH),
        Vec3::new(top_x, bottom_y, TEXT_DEPTH),
        Vec3::new(bottom_x, bottom_y, TEXT_DEPTH),
    ]
}

impl<D: Driver> Renderer<D> {
    /// Draws `text` stretched over the box from `(top_x, top_y)` to
    /// `(bottom_x, bottom_y)`.
    ///
    /// The string is rasterized once and cached by its content only, so a
    /// later call with the same string in another colour reuses the first
    /// texture.
    pub fn render_text(
        &mut self,
        text: &str,
        colour: TextColour,
        top_x: f32,
        top_y: f32,
        bottom_x: f32,
        bottom_y: f32,
    ) -> Result<()> {
        let key = text_cache_key(text);
        if !self.textures.contains(&key) {
            let font = self.font.as_ref().ok_or(RenderError::ShutDown)?;
            let surface = font.rasterize(text, colour);
            log::debug!(
                "rasterized \"{text}\" to {}x{}",
                surface.width(),
                surface.height()
            );
            let pixels = surface.to_rgba_f32();
            self.textures.get_or_create(
                &mut self.driver,
                &key,
                &pixels,
                surface.width(),
                surface.height(),
            );
        }

        let corners = text_corners(top_x, top_y, bottom_x, bottom_y);
        self.render_textured_quad(&corners, &key)
    }
}
