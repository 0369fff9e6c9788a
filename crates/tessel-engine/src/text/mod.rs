//! Text rasterization to CPU-side pixel surfaces.
//!
//! The renderer turns a string into a [`TextSurface`] through a
//! [`TextRasterizer`], converts it with [`TextSurface::to_rgba_f32`] and
//! uploads the result as a texture.

mod font;
mod surface;

pub use font::FontFace;
pub use surface::{normalize_channel, PixelFormat, TextSurface};

/// Straight (non-premultiplied) RGBA, 8 bits per channel.
pub type TextColour = [u8; 4];

/// Renders a string into a surface sized to fit it.
///
/// Implementations use blended output: every pixel carries the text colour
/// and an alpha of glyph coverage times the colour's alpha.
pub trait TextRasterizer {
    fn rasterize(&self, text: &str, colour: TextColour) -> TextSurface;
}
