use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::error::{RenderError, Result};

use super::{PixelFormat, TextColour, TextRasterizer, TextSurface};

/// A single font face rasterized at a fixed pixel size.
pub struct FontFace {
    font: fontdue::Font,
    px: f32,
}

impl FontFace {
    /// Loads a TrueType or OpenType face from `path`.
    pub fn load(path: &Path, px: f32) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            log::error!("unable to read font {}: {e}", path.display());
            RenderError::FontLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let face = Self::from_bytes(&bytes, px).map_err(|reason| {
            log::error!("unable to parse font {}: {reason}", path.display());
            RenderError::FontLoad {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        log::info!("loaded font {} at {px}px", path.display());
        Ok(face)
    }

    pub fn from_bytes(bytes: &[u8], px: f32) -> std::result::Result<Self, String> {
        let settings = fontdue::FontSettings {
            scale: px,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(str::to_string)?;
        Ok(Self { font, px })
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    fn line_height(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map_or(self.px, |m| m.new_line_size)
    }
}

/// A rasterized glyph placed in surface coordinates.
struct PlacedGlyph {
    x: u32,
    y: u32,
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

/// Glyph bitmaps of one laid-out string and the surface size that holds them.
struct TextLayout {
    width: u32,
    height: u32,
    glyphs: Vec<PlacedGlyph>,
}

impl FontFace {
    /// Lays out `text` and shifts every glyph so the union of the glyph boxes,
    /// the pen advance and the line box starts at the origin. Negative
    /// bearings and descenders below the line box stay inside the surface.
    fn layout(&self, text: &str) -> Option<TextLayout> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));

        let positions = layout.glyphs();
        if positions.is_empty() {
            return None;
        }

        // Pen position after the last glyph, so trailing spaces keep their width.
        let pen_end = positions
            .iter()
            .map(|g| {
                let m = self.font.metrics_indexed(g.key.glyph_index, self.px);
                g.x - m.xmin as f32 + m.advance_width
            })
            .fold(0.0f32, f32::max);
        let line_end = layout.height().max(self.line_height());

        let rasterized: Vec<(i64, i64, fontdue::Metrics, Vec<u8>)> = positions
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| {
                let (metrics, coverage) = self.font.rasterize_indexed(g.key.glyph_index, self.px);
                (g.x.round() as i64, g.y.round() as i64, metrics, coverage)
            })
            .collect();

        let (mut min_x, mut min_y) = (0i64, 0i64);
        let (mut max_x, mut max_y) = (pen_end.ceil() as i64, line_end.ceil() as i64);
        for (x, y, m, _) in &rasterized {
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(x + m.width as i64);
            max_y = max_y.max(y + m.height as i64);
        }

        let glyphs = rasterized
            .into_iter()
            .map(|(x, y, m, coverage)| PlacedGlyph {
                x: (x - min_x) as u32,
                y: (y - min_y) as u32,
                width: m.width,
                height: m.height,
                coverage,
            })
            .collect();

        Some(TextLayout {
            width: ((max_x - min_x) as u32).max(1),
            height: ((max_y - min_y) as u32).max(1),
            glyphs,
        })
    }
}

impl TextRasterizer for FontFace {
    fn rasterize(&self, text: &str, colour: TextColour) -> TextSurface {
        let Some(layout) = self.layout(text) else {
            return TextSurface::new(1, 1, PixelFormat::ARGB8888);
        };

        let mut surface = TextSurface::new(layout.width, layout.height, PixelFormat::ARGB8888);
        let [r, g, b, a] = colour;
        for glyph in &layout.glyphs {
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let cov = glyph.coverage[row * glyph.width + col] as u32;
                    if cov == 0 {
                        continue;
                    }
                    let alpha = (cov * a as u32 / 255) as u8;
                    surface.blend_max(glyph.x + col as u32, glyph.y + row as u32, [r, g, b, alpha]);
                }
            }
        }
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_a_font_load_error() {
        let err = FontFace::load(Path::new("/nonexistent/CrusoeText-Regular.ttf"), 48.0)
            .err()
            .unwrap();
        match err {
            RenderError::FontLoad { path, .. } => {
                assert!(path.ends_with("CrusoeText-Regular.ttf"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    const FONT: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/resources/fonts/DejaVuSans/DejaVuSans.ttf"
    );
    const WHITE: TextColour = [255, 255, 255, 255];

    fn face() -> FontFace {
        FontFace::load(Path::new(FONT), 48.0).unwrap()
    }

    fn alpha_at(surface: &TextSurface, x: u32, y: u32) -> u32 {
        surface.format().unpack(surface.pixel(x, y).unwrap())[3]
    }

    #[test]
    fn every_covered_pixel_lands_in_the_surface() {
        let face = face();
        // Negative left bearing, an accent above the line, descenders below.
        for text in ["jig", "Éy_", "Score: 10", "  pad  "] {
            let layout = face.layout(text).unwrap();
            let surface = face.rasterize(text, WHITE);
            assert_eq!((surface.width(), surface.height()), (layout.width, layout.height));

            for glyph in &layout.glyphs {
                assert!(glyph.x as usize + glyph.width <= layout.width as usize, "{text}");
                assert!(glyph.y as usize + glyph.height <= layout.height as usize, "{text}");
                for row in 0..glyph.height {
                    for col in 0..glyph.width {
                        let cov = glyph.coverage[row * glyph.width + col] as u32;
                        let (x, y) = (glyph.x + col as u32, glyph.y + row as u32);
                        assert!(alpha_at(&surface, x, y) >= cov, "{text}: pixel ({x}, {y}) lost");
                    }
                }
            }
        }
    }

    #[test]
    fn trailing_spaces_keep_their_width() {
        let face = face();
        let bare = face.rasterize("pad", WHITE);
        let padded = face.rasterize("pad   ", WHITE);
        assert!(padded.width() > bare.width());
    }

    #[test]
    fn opaque_white_stem_normalizes_to_one() {
        let surface = face().rasterize("l", WHITE);
        let rgba = surface.to_rgba_f32();
        assert!(rgba.chunks_exact(4).any(|p| p == [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn alpha_is_coverage_times_colour_alpha() {
        let surface = face().rasterize("l", [255, 0, 0, 128]);
        let max_alpha = (0..surface.height())
            .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
            .map(|(x, y)| alpha_at(&surface, x, y))
            .max()
            .unwrap();
        assert_eq!(max_alpha, 128);
    }

    #[test]
    fn empty_string_is_one_transparent_pixel() {
        let surface = face().rasterize("", WHITE);
        assert_eq!((surface.width(), surface.height()), (1, 1));
        assert_eq!(surface.pixel(0, 0), Some(0));
        assert_eq!(surface.to_rgba_f32(), vec![0.0; 4]);
    }

    #[test]
    fn garbage_bytes_do_not_parse() {
        assert!(FontFace::from_bytes(b"definitely not a font", 24.0).is_err());
    }
}
