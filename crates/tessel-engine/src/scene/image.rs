use std::path::Path;

use crate::error::{RenderError, Result};

/// Decoded image: RGBA, one `f32` per channel in `0.0..=1.0`, rows top to
/// bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Image {
    /// Wraps an existing pixel buffer. `None` if `data` does not hold exactly
    /// `width * height` RGBA pixels.
    pub fn from_rgba_f32(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// A `width` x `height` image filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [f32; 4]) -> Self {
        let data = rgba.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Decodes a PNG or JPEG file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| {
            log::error!("could not decode {}: {e}", path.display());
            RenderError::ImageLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let rgba = decoded.to_rgba32f();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            data: rgba.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}
