use std::collections::HashMap;

use crate::driver::{Driver, TextureFormat, TextureId, TextureUpload};

/// Maps logical names to GPU textures.
///
/// Names are case-sensitive. An entry is never replaced or evicted: asking
/// for an existing name returns the handle created the first time, whatever
/// pixels are passed. Callers that need new content must pick a new name.
///
/// Handles are only released by [`TextureCache::release_all`] at shutdown.
#[derive(Debug)]
pub struct TextureCache {
    format: TextureFormat,
    entries: HashMap<String, TextureId>,
}

impl TextureCache {
    /// Creates an empty cache whose textures use `format` for storage.
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            entries: HashMap::new(),
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Returns the texture registered under `name`, creating it from
    /// `pixels` (RGBA `f32`, `width * height * 4` values) on first use.
    pub fn get_or_create<D: Driver + ?Sized>(
        &mut self,
        driver: &mut D,
        name: &str,
        pixels: &[f32],
        width: u32,
        height: u32,
    ) -> TextureId {
        if let Some(&handle) = self.entries.get(name) {
            return handle;
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            // The driver reports the mismatch at the next checkpoint.
            log::warn!(
                "texture {name}: {} floats for {width}x{height}, expected {expected}",
                pixels.len()
            );
        }

        let handle = driver.create_texture(TextureUpload {
            width,
            height,
            format: self.format,
            pixels,
        });
        log::debug!("created {width}x{height} texture {name} ({:?})", self.format);

        self.entries.insert(name.to_string(), handle);
        handle
    }

    pub fn lookup(&self, name: &str) -> Option<TextureId> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deletes every resident texture. The cache is empty afterwards.
    pub fn release_all<D: Driver + ?Sized>(&mut self, driver: &mut D) {
        for (name, handle) in self.entries.drain() {
            log::info!("deleting texture for {name}");
            driver.delete_texture(handle);
        }
    }
}
