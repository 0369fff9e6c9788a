/// Channel layout of a packed 32-bit pixel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelFormat {
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
    pub r_shift: u32,
    pub g_shift: u32,
    pub b_shift: u32,
    pub a_shift: u32,
}

impl PixelFormat {
    pub const ARGB8888: Self = Self {
        r_mask: 0x00ff_0000,
        g_mask: 0x0000_ff00,
        b_mask: 0x0000_00ff,
        a_mask: 0xff00_0000,
        r_shift: 16,
        g_shift: 8,
        b_shift: 0,
        a_shift: 24,
    };

    pub const ABGR8888: Self = Self {
        r_mask: 0x0000_00ff,
        g_mask: 0x0000_ff00,
        b_mask: 0x00ff_0000,
        a_mask: 0xff00_0000,
        r_shift: 0,
        g_shift: 8,
        b_shift: 16,
        a_shift: 24,
    };

    pub fn pack(&self, [r, g, b, a]: [u8; 4]) -> u32 {
        ((r as u32) << self.r_shift) & self.r_mask
            | ((g as u32) << self.g_shift) & self.g_mask
            | ((b as u32) << self.b_shift) & self.b_mask
            | ((a as u32) << self.a_shift) & self.a_mask
    }

    pub fn unpack(&self, pixel: u32) -> [u32; 4] {
        [
            (pixel & self.r_mask) >> self.r_shift,
            (pixel & self.g_mask) >> self.g_shift,
            (pixel & self.b_mask) >> self.b_shift,
            (pixel & self.a_mask) >> self.a_shift,
        ]
    }
}

/// Packed 32-bit pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSurface {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u32>,
}

impl TextSurface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// `None` if `pixels` does not hold exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, format: PixelFormat, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes `rgba` at `(x, y)` unless the pixel already has a higher alpha.
    /// Out-of-bounds writes are ignored.
    pub fn blend_max(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let Some(i) = self.index(x, y) else { return };
        let current = self.format.unpack(self.pixels[i])[3];
        if rgba[3] as u32 >= current {
            self.pixels[i] = self.format.pack(rgba);
        }
    }

    /// Converts to RGBA floats in `[0, 1]`, each rounded to two decimals.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        self.pixels
            .iter()
            .flat_map(|&p| self.format.unpack(p).map(normalize_channel))
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }
}

/// `value / 255`, rounded half up to two decimal places.
pub fn normalize_channel(value: u32) -> f32 {
    (100.0 * (value as f32 / 255.0) + 0.5).floor() / 100.0
}
