use std::path::Path;
use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::caps::{self, CapabilityTier};
use crate::config::RendererConfig;
use crate::device::{self, Gpu, SurfaceHints};
use crate::driver::wgpu::WgpuDriver;
use crate::driver::{Driver, ProgramId, TextureId, TextureFormat};
use crate::error::{RenderError, Result};
use crate::scene::Image;
use crate::shader::{ProgramKind, ShaderManager};
use crate::text::{FontFace, TextRasterizer};
use crate::texture::TextureCache;

use super::diagnostics::check_errors;

/// The rendering context.
///
/// Owns the drawing surface (through its driver), both shader programs, the
/// texture cache and the font. One renderer is expected per process.
///
/// A frame is driven by the caller: [`clear_screen`](Self::clear_screen),
/// any number of image, scene and text draws, then
/// [`swap_buffers`](Self::swap_buffers).
pub struct Renderer<D: Driver = WgpuDriver> {
    pub(super) driver: D,
    pub(super) tier: CapabilityTier,
    pub(super) textures: TextureCache,
    pub(super) font: Option<Box<dyn TextRasterizer>>,
    shaders: Option<ShaderManager>,
    geometry_program: Option<ProgramId>,
    text_program: Option<ProgramId>,
    shut_down: bool,
}

impl Renderer<WgpuDriver> {
    /// Opens the window, creates the surface and device, loads the font and
    /// initializes the renderer on top of them.
    pub fn new(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<Self> {
        Self::with_hints(event_loop, config, &SurfaceHints::default())
    }

    pub fn with_hints(
        event_loop: &ActiveEventLoop,
        config: &RendererConfig,
        hints: &SurfaceHints,
    ) -> Result<Self> {
        let window = device::create_window(event_loop, config)?;
        let gpu = pollster::block_on(Gpu::new(window, hints))?;
        let driver = WgpuDriver::new(gpu);

        let font = FontFace::load(&config.resolved_font_path(), config.font_size)?;
        Self::with_driver(driver, Box::new(font), config)
    }

    /// `None` once the surface has been released by [`Renderer::shutdown`].
    pub fn window(&self) -> Option<&Arc<Window>> {
        self.driver.gpu().window()
    }
}

impl<D: Driver> Renderer<D> {
    /// Initializes a renderer on an existing driver.
    ///
    /// Negotiates the capability tier, applies the fixed render state and
    /// builds both shader programs. If any step fails, everything acquired so
    /// far is released through [`Renderer::shutdown`] before the error is
    /// returned.
    pub fn with_driver(driver: D, font: Box<dyn TextRasterizer>, config: &RendererConfig) -> Result<Self> {
        let mut renderer = Self {
            driver,
            tier: CapabilityTier::Unsupported,
            textures: TextureCache::new(TextureFormat::Rgba8Unorm),
            font: Some(font),
            shaders: None,
            geometry_program: None,
            text_program: None,
            shut_down: false,
        };
        renderer.initialize(config)?;
        Ok(renderer)
    }

    fn initialize(&mut self, config: &RendererConfig) -> Result<()> {
        check_errors(&mut self.driver, "initialising the GPU function loader", false)?;

        self.tier = caps::negotiate(self.driver.caps())?;
        self.textures = TextureCache::new(self.tier.texture_format());

        let (width, height) = self
            .driver
            .drawable_size()
            .unwrap_or((config.width, config.height));
        self.driver.set_viewport(width, height);
        self.driver.set_clear_color(config.clear_color);

        let shaders = ShaderManager::new(&config.resolved_shaders_root(), self.tier)?;
        log::info!("loading shaders from {}", shaders.source_dir().display());

        let geometry = shaders.build(&mut self.driver, ProgramKind::Geometry)?;
        self.geometry_program = Some(geometry);
        shaders.upload_perspective(&mut self.driver, geometry);

        self.text_program = Some(shaders.build(&mut self.driver, ProgramKind::Text)?);
        self.shaders = Some(shaders);

        check_errors(&mut self.driver, "linking shader programs", true)
    }

    pub fn tier(&self) -> CapabilityTier {
        self.tier
    }

    /// Directory the shader programs were built from.
    pub fn shader_dir(&self) -> Option<&Path> {
        self.shaders.as_ref().map(ShaderManager::source_dir)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub(super) fn program(&self, kind: ProgramKind) -> Result<ProgramId> {
        let program = match kind {
            ProgramKind::Geometry => self.geometry_program,
            ProgramKind::Text => self.text_program,
        };
        program.ok_or(RenderError::ShutDown)
    }

    /// Registers `image` under `name`, or returns the texture already there.
    pub fn generate_texture(&mut self, name: &str, image: &Image) -> TextureId {
        self.textures
            .get_or_create(&mut self.driver, name, image.data(), image.width(), image.height())
    }

    pub fn texture_handle(&self, name: &str) -> Option<TextureId> {
        self.textures.lookup(name)
    }

    /// Clears colour and depth. Starts a frame.
    pub fn clear_screen(&mut self) {
        self.driver.clear();
    }

    /// Presents the frame. May block until the display is ready.
    pub fn swap_buffers(&mut self) {
        self.driver.present();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resizing to {width}x{height}");
        self.driver.set_viewport(width, height);
    }

    /// Releases textures, programs, the font and the surface, in that order.
    ///
    /// Runs at most once; later calls, including the one from `Drop`, do
    /// nothing. Draw calls after shutdown fail with
    /// [`RenderError::ShutDown`].
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::info!("shutting down renderer");

        self.textures.release_all(&mut self.driver);

        self.driver.use_program(None);
        for program in [self.text_program.take(), self.geometry_program.take()]
            .into_iter()
            .flatten()
        {
            self.driver.delete_program(program);
        }
        self.shaders = None;

        if self.font.take().is_some() {
            log::info!("font released");
        }

        self.driver.release_surface();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl<D: Driver> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
