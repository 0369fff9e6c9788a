use std::fmt;
use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::{RenderError, Result};

use super::surface::{self, SurfaceErrorAction};
use super::SurfaceHints;

/// Owns wgpu core objects, the window surface and its depth target.
///
/// The window and surface can be released ahead of the device (see
/// [`Gpu::release_surface`]) so GPU objects can still be destroyed in order
/// after the window is gone.
pub struct Gpu {
    // Declared before `window`: the surface must not outlive it.
    surface: Option<wgpu::Surface<'static>>,
    window: Option<Arc<Window>>,

    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    depth_view: wgpu::TextureView,
}

fn init_failure<E: fmt::Display>(subsystem: &'static str) -> impl FnOnce(E) -> RenderError {
    move |e| {
        log::error!("unable to initialise {subsystem}: {e}");
        RenderError::Init {
            subsystem,
            reason: e.to_string(),
        }
    }
}

impl Gpu {
    /// Creates the surface for `window` and a device able to present to it.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, hints: &SurfaceHints) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(init_failure("surface")("window has zero size"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: hints.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(init_failure("surface"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: hints.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(init_failure("GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessel device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(init_failure("GPU device"))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, hints.prefer_srgb)
            .ok_or_else(|| init_failure("surface")("no supported surface formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: hints.present_mode,
            alpha_mode: surface::choose_alpha_mode(&surface_caps),
            view_formats: vec![],
            desired_maximum_frame_latency: hints.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let depth_view = surface::create_depth_view(&device, size.width, size.height);

        let info = adapter.get_info();
        log::info!(
            "surface {}x{} {format:?} on {} ({:?})",
            size.width,
            size.height,
            info.name,
            info.backend
        );

        Ok(Self {
            surface: Some(surface),
            window: Some(window),
            _instance: instance,
            adapter,
            device,
            queue,
            config,
            size,
            depth_view,
        })
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    /// Reconfigures the surface and depth target after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let reconfigured = surface::apply_resize(
            self.surface.as_ref(),
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
        if reconfigured {
            self.depth_view =
                surface::create_depth_view(&self.device, new_size.width, new_size.height);
        }
    }

    /// Acquires the next surface texture.
    ///
    /// On failure returns what the caller should do with the current frame;
    /// lost or outdated surfaces have already been reconfigured.
    pub fn acquire(&self) -> std::result::Result<wgpu::SurfaceTexture, SurfaceErrorAction> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(SurfaceErrorAction::SkipFrame);
        };
        if self.size.width == 0 || self.size.height == 0 {
            return Err(SurfaceErrorAction::SkipFrame);
        }

        surface.get_current_texture().map_err(|err| {
            log::warn!("surface texture unavailable: {err}");
            surface::map_surface_error(surface, &self.device, &self.config, self.size, err)
        })
    }

    /// Drops the surface and then the window. Idempotent.
    pub fn release_surface(&mut self) {
        if self.surface.take().is_some() {
            log::info!("released drawing surface");
        }
        if let Some(window) = self.window.take() {
            log::info!("closed window \"{}\"", window.title());
        }
    }
}
