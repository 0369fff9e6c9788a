use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window};

use crate::config::RendererConfig;
use crate::error::{RenderError, Result};

/// Platform-facing knobs for the drawing surface.
///
/// The defaults request a vsynced swap chain and, on macOS, the Metal backend
/// only; elsewhere every backend is allowed.
#[derive(Debug, Clone)]
pub struct SurfaceHints {
    /// Swap behaviour. FIFO is vsync and is available everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Backends the instance may pick from.
    pub backends: wgpu::Backends,

    /// Prefer an sRGB surface format. Off by default: shader output is
    /// written to the surface unconverted.
    pub prefer_srgb: bool,

    pub power_preference: wgpu::PowerPreference,

    pub desired_maximum_frame_latency: u32,
}

impl Default for SurfaceHints {
    fn default() -> Self {
        let backends = if cfg!(target_os = "macos") {
            wgpu::Backends::METAL
        } else {
            wgpu::Backends::all()
        };

        Self {
            present_mode: wgpu::PresentMode::Fifo,
            backends,
            prefer_srgb: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Opens the window the renderer draws into.
///
/// The window is sized in physical pixels; `full_screen` switches to
/// borderless full-screen on the current monitor.
pub fn create_window(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<Arc<Window>> {
    let mut attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height));
    if config.full_screen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let window = event_loop.create_window(attrs).map_err(|e| {
        log::error!("window could not be created: {e}");
        RenderError::Init {
            subsystem: "window",
            reason: e.to_string(),
        }
    })?;

    log::info!(
        "created {}x{} window \"{}\"",
        config.width,
        config.height,
        config.title
    );
    Ok(Arc::new(window))
}
