use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::config::RendererConfig;
use crate::logging::{init_logging, LoggingConfig};
use crate::render::Renderer;

use super::clock::{FrameClock, FrameTime};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime::run`].
pub trait App {
    /// Called once, right after the renderer is created. Register textures
    /// here.
    fn init(&mut self, renderer: &mut Renderer) -> crate::Result<()> {
        let _ = renderer;
        Ok(())
    }

    /// Called for every redraw. The runtime does not clear or present; the
    /// app owns the whole frame.
    fn on_frame(&mut self, renderer: &mut Renderer, time: FrameTime) -> crate::Result<AppControl>;

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Installs the logger, runs the event loop until the window closes or
    /// the app asks to exit, and returns the first error raised by the
    /// renderer or the app.
    pub fn run<A>(config: RendererConfig, logging: LoggingConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        init_logging(logging);

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppState<A: App> {
    config: RendererConfig,
    app: A,
    renderer: Option<Renderer>,
    clock: FrameClock,
    failure: Option<anyhow::Error>,
}

impl<A: App> AppState<A> {
    fn new(config: RendererConfig, app: A) -> Self {
        Self {
            config,
            app,
            renderer: None,
            clock: FrameClock::new(),
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut renderer =
            Renderer::new(event_loop, &self.config).context("failed to initialise renderer")?;
        self.app
            .init(&mut renderer)
            .context("application failed to initialise")?;

        if let Some(window) = renderer.window() {
            window.request_redraw();
        }
        self.renderer = Some(renderer);
        self.clock.reset();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        self.stop(event_loop);
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let time = self.clock.tick();
        match self.app.on_frame(renderer, time) {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => self.stop(event_loop),
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("frame failed")),
        }
    }
}

impl<A: App> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(window) = self.renderer.as_ref().and_then(|r| r.window()) {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.app.on_window_event(&event) == AppControl::Exit {
            self.stop(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.stop(event_loop),

            WindowEvent::Resized(size) => {
                if let (Some(renderer), Some((width, height))) =
                    (self.renderer.as_mut(), drawable_extent(size))
                {
                    renderer.resize(width, height);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

/// `None` while the window is minimised to a zero-sized surface.
fn drawable_extent(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_window_is_not_drawable() {
        assert_eq!(drawable_extent(PhysicalSize::new(0, 480)), None);
        assert_eq!(drawable_extent(PhysicalSize::new(854, 0)), None);
        assert_eq!(drawable_extent(PhysicalSize::new(854, 480)), Some((854, 480)));
    }
}
