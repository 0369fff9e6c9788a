use std::path::PathBuf;

use anyhow::Result;
use glam::{Vec3, Vec4};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use tessel_engine::config::resource_path;
use tessel_engine::driver::Driver;
use tessel_engine::logging::LoggingConfig;
use tessel_engine::scene::{Image, Mesh, StaticObject};
use tessel_engine::window::{App, AppControl, FrameTime, Runtime};
use tessel_engine::{Renderer, RendererConfig};

/// Full-screen quad behind everything else.
const SKY: [Vec3; 4] = [
    Vec3::new(1.0, 1.0, 0.99),
    Vec3::new(-1.0, 1.0, 0.99),
    Vec3::new(-1.0, -1.0, 0.99),
    Vec3::new(1.0, -1.0, 0.99),
];

const SOURCE_TREE_SHADERS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tessel-engine/resources/shaders");
const SOURCE_TREE_FONT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../tessel-engine/resources/fonts/DejaVuSans/DejaVuSans.ttf"
);

const WHITE: [u8; 4] = [255, 255, 255, 255];
const YELLOW: [u8; 4] = [255, 220, 40, 255];

struct Demo {
    crate_box: StaticObject,
    bug: StaticObject,
    elapsed: f32,
    frames: u64,
}

impl Demo {
    fn new() -> Self {
        Self {
            crate_box: StaticObject::textured("crate", Mesh::cube(0.5), checkerboard(8, 8))
                .with_offset(Vec3::new(-0.8, 0.0, -4.0)),
            bug: StaticObject::coloured("bug", Mesh::cube(0.35), Vec4::new(0.9, 0.3, 0.2, 1.0))
                .with_offset(Vec3::new(0.9, -0.2, -3.5)),
            elapsed: 0.0,
            frames: 0,
        }
    }
}

impl App for Demo {
    fn init(&mut self, renderer: &mut Renderer) -> tessel_engine::Result<()> {
        log::info!("running on {} ({:?})", renderer.driver().caps().version, renderer.tier());

        let sky = match Image::from_path(resource_path("resources/images/sky.png")) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{e}; using a plain sky");
                vertical_gradient(4, 64, [0.35, 0.6, 0.95, 1.0], [0.85, 0.92, 1.0, 1.0])
            }
        };
        renderer.generate_texture("sky", &sky);
        Ok(())
    }

    fn on_frame(&mut self, renderer: &mut Renderer, time: FrameTime) -> tessel_engine::Result<AppControl> {
        self.elapsed += time.dt;
        self.frames = time.frame_index;

        self.crate_box.rotation = Vec3::new(self.elapsed * 0.4, self.elapsed * 0.7, 0.0);
        self.bug.rotation = Vec3::new(0.0, -self.elapsed, self.elapsed * 0.5);

        renderer.clear_screen();
        renderer.render_image(SKY, "sky")?;
        renderer.render_scene_objects([&self.crate_box, &self.bug])?;
        renderer.render_text("tessel", WHITE, -0.95, 0.95, -0.45, 0.8)?;
        // A new string per value gets its own cached texture; keep the
        // counter coarse.
        let seconds = format!("{}s", self.elapsed as u32);
        renderer.render_text(&seconds, YELLOW, 0.75, 0.95, 0.95, 0.85)?;
        renderer.swap_buffers();

        Ok(AppControl::Continue)
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                log::info!("escape pressed after {} frames", self.frames);
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }
}

fn main() -> Result<()> {
    let mut config = RendererConfig {
        title: "tessel demo".to_string(),
        ..RendererConfig::default()
    };
    // Running from the build tree: nothing has been installed next to the
    // executable yet.
    if !config.resolved_shaders_root().exists() {
        config.shaders_root = PathBuf::from(SOURCE_TREE_SHADERS);
    }
    if !config.resolved_font_path().exists() {
        let source_tree = PathBuf::from(SOURCE_TREE_FONT);
        if let Some(font) = Some(source_tree).filter(|p| p.exists()).or_else(system_font) {
            config.font_path = font;
        }
    }

    Runtime::run(config, LoggingConfig::default(), Demo::new())
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

fn checkerboard(width: u32, height: u32) -> Image {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x + y) % 2 == 0))
        .flat_map(|light| {
            if light {
                [0.85, 0.65, 0.35, 1.0]
            } else {
                [0.45, 0.3, 0.15, 1.0]
            }
        })
        .collect();
    Image::from_rgba_f32(width, height, data).unwrap_or_else(|| Image::solid(width, height, [1.0; 4]))
}

fn vertical_gradient(width: u32, height: u32, top: [f32; 4], bottom: [f32; 4]) -> Image {
    let data = (0..height)
        .flat_map(|y| {
            let t = y as f32 / (height - 1).max(1) as f32;
            let row: [f32; 4] = std::array::from_fn(|c| top[c] + (bottom[c] - top[c]) * t);
            std::iter::repeat_n(row, width as usize)
        })
        .flatten()
        .collect();
    Image::from_rgba_f32(width, height, data).unwrap_or_else(|| Image::solid(width, height, top))
}
