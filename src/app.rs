//! Demo builder and the winit application that drives it.

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::bridge::{self, RenderBridge};
use crate::error::DemoError;
use crate::frame::{FrameInput, INITIAL_WATER_LEVEL};
use crate::gpu::{FrameData, GpuState};
use crate::input::{Input, KeyCode};
use crate::scene::Scene;
use crate::sponge::SpongePose;
use crate::textures::{TextureConfig, DEFAULT_TEXTURE_PATH};
use crate::time::Time;

/// Startup settings for the demo window.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Sponge texture, loaded once at startup.
    pub texture_path: PathBuf,
    /// Initial water level in `[0, 1]`.
    pub water_level: f32,
    /// Fixed splash RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Sponge".to_string(),
            texture_path: PathBuf::from(DEFAULT_TEXTURE_PATH),
            water_level: INITIAL_WATER_LEVEL,
            seed: None,
        }
    }
}

/// The sponge demo.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// sponge::Demo::new()
///     .with_window_size(1024, 768)
///     .with_water_level(0.3)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Demo {
    config: DemoConfig,
}

impl Demo {
    /// Create a demo with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Set the base window title. FPS is appended while running.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Set the sponge texture file.
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.texture_path = path.into();
        self
    }

    /// Set the initial water level, clamped to `[0, 1]`.
    pub fn with_water_level(mut self, level: f32) -> Self {
        self.config.water_level = level.clamp(0.0, 1.0);
        self
    }

    /// Fix the splash RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Run the demo. Blocks until the window is closed.
    pub fn run(self) -> Result<(), DemoError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    bridge: RenderBridge,
    input: Input,
    time: Time,
    error: Option<DemoError>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            scene: Scene::new(config.water_level, config.seed),
            bridge: RenderBridge::new(),
            input: Input::new(config.width, config.height),
            time: Time::new(),
            window: None,
            gpu_state: None,
            error: None,
            config,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), DemoError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        window.set_cursor_visible(false);

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let texture = TextureConfig::load_or_fallback(&self.config.texture_path);
        self.gpu_state = Some(pollster::block_on(GpuState::new(window.clone(), texture))?);
        self.window = Some(window);
        Ok(())
    }

    fn frame_input(&self) -> FrameInput {
        FrameInput {
            cursor: self.input.cursor_viewport(),
            clicking: self.input.left_held(),
            raise_water: self.input.key_held(KeyCode::Up),
            lower_water: self.input.key_held(KeyCode::Down),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.time.update();
        let input = self.frame_input();
        let step = self.scene.step(now, &input);

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let (width, height) = (gpu_state.config.width, gpu_state.config.height);
        let state = self.scene.state();
        let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let frame = FrameData {
            pool: self.scene.pool(),
            pose: SpongePose::new(input.cursor, width, height, &step.report),
            is_wet: state.is_wet,
            water_level: state.water_level,
            point_size: bridge::scaled_point_size(width, scale_factor),
            time: now,
        };

        match gpu_state.render(&frame, &mut self.bridge) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            if self.time.frame() % 30 == 0 {
                window.set_title(&format!("{} - {:.0} FPS", self.config.title, self.time.fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }

                self.redraw(event_loop);
                self.input.end_frame();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DemoConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.title, "Sponge");
        assert_eq!(config.water_level, 0.5);
        assert_eq!(config.texture_path, PathBuf::from("SpongeTextureEdges.png"));
        assert!(config.seed.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let demo = Demo::new()
            .with_window_size(1024, 768)
            .with_title("Wet")
            .with_texture("other.png")
            .with_water_level(2.0)
            .with_seed(7);
        let config = demo.config();
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.title, "Wet");
        assert_eq!(config.texture_path, PathBuf::from("other.png"));
        assert_eq!(config.water_level, 1.0);
        assert_eq!(config.seed, Some(7));
    }
}
