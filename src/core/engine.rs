//! Core Engine struct and main loop

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::core::{FixedTimestep, Time};
use crate::ecs::World;
use crate::input::Input;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Fixed simulation ticks per second
    pub fixed_hz: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            width: 1280,
            height: 720,
            fixed_hz: FixedTimestep::DEFAULT_HZ,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the fixed simulation rate
    pub fn with_fixed_hz(mut self, hz: u32) -> Self {
        self.fixed_hz = hz;
        self
    }
}

/// Install `env_logger`, keeping any logger that is already installed
///
/// Returns whether this call installed it.
pub fn init_logger() -> bool {
    let installed = env_logger::try_init().is_ok();
    if !installed {
        log::debug!("Logger already installed");
    }
    installed
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once when the engine starts
    fn init(&mut self, engine: &mut EngineContext);

    /// Called when a key is pressed or released (repeats are filtered out)
    ///
    /// Keys still held when the window loses focus are reported as released.
    fn on_key(&mut self, _engine: &mut EngineContext, _key: KeyCode, _state: ElementState) {}

    /// Called zero or more times per frame at the fixed simulation rate
    fn fixed_update(&mut self, engine: &mut EngineContext, dt: f32);

    /// Called once per frame after the fixed ticks
    fn update(&mut self, _engine: &mut EngineContext) {}

    /// Called when the game is shutting down
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Frame timing
    pub time: Time,
    /// Fixed simulation clock
    pub fixed: FixedTimestep,
    /// Input state
    pub input: Input,
    /// ECS world
    pub world: World,
    /// Window size
    window_size: PhysicalSize<u32>,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(config: &EngineConfig) -> Self {
        Self {
            time: Time::new(),
            fixed: FixedTimestep::new(config.fixed_hz),
            input: Input::new(),
            world: World::new(),
            window_size: PhysicalSize::new(config.width, config.height),
            should_quit: false,
        }
    }

    /// Get window width
    pub fn width(&self) -> u32 {
        self.window_size.width
    }

    /// Get window height
    pub fn height(&self) -> u32 {
        self.window_size.height
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Report every held key to the game as released
    fn release_held_keys<G: Game>(&mut self, game: &mut G) {
        for key in self.input.release_all() {
            game.on_key(self, key, ElementState::Released);
        }
    }

    /// Advance the clocks and run this frame's fixed ticks and update
    fn run_frame<G: Game>(&mut self, game: &mut G) {
        self.time.update();

        let ticks = self.fixed.advance(self.time.delta_seconds());
        let dt = self.fixed.step();
        for _ in 0..ticks {
            game.fixed_update(self, dt);
        }

        game.update(self);

        // Clear per-frame input state
        self.input.update();
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    window: Option<Arc<Window>>,
    initialized: bool,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        let context = EngineContext::new(&config);
        Self {
            config,
            game,
            context,
            window: None,
            initialized: false,
        }
    }

    /// Run the engine
    ///
    /// Installs `env_logger` unless the caller already set up a logger.
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        init_logger();
        log::info!(
            "Starting engine: {} ({} Hz fixed step)",
            self.config.title,
            self.config.fixed_hz
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        Ok(())
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.game.shutdown(&mut self.context);
        event_loop.exit();
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window);

        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            // Don't count setup time as simulation time
            self.context.time.update();
            log::info!("Engine initialized successfully");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.context.window_size = new_size;
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key
                    && self.context.input.process_keyboard(key_code, event.state)
                {
                    self.game.on_key(&mut self.context, key_code, event.state);
                }
            }

            WindowEvent::Focused(false) => {
                log::debug!("Window lost focus, releasing held keys");
                self.context.release_held_keys(&mut self.game);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(x, y) => glam::Vec2::new(x, y),
                    winit::event::MouseScrollDelta::PixelDelta(pos) => {
                        glam::Vec2::new(pos.x as f32, pos.y as f32) / 40.0
                    }
                };
                self.context.input.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.context.run_frame(&mut self.game);

                if self.context.should_quit() {
                    self.exit(event_loop);
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.context
                .input
                .process_mouse_delta(glam::Vec2::new(delta.0 as f32, delta.1 as f32));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingGame {
        ticks: u32,
        updates: u32,
        last_dt: f32,
    }

    impl Game for CountingGame {
        fn init(&mut self, _engine: &mut EngineContext) {}

        fn fixed_update(&mut self, _engine: &mut EngineContext, dt: f32) {
            self.ticks += 1;
            self.last_dt = dt;
        }

        fn update(&mut self, _engine: &mut EngineContext) {
            self.updates += 1;
        }
    }

    /// Records key callbacks and whether the key was still held at the time
    #[derive(Default)]
    struct KeyLogGame {
        keys: Vec<(KeyCode, ElementState, bool)>,
    }

    impl Game for KeyLogGame {
        fn init(&mut self, _engine: &mut EngineContext) {}

        fn on_key(&mut self, engine: &mut EngineContext, key: KeyCode, state: ElementState) {
            let held = engine.input.is_key_pressed(key);
            self.keys.push((key, state, held));
        }

        fn fixed_update(&mut self, _engine: &mut EngineContext, _dt: f32) {}
    }

    #[test]
    fn test_focus_loss_releases_held_keys() {
        let mut ctx = EngineContext::new(&EngineConfig::default());
        let mut game = KeyLogGame::default();

        ctx.input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        ctx.release_held_keys(&mut game);

        assert_eq!(game.keys, vec![(KeyCode::KeyW, ElementState::Released, false)]);
        assert!(!ctx.input.is_key_pressed(KeyCode::KeyW));

        // Nothing held, nothing reported
        ctx.release_held_keys(&mut game);
        assert_eq!(game.keys.len(), 1);
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger();
        assert!(!init_logger());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::default()
            .with_title("Ball")
            .with_size(640, 480)
            .with_fixed_hz(60);

        assert_eq!(config.title, "Ball");
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.fixed_hz, 60);
    }

    #[test]
    fn test_run_frame_drives_fixed_ticks() {
        let mut ctx = EngineContext::new(&EngineConfig::default().with_fixed_hz(1000));
        let mut game = CountingGame::default();

        std::thread::sleep(std::time::Duration::from_millis(5));
        ctx.run_frame(&mut game);

        assert!(game.ticks >= 1);
        assert_eq!(game.updates, 1);
        assert!((game.last_dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_run_frame_clears_frame_input() {
        let mut ctx = EngineContext::new(&EngineConfig::default());
        let mut game = CountingGame::default();

        ctx.input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(ctx.input.is_key_just_pressed(KeyCode::Space));

        ctx.run_frame(&mut game);
        assert!(!ctx.input.is_key_just_pressed(KeyCode::Space));
        assert!(ctx.input.is_key_pressed(KeyCode::Space));
    }
}
