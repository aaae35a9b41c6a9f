//! Space tour: fly the knot, fight or explore, orbit the landmarks.

mod events;

use anyhow::Result;
use audio::{AudioBackend, KiraAudio, NullAudio};
use engine_core::Time;
use game::{GameConfig, GameController};
use input::InputState;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Everything alive while the window is open.
pub(crate) struct Tour {
    window: Arc<Window>,
    input: InputState,
    controller: GameController,
    clock: Time,
    running: bool,
}

impl Tour {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let clock = Time::new();
        let audio = audio_backend(&config);
        let size = window.inner_size();
        let mut controller = GameController::new(config, audio, clock.elapsed());
        controller.set_viewport(size.width as f32, size.height as f32);
        controller.subscribe_any(|state| log::debug!("Entered {}", state));
        Self {
            window,
            input: InputState::new(),
            controller,
            clock,
            running: true,
        }
    }

    fn frame(&mut self) {
        self.clock.update();
        self.controller.update(self.clock.elapsed());
        self.window.request_redraw();
    }
}

fn audio_backend(config: &GameConfig) -> Box<dyn AudioBackend> {
    match KiraAudio::new() {
        Ok(mut kira) => {
            kira.load_all(&config.audio_dir);
            Box::new(kira)
        }
        Err(e) => {
            log::warn!("Audio unavailable ({}), running silent", e);
            Box::new(NullAudio)
        }
    }
}

/// Application handler for winit.
struct App {
    config: GameConfig,
    tour: Option<Tour>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.tour.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("Space Tour")
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.window_width, self.config.window_height));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                window.request_redraw();
                self.tour = Some(Tour::new(window, self.config.clone()));
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(tour) = &mut self.tour {
            if tour.handle_window_event(event) || !tour.running {
                tour.controller.settings().save();
                tour.controller.cleanup();
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    let config = GameConfig::load();
    let level = if config.dev_logging { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("Space Tour");
    println!("  B / E      start battle / explore       Tab   switch mode");
    println!("  Mouse      steer, click to fire         S     cycle speed");
    println!("  O, 1-4     observe a landmark           Esc   leave observation");
    println!("  Drag/wheel orbit and zoom while observing");
    println!("  M          sound on/off                 R     restart   Q  quit");

    log::info!("Starting Space Tour ({}x{})", config.window_width, config.window_height);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App { config, tour: None };
    event_loop.run_app(&mut app)?;

    Ok(())
}
