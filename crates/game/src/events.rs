//! Window event handling for the tour: keyboard shortcuts and pointer input.

use std::time::Duration;

use game::{GameState, Modal, ModeSwitch, PointOfInterest};
use winit::event::WindowEvent;
use winit::keyboard::KeyCode;

impl crate::Tour {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        let now = self.clock.elapsed();
        match &event {
            WindowEvent::CloseRequested => {
                self.running = false;
                return true;
            }
            WindowEvent::Resized(size) => {
                self.controller.set_viewport(size.width as f32, size.height as f32);
                return false;
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                return false;
            }
            _ => {}
        }

        if let Some(pointer) = self.input.process_window_event(&event) {
            self.controller.handle_pointer(&pointer, now);
        }
        if let WindowEvent::KeyboardInput { event: key_event, .. } = &event {
            if key_event.state.is_pressed() && !key_event.repeat {
                if let winit::keyboard::PhysicalKey::Code(key) = key_event.physical_key {
                    self.handle_key(key, now);
                }
            }
        }
        !self.running
    }

    fn handle_key(&mut self, key: KeyCode, now: Duration) {
        let controller = &mut self.controller;

        if let Some(modal) = controller.session().modal {
            match (modal, key) {
                (Modal::SwitchConfirm, KeyCode::KeyY | KeyCode::Enter) => {
                    controller.confirm_mode_switch(now);
                }
                (Modal::SwitchConfirm, KeyCode::KeyN | KeyCode::Escape) => controller.cancel_mode_switch(now),
                (Modal::GameOver, KeyCode::Enter | KeyCode::KeyR) => controller.reset(now),
                (_, KeyCode::KeyQ) => self.running = false,
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::KeyB if controller.state() == GameState::Launch => {
                controller.start_battle_mode(now);
            }
            KeyCode::KeyE if controller.state() == GameState::Launch => {
                controller.start_explore_mode(now);
            }
            KeyCode::Tab => {
                if controller.request_mode_switch(now) == ModeSwitch::NeedsConfirmation {
                    log::info!("Switching modes ends this run: press Y to confirm, N to cancel");
                }
            }
            KeyCode::KeyO => {
                controller.observe_nearest(now);
            }
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
                let index = match key {
                    KeyCode::Digit1 => 0,
                    KeyCode::Digit2 => 1,
                    KeyCode::Digit3 => 2,
                    _ => 3,
                };
                controller.enter_observation(PointOfInterest::ALL[index], now);
            }
            KeyCode::Escape => {
                if !controller.exit_observation(now) {
                    log::debug!("Escape ignored in {}", controller.state());
                }
            }
            KeyCode::KeyS => {
                controller.switch_speed_mode(now);
            }
            KeyCode::KeyM => {
                controller.toggle_sound();
            }
            KeyCode::KeyR => controller.reset(now),
            KeyCode::KeyQ => self.running = false,
            _ => {}
        }
    }
}
