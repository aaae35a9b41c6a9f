//! Pointer input for the flight controller: winit translation, drag
//! capture and per-state dispatch.

pub mod dispatch;
pub mod pointer;

pub use dispatch::*;
pub use pointer::*;

use glam::Vec2;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

/// Pixels per scroll line when a wheel reports line deltas.
const LINE_HEIGHT: f32 = 100.0;

/// Last known cursor position, used to place button presses.
#[derive(Debug, Default)]
pub struct InputState {
    cursor_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in window coordinates.
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    /// Translate pointer input into a [`PointerEvent`]. Everything else,
    /// keyboard included, yields `None`.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { device_id, position, .. } => {
                self.cursor_position = Vec2::new(position.x as f32, position.y as f32);
                Some(PointerEvent::Move {
                    pointer_id: pointer_id(device_id),
                    position: self.cursor_position,
                })
            }
            WindowEvent::CursorLeft { device_id } => Some(PointerEvent::Leave {
                pointer_id: pointer_id(device_id),
            }),
            WindowEvent::MouseInput { device_id, state, button } => {
                let pointer_id = pointer_id(device_id);
                let position = self.cursor_position;
                Some(match state {
                    ElementState::Pressed => PointerEvent::Down { pointer_id, position, button: *button },
                    ElementState::Released => PointerEvent::Up { pointer_id, position, button: *button },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scroll-up as positive; pointer events use the
                // opposite convention
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
                };
                Some(PointerEvent::Wheel { delta_y })
            }
            _ => None,
        }
    }
}

/// Stable numeric id for a winit device.
fn pointer_id<T: Hash>(device_id: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    device_id.hash(&mut hasher);
    hasher.finish()
}


#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    fn device() -> DeviceId {
        // SAFETY: dummy ids are only compared, never passed to the platform.
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn cursor_motion_becomes_pointer_move() {
        let mut input = InputState::new();
        let event = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(120.0, 45.0),
        };
        let pointer = input.process_window_event(&event);
        assert_eq!(pointer.and_then(|p| p.position()), Some(Vec2::new(120.0, 45.0)));
        assert_eq!(input.cursor_position(), Vec2::new(120.0, 45.0));
    }

    #[test]
    fn button_press_uses_last_cursor_position() {
        let mut input = InputState::new();
        input.process_window_event(&WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(10.0, 20.0),
        });
        let pointer = input.process_window_event(&WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        match pointer {
            Some(PointerEvent::Down { position, button, .. }) => {
                assert_eq!(position, Vec2::new(10.0, 20.0));
                assert_eq!(button, MouseButton::Left);
            }
            other => panic!("expected pointer down, got {:?}", other),
        }
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut input = InputState::new();
        let pointer = input.process_window_event(&WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            phase: winit::event::TouchPhase::Moved,
        });
        match pointer {
            Some(PointerEvent::Wheel { delta_y }) => assert!(delta_y < 0.0),
            other => panic!("expected wheel, got {:?}", other),
        }
    }
}
