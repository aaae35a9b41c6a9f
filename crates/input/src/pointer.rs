//! Platform-neutral pointer events and pointer capture for drags.

use glam::Vec2;

pub use winit::event::MouseButton;

/// Pointer input routed to game-state handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        pointer_id: u64,
        position: Vec2,
    },
    Down {
        pointer_id: u64,
        position: Vec2,
        button: MouseButton,
    },
    Up {
        pointer_id: u64,
        position: Vec2,
        button: MouseButton,
    },
    /// The pointer left the canvas; treated like a release.
    Leave { pointer_id: u64 },
    /// Positive `delta_y` scrolls down (zoom out).
    Wheel { delta_y: f32 },
}

impl PointerEvent {
    pub fn pointer_id(&self) -> Option<u64> {
        match *self {
            PointerEvent::Move { pointer_id, .. }
            | PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Up { pointer_id, .. }
            | PointerEvent::Leave { pointer_id } => Some(pointer_id),
            PointerEvent::Wheel { .. } => None,
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        match *self {
            PointerEvent::Move { position, .. }
            | PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. } => Some(position),
            _ => None,
        }
    }
}

/// Tracks which pointer owns an in-progress drag.
///
/// Only the capturing pointer produces drag deltas; a second pointer pressing
/// down while one is captured is ignored until the first is released.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerCapture {
    captured: Option<u64>,
    last: Vec2,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag. Returns false if another pointer already holds the capture.
    pub fn begin(&mut self, pointer_id: u64, position: Vec2) -> bool {
        match self.captured {
            Some(id) if id != pointer_id => false,
            _ => {
                self.captured = Some(pointer_id);
                self.last = position;
                true
            }
        }
    }

    /// Movement since the previous call, if `pointer_id` holds the capture.
    pub fn drag(&mut self, pointer_id: u64, position: Vec2) -> Option<Vec2> {
        if self.captured != Some(pointer_id) {
            return None;
        }
        let delta = position - self.last;
        self.last = position;
        Some(delta)
    }

    /// End the drag held by `pointer_id`. Returns true if it was captured.
    pub fn release(&mut self, pointer_id: u64) -> bool {
        if self.captured == Some(pointer_id) {
            self.captured = None;
            true
        } else {
            false
        }
    }

    pub fn release_all(&mut self) {
        self.captured = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    pub fn captured_pointer(&self) -> Option<u64> {
        self.captured
    }
}
