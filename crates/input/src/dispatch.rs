//! Routes pointer events to the handler set of the active game state.

use crate::pointer::PointerEvent;
use std::collections::HashMap;
use std::hash::Hash;

/// A pointer callback with mutable access to the game context.
pub type PointerCallback<C> = Box<dyn FnMut(&mut C, &PointerEvent)>;

/// Optional callbacks for one state. Missing callbacks drop the event.
pub struct HandlerSet<C> {
    on_move: Option<PointerCallback<C>>,
    on_down: Option<PointerCallback<C>>,
    on_up: Option<PointerCallback<C>>,
    on_wheel: Option<PointerCallback<C>>,
}

impl<C> Default for HandlerSet<C> {
    fn default() -> Self {
        Self {
            on_move: None,
            on_down: None,
            on_up: None,
            on_wheel: None,
        }
    }
}

impl<C> HandlerSet<C> {
    /// A set that ignores every event.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn on_move(mut self, f: impl FnMut(&mut C, &PointerEvent) + 'static) -> Self {
        self.on_move = Some(Box::new(f));
        self
    }

    pub fn on_down(mut self, f: impl FnMut(&mut C, &PointerEvent) + 'static) -> Self {
        self.on_down = Some(Box::new(f));
        self
    }

    /// Also receives [`PointerEvent::Leave`].
    pub fn on_up(mut self, f: impl FnMut(&mut C, &PointerEvent) + 'static) -> Self {
        self.on_up = Some(Box::new(f));
        self
    }

    pub fn on_wheel(mut self, f: impl FnMut(&mut C, &PointerEvent) + 'static) -> Self {
        self.on_wheel = Some(Box::new(f));
        self
    }

    fn callback_for(&mut self, event: &PointerEvent) -> Option<&mut PointerCallback<C>> {
        match event {
            PointerEvent::Move { .. } => self.on_move.as_mut(),
            PointerEvent::Down { .. } => self.on_down.as_mut(),
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } => self.on_up.as_mut(),
            PointerEvent::Wheel { .. } => self.on_wheel.as_mut(),
        }
    }
}

/// Dispatch table keyed by state.
pub struct PointerDispatcher<S, C> {
    handlers: HashMap<S, HandlerSet<C>>,
    active: bool,
}

impl<S: Eq + Hash + Copy + std::fmt::Debug, C> Default for PointerDispatcher<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Eq + Hash + Copy + std::fmt::Debug, C> PointerDispatcher<S, C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            active: false,
        }
    }

    /// Install (or replace) the handler set for `state`.
    pub fn set_handlers(&mut self, state: S, handlers: HandlerSet<C>) {
        self.handlers.insert(state, handlers);
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::debug!("Pointer dispatcher active: {}", active);
        }
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Invoke the matching callback of `state`'s handler set.
    ///
    /// Returns true if a callback ran. Inactive dispatchers drop everything.
    pub fn dispatch(&mut self, state: S, ctx: &mut C, event: &PointerEvent) -> bool {
        if !self.active {
            return false;
        }
        let Some(set) = self.handlers.get_mut(&state) else {
            return false;
        };
        match set.callback_for(event) {
            Some(callback) => {
                callback(ctx, event);
                true
            }
            None => false,
        }
    }
}
