//! Game-state machine: which phase the tour is in, which phases may follow,
//! and who gets told when it changes.

use std::collections::HashMap;
use std::fmt;

/// Phase of the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Intro flight before a mode is chosen.
    Launch,
    /// Shooting rocks and enemies along the track.
    Battle,
    /// Flying the track without combat.
    Explore,
    /// Orbiting a point of interest with the track clock paused.
    Observation,
}

impl GameState {
    pub const ALL: [GameState; 4] = [
        GameState::Launch,
        GameState::Battle,
        GameState::Explore,
        GameState::Observation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Launch => "LAUNCH",
            GameState::Battle => "BATTLE",
            GameState::Explore => "EXPLORE",
            GameState::Observation => "OBSERVATION",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed `(from, to)` pairs. Anything else is rejected unless forced.
pub const TRANSITIONS: [(GameState, GameState); 6] = [
    (GameState::Launch, GameState::Battle),
    (GameState::Launch, GameState::Explore),
    (GameState::Battle, GameState::Explore),
    (GameState::Explore, GameState::Battle),
    (GameState::Explore, GameState::Observation),
    (GameState::Observation, GameState::Explore),
];

/// Whether `from -> to` appears in [`TRANSITIONS`].
pub fn is_valid_transition(from: GameState, to: GameState) -> bool {
    TRANSITIONS.contains(&(from, to))
}

/// Handle returned by the subscribe calls; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type StateCallback = Box<dyn FnMut(GameState)>;

/// Owns the current state and the observer lists.
///
/// Callbacks registered for a specific state run when that state is entered;
/// global callbacks run on every change, after the per-state ones, in
/// registration order.
pub struct GameStateManager {
    current: GameState,
    previous: Option<GameState>,
    per_state: HashMap<GameState, Vec<(SubscriptionId, StateCallback)>>,
    global: Vec<(SubscriptionId, StateCallback)>,
    next_id: u64,
}

impl Default for GameStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameStateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStateManager")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl GameStateManager {
    pub fn new() -> Self {
        Self {
            current: GameState::Launch,
            previous: None,
            per_state: HashMap::new(),
            global: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn previous_state(&self) -> Option<GameState> {
        self.previous
    }

    pub fn is_launch_mode(&self) -> bool {
        self.current == GameState::Launch
    }

    pub fn is_battle_mode(&self) -> bool {
        self.current == GameState::Battle
    }

    pub fn is_explore_mode(&self) -> bool {
        self.current == GameState::Explore
    }

    pub fn is_observation_mode(&self) -> bool {
        self.current == GameState::Observation
    }

    pub fn is_explore_or_observation(&self) -> bool {
        matches!(self.current, GameState::Explore | GameState::Observation)
    }

    /// Battle or Explore: the ship follows the track and the pointer.
    pub fn can_fly(&self) -> bool {
        matches!(self.current, GameState::Battle | GameState::Explore)
    }

    pub fn can_transition(&self, to: GameState) -> bool {
        is_valid_transition(self.current, to)
    }

    pub fn can_shoot(&self) -> bool {
        self.current == GameState::Battle
    }

    pub fn can_observe(&self) -> bool {
        self.current == GameState::Explore
    }

    /// Move to `next`. Returns false (and changes nothing) when the pair is not
    /// in [`TRANSITIONS`] and `force` is not set. The table has no self-loops,
    /// so re-entering the current state needs `force`.
    pub fn set_state(&mut self, next: GameState, force: bool) -> bool {
        if !force && !is_valid_transition(self.current, next) {
            log::warn!("Rejected state transition {} -> {}", self.current, next);
            return false;
        }

        log::info!("State {} -> {}{}", self.current, next, if force { " (forced)" } else { "" });
        self.previous = Some(self.current);
        self.current = next;

        if let Some(callbacks) = self.per_state.get_mut(&next) {
            for (_, callback) in callbacks.iter_mut() {
                callback(next);
            }
        }
        for (_, callback) in self.global.iter_mut() {
            callback(next);
        }
        true
    }

    /// Run `callback` every time `state` is entered.
    pub fn subscribe(&mut self, state: GameState, callback: impl FnMut(GameState) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.per_state.entry(state).or_default().push((id, Box::new(callback)));
        id
    }

    /// Run `callback` on every state change.
    pub fn subscribe_any(&mut self, callback: impl FnMut(GameState) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.global.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(index) = self.global.iter().position(|(sub, _)| *sub == id) {
            self.global.remove(index);
            return true;
        }
        for callbacks in self.per_state.values_mut() {
            if let Some(index) = callbacks.iter().position(|(sub, _)| *sub == id) {
                callbacks.remove(index);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self) -> usize {
        self.global.len() + self.per_state.values().map(Vec::len).sum::<usize>()
    }

    /// Drop every subscription.
    pub fn clear_subscriptions(&mut self) {
        self.per_state.clear();
        self.global.clear();
    }

    /// Force Launch, notifying its subscribers, then forget the history.
    pub fn reset(&mut self) {
        self.set_state(GameState::Launch, true);
        self.previous = None;
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}
