//! The game controller: mode transitions, per-mode entity sets, the
//! observation orbit, audio cues and the per-frame update.

use std::time::Duration;

use audio::{sounds, AudioBackend};
use engine_core::{GameTimer, LogThrottle, Vec3};
use glam::Vec2;
use input::{HandlerSet, PointerDispatcher, PointerEvent};
use physics::DEFAULT_RESET_DAMPING;
use procgen::{positions, within_range, LabelPlacement, TrackDecorations, TrackSampler, INFO_LABELS};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::{GameConfig, SpeedMode};
use crate::orbit::CameraView;
use crate::poi::PointOfInterest;
use crate::score::HitKind;
use crate::session::{AudioCue, Modal, Session};
use crate::ship::ShipController;
use crate::state::{GameState, GameStateManager, SubscriptionId};
use crate::world::BattleWorld;

/// Labels within this much track parameter of the ship are shown.
pub const LABEL_RANGE: f32 = 0.15;
/// How far ahead of the ship the flight camera looks.
const LOOK_AHEAD: f32 = 0.001;

/// Outcome of [`GameController::request_mode_switch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitch {
    Switched,
    /// Completed loops would be lost; a confirmation modal is showing.
    NeedsConfirmation,
    Rejected,
}

pub struct GameController {
    config: GameConfig,
    states: GameStateManager,
    pointer: PointerDispatcher<GameState, Session>,
    session: Session,
    ship: ShipController,
    world: BattleWorld,
    track: TrackSampler,
    decorations: TrackDecorations,
    audio: Box<dyn AudioBackend>,
    sound_enabled: bool,
    timer: GameTimer,
    throttle: LogThrottle,
    rng: StdRng,
    last_frame: Option<Duration>,
}

impl GameController {
    pub fn new(config: GameConfig, audio: Box<dyn AudioBackend>, now: Duration) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let track = TrackSampler::granny_knot(config.track.scale);
        let decorations = TrackDecorations::generate(&track, false, &mut rng);

        let mut session = Session::new(&config, now);
        session.position = track.position(positions::START);

        let mut pointer = PointerDispatcher::new();
        install_pointer_handlers(&mut pointer);
        pointer.set_active(true);

        log::info!(
            "Game controller ready: track length {:.1}, speed {}",
            track.length(),
            session.speed_mode.label()
        );

        Self {
            ship: ShipController::new(config.ship),
            sound_enabled: config.sound,
            states: GameStateManager::new(),
            pointer,
            session,
            world: BattleWorld::new(),
            track,
            decorations,
            audio,
            timer: GameTimer::new(now),
            throttle: LogThrottle::default(),
            rng,
            last_frame: None,
            config,
        }
    }

    pub fn state(&self) -> GameState {
        self.states.current()
    }

    pub fn states(&self) -> &GameStateManager {
        &self.states
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn ship(&self) -> &ShipController {
        &self.ship
    }

    pub fn world(&self) -> &BattleWorld {
        &self.world
    }

    pub fn track(&self) -> &TrackSampler {
        &self.track
    }

    pub fn decorations(&self) -> &TrackDecorations {
        &self.decorations
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// The loaded config with the player's current sound and speed choices,
    /// ready to be saved for the next session.
    pub fn settings(&self) -> GameConfig {
        let mut config = self.config.clone();
        config.sound = self.sound_enabled;
        config.track.speed_mode = self.session.speed_mode;
        config
    }

    pub fn subscribe(&mut self, state: GameState, callback: impl FnMut(GameState) + 'static) -> SubscriptionId {
        self.states.subscribe(state, callback)
    }

    pub fn subscribe_any(&mut self, callback: impl FnMut(GameState) + 'static) -> SubscriptionId {
        self.states.subscribe_any(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.states.unsubscribe(id)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.session.viewport = Vec2::new(width, height);
    }

    pub fn start_battle_mode(&mut self, now: Duration) -> bool {
        self.start_mode(GameState::Battle, now)
    }

    pub fn start_explore_mode(&mut self, now: Duration) -> bool {
        self.start_mode(GameState::Explore, now)
    }

    fn start_mode(&mut self, mode: GameState, now: Duration) -> bool {
        if !self.states.set_state(mode, false) {
            return false;
        }
        self.world.regenerate(mode, &self.track, &mut self.rng);
        self.decorations.relayout_for_mode(&self.track, mode == GameState::Battle);
        self.ship.reset();
        self.session.reset_run(now, self.track.position(positions::START));
        self.timer.reset(now, false);
        self.on_enter(mode);
        self.flush_audio();
        true
    }

    /// Battle <-> Explore. Any other state refuses.
    pub fn switch_game_mode(&mut self, now: Duration) -> bool {
        match self.states.current() {
            GameState::Battle => self.start_explore_mode(now),
            GameState::Explore => self.start_battle_mode(now),
            other => {
                log::warn!("Cannot switch game mode from {}", other);
                false
            }
        }
    }

    /// Switch modes, asking for confirmation first when completed loops
    /// would be thrown away.
    pub fn request_mode_switch(&mut self, now: Duration) -> ModeSwitch {
        if !self.states.can_fly() {
            return ModeSwitch::Rejected;
        }
        if self.session.loop_count > 0 {
            self.show_modal(Modal::SwitchConfirm, now);
            return ModeSwitch::NeedsConfirmation;
        }
        if self.switch_game_mode(now) {
            ModeSwitch::Switched
        } else {
            ModeSwitch::Rejected
        }
    }

    pub fn confirm_mode_switch(&mut self, now: Duration) -> bool {
        if self.session.modal != Some(Modal::SwitchConfirm) {
            return false;
        }
        self.hide_modal(now);
        self.switch_game_mode(now)
    }

    pub fn cancel_mode_switch(&mut self, now: Duration) {
        if self.session.modal == Some(Modal::SwitchConfirm) {
            self.hide_modal(now);
        }
    }

    pub fn show_modal(&mut self, modal: Modal, now: Duration) {
        self.session.modal = Some(modal);
        self.session.capture.release_all();
        self.timer.pause(now);
    }

    pub fn hide_modal(&mut self, now: Duration) {
        self.session.modal = None;
        self.timer.resume(now);
    }

    pub fn is_interaction_blocked(&self) -> bool {
        self.session.modal.is_some()
    }

    /// Pause the track and orbit `poi`. Only possible while exploring.
    pub fn enter_observation(&mut self, poi: PointOfInterest, now: Duration) -> bool {
        if !self.states.can_observe() {
            log::warn!("Observation is only available in explore mode (now {})", self.states.current());
            return false;
        }
        if !self.states.set_state(GameState::Observation, false) {
            return false;
        }
        let center = self.track.position(poi.info().track_position);
        self.session.begin_observation(poi, center, now);
        self.ship.reset_forces(DEFAULT_RESET_DAMPING);
        self.on_enter(GameState::Observation);
        self.flush_audio();
        log::info!("Observing {} from distance {}", poi, poi.info().orbit_distance);
        true
    }

    /// Observe whichever point of interest is closest along the track.
    pub fn observe_nearest(&mut self, now: Duration) -> bool {
        let poi = PointOfInterest::nearest(self.session.t);
        self.enter_observation(poi, now)
    }

    /// Leave the orbit and resume the track where it stopped.
    pub fn exit_observation(&mut self, now: Duration) -> bool {
        if !self.states.is_observation_mode() {
            return false;
        }
        if !self.states.set_state(GameState::Explore, false) {
            return false;
        }
        self.session.end_observation(now);
        self.on_enter(GameState::Explore);
        self.flush_audio();
        true
    }

    /// Cycle Fast -> Slow -> Normal -> Fast without moving the ship.
    pub fn switch_speed_mode(&mut self, now: Duration) -> SpeedMode {
        let next = self.session.speed_mode.next();
        self.session.set_speed_mode(next, now);
        log::info!("Speed mode {} ({:.0} s per loop)", next.label(), next.loop_time().as_secs_f32());
        next
    }

    /// Returns the new setting.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        if self.sound_enabled {
            self.audio.resume_all();
            let state = self.states.current();
            if state != GameState::Launch {
                self.on_enter(state);
                self.flush_audio();
            }
        } else {
            self.audio.pause_all();
        }
        log::info!("Sound {}", if self.sound_enabled { "on" } else { "off" });
        self.sound_enabled
    }

    /// Route a pointer event to the current state's handlers. Events are
    /// ignored while a modal is showing.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Duration) -> bool {
        if self.is_interaction_blocked() {
            return false;
        }
        self.session.now = now;
        let handled = self.pointer.dispatch(self.states.current(), &mut self.session, event);
        self.flush_audio();
        handled
    }

    /// Advance one frame.
    pub fn update(&mut self, now: Duration) {
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.saturating_sub(last).as_secs_f32());
        self.last_frame = Some(now);
        self.session.now = now;
        let time_seconds = now.as_secs_f32();

        self.timer.tick(now);
        self.session.score.tick(now);
        self.session.expire_lasers(now);
        self.world.update_explosions(now);

        match self.states.current() {
            GameState::Launch => self.ship.float_effect(time_seconds),
            GameState::Battle | GameState::Explore => self.fly(now, time_seconds),
            GameState::Observation => self.observe(now, dt, time_seconds),
        }

        if self.session.loop_count >= self.session.total_loops && self.session.modal.is_none() {
            log::info!(
                "Run complete after {} loops, score {}",
                self.session.loop_count,
                self.session.score.battle_score
            );
            self.show_modal(Modal::GameOver, now);
        }

        self.flush_audio();
        self.throttle.debug(
            "frame",
            now,
            format_args!(
                "{} t={:.3} loops={} hits={} score={} time={}",
                self.states.current(),
                self.session.t,
                self.session.loop_count,
                self.session.hits,
                self.session.score.battle_score,
                self.timer.formatted()
            ),
        );
    }

    fn fly(&mut self, now: Duration, time_seconds: f32) {
        if self.session.advance_track(now) {
            log::info!("Loop {}/{} complete", self.session.loop_count, self.session.total_loops);
        }
        self.update_warp();

        let t = self.session.t;
        let placement = self.track.sample(t);
        self.session.position = placement.position;

        self.ship.fly(self.session.mouse, self.session.viewport);
        self.ship.float_effect(time_seconds);
        if self.ship.out_of_bounds() && self.throttle.ready("bounds", now) {
            log::debug!("Ship pose {:?}", self.ship.pose());
        }

        if self.states.can_shoot() {
            let ray = self.ship.targeting_ray(&placement);
            self.resolve_hits(&ray, now);
        } else {
            self.session.hits = 0;
        }
    }

    fn update_warp(&mut self) {
        let t = self.session.t;
        if !self.session.warping && t > positions::WARP_BEGIN && t < positions::WARP_END {
            self.session.warping = true;
            self.session.play(sounds::WARP, true, 0.5);
        } else if self.session.warping && t > positions::WARP_RESET {
            self.session.warping = false;
            self.session.stop(sounds::WARP);
        }
    }

    fn resolve_hits(&mut self, ray: &physics::TargetingRay, now: Duration) {
        let hits = self.world.targets_hit(ray);
        let previous = self.session.hits;
        self.session.hits = hits.len();
        if previous == 0 && !hits.is_empty() {
            self.session.play(sounds::CLICK, false, 0.5);
        }
        if hits.is_empty() || !self.session.fired_recently(now) {
            return;
        }

        let (rocks, enemies) = self.world.destroy(&hits, now, &mut self.rng);
        if rocks + enemies == 0 {
            return;
        }
        self.session.play(sounds::EXPLOSION, false, 0.5);
        let score = &mut self.session.score;
        score.register_hit(rocks, HitKind::Rock, now);
        score.register_hit(enemies, HitKind::Enemy, now);

        let initial = self.world.initial();
        if enemies > 0 && initial.enemies > 0 && self.world.count(HitKind::Enemy) == 0 {
            score.award_clear_bonus(HitKind::Enemy, now);
        }
        if rocks > 0 && initial.rocks > 0 && self.world.count(HitKind::Rock) == 0 {
            score.award_clear_bonus(HitKind::Rock, now);
        }
    }

    fn observe(&mut self, now: Duration, dt: f32, time_seconds: f32) {
        self.session.position = self.session.orbit.update(dt);
        self.ship.observe(time_seconds);
        self.session.check_observation_reward(now);
    }

    /// Audio for entering `state`.
    fn on_enter(&mut self, state: GameState) {
        let s = &mut self.session;
        match state {
            GameState::Launch => {}
            GameState::Battle => {
                s.play(sounds::BG, true, 0.3);
                s.play(sounds::ENGINE, true, 0.7);
                s.play(sounds::ENGINE2, true, 0.5);
            }
            GameState::Explore => {
                s.play(sounds::BG, true, 0.3);
                s.play(sounds::ENGINE, true, 0.6);
                s.play(sounds::ENGINE2, true, 0.4);
            }
            GameState::Observation => {
                s.stop(sounds::BG);
                s.stop(sounds::ENGINE);
                s.stop(sounds::ENGINE2);
            }
        }
    }

    fn flush_audio(&mut self) {
        for cue in self.session.take_cues() {
            match cue {
                AudioCue::Play { name, looped, volume } => {
                    if self.sound_enabled {
                        self.audio.play(name, looped, volume);
                    }
                }
                AudioCue::Stop(name) => self.audio.stop(name),
            }
        }
    }

    /// What the host camera should show this frame.
    pub fn camera_view(&self) -> CameraView {
        let fov_degrees = self.session.speed_mode.fov_degrees();
        if self.states.is_observation_mode() {
            return self.session.orbit.view(fov_degrees);
        }
        let t = self.session.t;
        CameraView {
            eye: self.track.position(t),
            target: self.track.position(t + LOOK_AHEAD),
            fov_degrees,
        }
    }

    /// World position of the ship this frame.
    pub fn ship_position(&self) -> Vec3 {
        self.ship.world_position(&self.track.sample(self.session.t))
    }

    /// Labels close enough to the ship to be shown.
    pub fn visible_labels(&self) -> Vec<&LabelPlacement> {
        self.decorations
            .labels
            .iter()
            .zip(INFO_LABELS.iter())
            .filter(|(_, info)| within_range(self.session.t, info.t, LABEL_RANGE))
            .map(|(label, _)| label)
            .collect()
    }

    /// Back to Launch with an empty world.
    pub fn reset(&mut self, now: Duration) {
        self.states.reset();
        self.world.clear();
        self.ship.reset();
        self.session.reset_run(now, self.track.position(positions::START));
        self.timer.reset(now, true);
        self.audio.stop_all();
        self.last_frame = None;
    }

    /// Tear everything down: subscribers, pointer handling, timers, audio.
    pub fn cleanup(&mut self) {
        self.states.clear_subscriptions();
        self.pointer.set_active(false);
        self.pointer.clear();
        self.session.capture.release_all();
        self.session.cancel_timers();
        self.world.clear();
        self.audio.stop_all();
        log::info!("Game controller cleaned up");
    }
}

fn install_pointer_handlers(pointer: &mut PointerDispatcher<GameState, Session>) {
    pointer.set_handlers(GameState::Launch, HandlerSet::empty());
    pointer.set_handlers(
        GameState::Battle,
        HandlerSet::empty()
            .on_move(|s: &mut Session, e: &PointerEvent| {
                if let Some(position) = e.position() {
                    s.steer(position);
                }
            })
            .on_down(|s: &mut Session, _: &PointerEvent| s.shoot()),
    );
    pointer.set_handlers(
        GameState::Explore,
        HandlerSet::empty().on_move(|s: &mut Session, e: &PointerEvent| {
            if let Some(position) = e.position() {
                s.steer(position);
            }
        }),
    );
    pointer.set_handlers(
        GameState::Observation,
        HandlerSet::empty()
            .on_down(|s: &mut Session, e: &PointerEvent| {
                if let PointerEvent::Down { pointer_id, position, .. } = *e {
                    s.begin_orbit_drag(pointer_id, position);
                }
            })
            .on_move(|s: &mut Session, e: &PointerEvent| {
                if let PointerEvent::Move { pointer_id, position } = *e {
                    s.orbit_drag(pointer_id, position);
                }
            })
            .on_up(|s: &mut Session, e: &PointerEvent| {
                if let Some(pointer_id) = e.pointer_id() {
                    s.end_orbit_drag(pointer_id);
                }
            })
            .on_wheel(|s: &mut Session, e: &PointerEvent| {
                if let PointerEvent::Wheel { delta_y } = *e {
                    s.zoom(delta_y);
                }
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::MouseButton;
    use procgen::ScatterObject;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every backend call as a string.
    #[derive(Default, Clone)]
    struct RecordingAudio {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl AudioBackend for RecordingAudio {
        fn play(&mut self, name: &str, looped: bool, volume: f64) {
            self.calls.borrow_mut().push(format!("play {} {} {}", name, looped, volume));
        }
        fn stop(&mut self, name: &str) {
            self.calls.borrow_mut().push(format!("stop {}", name));
        }
        fn pause_all(&mut self) {
            self.calls.borrow_mut().push("pause_all".into());
        }
        fn resume_all(&mut self) {
            self.calls.borrow_mut().push("resume_all".into());
        }
        fn set_volume(&mut self, volume: f64) {
            self.calls.borrow_mut().push(format!("volume {}", volume));
        }
        fn stop_all(&mut self) {
            self.calls.borrow_mut().push("stop_all".into());
        }
        fn is_loaded(&self, _name: &str) -> bool {
            true
        }
    }

    fn secs(v: f32) -> Duration {
        Duration::from_secs_f32(v)
    }

    fn controller() -> (GameController, Rc<RefCell<Vec<String>>>) {
        let audio = RecordingAudio::default();
        let calls = audio.calls.clone();
        let config = GameConfig {
            seed: Some(3),
            sound: true,
            ..GameConfig::default()
        };
        (GameController::new(config, Box::new(audio), Duration::ZERO), calls)
    }

    fn down(pointer_id: u64, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down {
            pointer_id,
            position: Vec2::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(pointer_id: u64, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move {
            pointer_id,
            position: Vec2::new(x, y),
        }
    }

    /// Put a large target straight ahead of the ship.
    fn park_target(game: &mut GameController, kind: HitKind) {
        let placement = game.track().sample(game.session().t);
        let ray = game.ship().targeting_ray(&placement);
        let center = ray.origin + ray.direction * 100.0;
        game.world.spawn_target(
            kind,
            ScatterObject {
                guid: u64::MAX,
                scale: 1.0,
                size: 20.0,
                offset: center,
                anchor: center,
                speed: 1.0,
                radius: 0.0,
                t: 0.0,
                rotation: Vec3::ZERO,
            },
        );
    }

    #[test]
    fn battle_start_populates_world_and_plays_engines() {
        let (mut game, calls) = controller();
        assert!(game.start_battle_mode(secs(0.0)));
        assert_eq!(game.world().count(HitKind::Enemy), 10);
        assert_eq!(game.world().count(HitKind::Rock), 100);
        assert_eq!(game.world().particle_count(), 500);
        assert_eq!(game.decorations().chainweb.len(), 10);
        assert_eq!(
            *calls.borrow(),
            vec!["play bg true 0.3", "play engine true 0.7", "play engine2 true 0.5"]
        );
    }

    #[test]
    fn observation_from_battle_is_rejected() {
        let (mut game, _) = controller();
        game.start_battle_mode(secs(0.0));
        assert!(!game.enter_observation(PointOfInterest::SpaceStation, secs(1.0)));
        assert_eq!(game.state(), GameState::Battle);
    }

    #[test]
    fn observation_round_trip_keeps_track_continuity() {
        let (mut game, calls) = controller();
        game.start_explore_mode(secs(0.0));
        game.update(secs(10.0));
        let t_before = game.session().t;
        calls.borrow_mut().clear();

        assert!(game.enter_observation(PointOfInterest::SpaceStation, secs(10.0)));
        assert_eq!(game.state(), GameState::Observation);
        assert_eq!(
            *calls.borrow(),
            vec!["stop bg", "stop engine", "stop engine2"]
        );
        let center = game.track().position(0.79);
        assert!((game.session().orbit.center() - center).length() < 1e-3);

        for frame in 0..60 {
            game.update(secs(10.0 + frame as f32 * 0.25));
        }
        assert_eq!(game.session().t, t_before);

        assert!(game.exit_observation(secs(30.0)));
        assert!(calls.borrow().contains(&"play engine true 0.6".to_string()));
        game.update(secs(30.0));
        assert!((game.session().t - t_before).abs() < 1e-4);
    }

    #[test]
    fn observation_pointer_drag_orbits_and_wheel_zooms() {
        let (mut game, _) = controller();
        game.start_explore_mode(secs(0.0));
        game.enter_observation(PointOfInterest::SpaceProbe, secs(1.0));

        assert!(game.handle_pointer(&down(1, 100.0, 100.0), secs(1.0)));
        game.handle_pointer(&moved(1, 150.0, 100.0), secs(1.1));
        // another pointer cannot hijack the drag
        game.handle_pointer(&moved(2, 900.0, 100.0), secs(1.1));
        game.handle_pointer(&PointerEvent::Leave { pointer_id: 1 }, secs(1.2));
        assert!(!game.session().capture.is_dragging());
        game.handle_pointer(&PointerEvent::Wheel { delta_y: -100.0 }, secs(1.2));
        assert_eq!(game.session().orbit.target_distance(), 95.0);

        for frame in 0..120 {
            game.update(secs(1.2 + frame as f32 / 60.0));
        }
        assert!(game.session().orbit.angle() > 0.5);
    }

    #[test]
    fn shooting_a_target_scores_and_explodes() {
        let (mut game, calls) = controller();
        game.start_battle_mode(secs(0.0));
        game.update(secs(0.0));
        park_target(&mut game, HitKind::Rock);
        let rocks_before = game.world().count(HitKind::Rock);

        game.handle_pointer(&down(1, 640.0, 360.0), secs(0.0));
        assert!(calls.borrow().iter().any(|c| c == "play zap false 1"));
        game.update(secs(0.016));

        assert!(game.world().count(HitKind::Rock) < rocks_before);
        assert!(game.session().score.battle_score >= 10);
        assert!(game.world().explosion_count() >= 2);
        assert!(calls.borrow().iter().any(|c| c == "play explosion false 0.5"));
        assert!(calls.borrow().iter().any(|c| c == "play click false 0.5"));
    }

    #[test]
    fn click_cue_does_not_repeat_after_a_kill() {
        let (mut game, calls) = controller();
        game.start_battle_mode(secs(0.0));
        game.update(secs(0.0));
        park_target(&mut game, HitKind::Rock);
        game.handle_pointer(&down(1, 640.0, 360.0), secs(0.0));
        game.update(secs(0.016));
        assert!(game.session().hits >= 1);

        // the next target slides into the crosshair without a gap
        park_target(&mut game, HitKind::Enemy);
        game.update(secs(0.016));
        let clicks = calls.borrow().iter().filter(|c| c.starts_with("play click")).count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn starting_the_running_mode_again_keeps_the_run() {
        let (mut game, _) = controller();
        game.start_battle_mode(secs(0.0));
        game.update(secs(5.0));
        let t = game.session().t;
        park_target(&mut game, HitKind::Rock);
        assert_eq!(game.world().count(HitKind::Rock), 101);

        assert!(!game.start_battle_mode(secs(6.0)));
        assert_eq!(game.state(), GameState::Battle);
        assert_eq!(game.session().t, t);
        assert_eq!(game.world().count(HitKind::Rock), 101);
    }

    #[test]
    fn targets_in_crosshair_without_a_laser_survive() {
        let (mut game, _) = controller();
        game.start_battle_mode(secs(0.0));
        game.update(secs(0.0));
        park_target(&mut game, HitKind::Enemy);
        game.update(secs(0.016));
        assert!(game.session().hits >= 1);
        assert_eq!(game.world().count(HitKind::Enemy), 11);
        assert_eq!(game.session().score.battle_score, 0);
    }

    #[test]
    fn game_over_after_total_loops() {
        let (mut game, _) = controller();
        game.start_explore_mode(secs(0.0));
        let mut now = 0.0;
        while now < 7.0 * 40.0 + 5.0 {
            game.update(secs(now));
            now += 0.5;
        }
        assert_eq!(game.session().loop_count, 7);
        assert_eq!(game.session().modal, Some(Modal::GameOver));
        assert!(game.timer().is_paused());
        assert!(game.is_interaction_blocked());
        assert!(!game.handle_pointer(&moved(1, 0.0, 0.0), secs(now)));
    }

    #[test]
    fn mode_switch_asks_after_a_loop() {
        let (mut game, _) = controller();
        game.start_battle_mode(secs(0.0));
        assert_eq!(game.request_mode_switch(secs(1.0)), ModeSwitch::Switched);
        assert_eq!(game.state(), GameState::Explore);

        game.update(secs(39.0));
        game.update(secs(41.0));
        assert_eq!(game.session().loop_count, 1);
        assert_eq!(game.request_mode_switch(secs(41.0)), ModeSwitch::NeedsConfirmation);
        assert_eq!(game.state(), GameState::Explore);
        assert!(game.confirm_mode_switch(secs(42.0)));
        assert_eq!(game.state(), GameState::Battle);
        assert_eq!(game.session().loop_count, 0);
        assert_eq!(game.session().modal, None);
    }

    #[test]
    fn warp_cue_plays_once_per_pass() {
        let (mut game, calls) = controller();
        game.start_explore_mode(secs(0.0));
        calls.borrow_mut().clear();
        for step in 0..80 {
            game.update(secs(step as f32 * 0.5));
        }
        let warps = calls.borrow().iter().filter(|c| c.starts_with("play warp")).count();
        assert_eq!(warps, 1);
        assert!(calls.borrow().contains(&"stop warp".to_string()));
    }

    #[test]
    fn speed_switch_cycles_and_keeps_position() {
        let (mut game, _) = controller();
        game.start_explore_mode(secs(0.0));
        game.update(secs(10.0));
        let t = game.session().t;
        assert_eq!(game.switch_speed_mode(secs(10.0)), SpeedMode::Slow);
        game.update(secs(10.0));
        assert!((game.session().t - t).abs() < 1e-4);
        assert_eq!(game.camera_view().fov_degrees, 65.0);
    }

    #[test]
    fn muted_controller_drops_play_cues() {
        let (mut game, calls) = controller();
        assert!(!game.toggle_sound());
        game.start_battle_mode(secs(0.0));
        assert!(!calls.borrow().iter().any(|c| c.starts_with("play")));
        assert!(game.toggle_sound());
        assert!(calls.borrow().contains(&"play engine true 0.7".to_string()));
    }

    #[test]
    fn settings_carry_player_choices() {
        let (mut game, _) = controller();
        game.start_explore_mode(secs(0.0));
        game.toggle_sound();
        game.switch_speed_mode(secs(1.0));
        let settings = game.settings();
        assert!(!settings.sound);
        assert_eq!(settings.track.speed_mode, SpeedMode::Slow);
        assert_eq!(settings.seed, Some(3));
    }

    #[test]
    fn cleanup_deactivates_pointer_and_stops_audio() {
        let (mut game, calls) = controller();
        game.subscribe_any(|_| {});
        game.start_explore_mode(secs(0.0));
        game.cleanup();
        assert_eq!(game.states().subscriber_count(), 0);
        assert!(!game.handle_pointer(&moved(1, 10.0, 10.0), secs(1.0)));
        assert_eq!(calls.borrow().last().map(String::as_str), Some("stop_all"));
    }
}
