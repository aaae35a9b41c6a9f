//! Per-run flight state shared by the controller and the pointer handlers:
//! track clock, pointer, lasers, orbit, score and queued audio cues.

use std::collections::HashSet;
use std::time::Duration;

use engine_core::{Debounce, Vec3};
use glam::Vec2;
use input::PointerCapture;
use procgen::wrap;

use crate::config::{GameConfig, SpeedMode};
use crate::orbit::OrbitCamera;
use crate::poi::PointOfInterest;
use crate::score::ScoreBoard;

/// Lasers older than this are dropped by the cleanup timer.
pub const LASER_LIFETIME: Duration = Duration::from_secs(1);
/// A target in the crosshair explodes only if a laser fired this recently.
pub const LASER_HIT_WINDOW: Duration = Duration::from_millis(100);
/// Observing one point of interest this long earns stardust.
pub const STARDUST_OBSERVATION: Duration = Duration::from_secs(20);

/// Sound request produced during a frame, flushed to the audio backend by
/// the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    Play {
        name: &'static str,
        looped: bool,
        volume: f64,
    },
    Stop(&'static str),
}

/// Blocking dialog shown over the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Switching modes would throw away completed loops.
    SwitchConfirm,
    /// The run is over.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Time of the event or frame being processed.
    pub now: Duration,
    /// Track parameter in `[0, 1)`.
    pub t: f32,
    pub last_t: f32,
    /// Track clock origin; `t` is measured from here.
    pub start_time: Duration,
    pub speed_mode: SpeedMode,
    pub paused: bool,
    pub paused_at: Option<Duration>,
    /// Camera/track position this frame.
    pub position: Vec3,
    /// Position captured when observation began.
    pub previous_position: Vec3,
    /// Pointer offset from the viewport center, pixels, y down.
    pub mouse: Vec2,
    pub viewport: Vec2,
    pub capture: PointerCapture,
    pub orbit: OrbitCamera,
    /// Fire times of live lasers.
    pub lasers: Vec<Duration>,
    laser_cleanup: Debounce,
    /// Targets under the crosshair this frame.
    pub hits: usize,
    pub warping: bool,
    pub loop_count: u32,
    pub total_loops: u32,
    pub modal: Option<Modal>,
    pub score: ScoreBoard,
    pub current_poi: Option<PointOfInterest>,
    pub observation_started: Option<Duration>,
    pub observed: HashSet<PointOfInterest>,
    cues: Vec<AudioCue>,
}

impl Session {
    pub fn new(config: &GameConfig, now: Duration) -> Self {
        Self {
            now,
            t: 0.0,
            last_t: 0.0,
            start_time: now,
            speed_mode: config.track.speed_mode,
            paused: false,
            paused_at: None,
            position: Vec3::ZERO,
            previous_position: Vec3::ZERO,
            mouse: Vec2::ZERO,
            viewport: Vec2::new(config.window_width as f32, config.window_height as f32),
            capture: PointerCapture::new(),
            orbit: OrbitCamera::new(config.orbit),
            lasers: Vec::new(),
            laser_cleanup: Debounce::new(),
            hits: 0,
            warping: false,
            loop_count: 0,
            total_loops: config.track.total_loops,
            modal: None,
            score: ScoreBoard::new(config.combo_window()),
            current_poi: None,
            observation_started: None,
            observed: HashSet::new(),
            cues: Vec::new(),
        }
    }

    pub fn loop_time(&self) -> Duration {
        self.speed_mode.loop_time()
    }

    /// Fresh run starting at `now` from the beginning of the track.
    pub fn reset_run(&mut self, now: Duration, start_position: Vec3) {
        self.now = now;
        self.t = 0.0;
        self.last_t = 0.0;
        self.start_time = now;
        self.paused = false;
        self.paused_at = None;
        self.position = start_position;
        self.capture.release_all();
        self.lasers.clear();
        self.laser_cleanup.cancel();
        self.hits = 0;
        self.warping = false;
        self.loop_count = 0;
        self.modal = None;
        self.score.reset();
        self.current_poi = None;
        self.observation_started = None;
        self.observed.clear();
    }

    /// Track parameter for `now` from the current origin and loop time. The
    /// origin may lie after `now` (see [`Session::set_speed_mode`]).
    pub fn track_t(&self, now: Duration) -> f32 {
        let loop_nanos = self.loop_time().as_nanos().max(1) as i128;
        let elapsed = (now.as_nanos() as i128 - self.start_time.as_nanos() as i128).rem_euclid(loop_nanos);
        (elapsed as f64 / loop_nanos as f64) as f32
    }

    /// Move `t` forward to `now`. Returns true when a loop was just completed.
    pub fn advance_track(&mut self, now: Duration) -> bool {
        if self.paused {
            return false;
        }
        self.last_t = self.t;
        self.t = wrap(self.track_t(now));
        let completed = self.last_t > 0.9 && self.t < 0.1;
        if completed {
            self.loop_count += 1;
        }
        completed
    }

    /// Change speed without moving the ship: the origin is shifted so the
    /// current `t` maps to `now` (or to the pause time while observing) under
    /// the new loop time.
    pub fn set_speed_mode(&mut self, mode: SpeedMode, now: Duration) {
        let t = if self.paused { self.t } else { self.track_t(now) };
        self.speed_mode = mode;
        let reference = self.paused_at.filter(|_| self.paused).unwrap_or(now);
        let loop_time = self.loop_time();
        // one loop later is the same track position and keeps the origin non-negative
        self.start_time = reference + loop_time.saturating_sub(loop_time.mul_f64(f64::from(t)));
        self.t = t;
    }

    /// Freeze the track clock for observation.
    pub fn begin_observation(&mut self, poi: PointOfInterest, center: Vec3, now: Duration) {
        self.previous_position = self.position;
        self.paused = true;
        self.paused_at = Some(now);
        let info = poi.info();
        self.orbit.setup(center, info.orbit_distance, info.orbit_speed);
        self.current_poi = Some(poi);
        self.observation_started = Some(now);
        self.capture.release_all();
        self.mouse = Vec2::ZERO;
    }

    /// Resume the track clock; the paused span is added to the origin so `t`
    /// picks up where it stopped.
    pub fn end_observation(&mut self, now: Duration) {
        if let Some(paused_at) = self.paused_at.take() {
            self.start_time += now.saturating_sub(paused_at);
        }
        self.paused = false;
        self.position = self.previous_position;
        self.current_poi = None;
        self.observation_started = None;
        self.capture.release_all();
    }

    /// Award stardust once per point of interest after a long enough look.
    pub fn check_observation_reward(&mut self, now: Duration) -> bool {
        let (Some(poi), Some(started)) = (self.current_poi, self.observation_started) else {
            return false;
        };
        if self.observed.contains(&poi) || now.saturating_sub(started) < STARDUST_OBSERVATION {
            return false;
        }
        self.observed.insert(poi);
        self.score.add_stardust(now);
        log::info!("Stardust for observing {}", poi);
        true
    }

    pub fn steer(&mut self, position: Vec2) {
        self.mouse = position - self.viewport / 2.0;
    }

    pub fn shoot(&mut self) {
        self.lasers.push(self.now);
        self.laser_cleanup.cancel();
        self.laser_cleanup.schedule(self.now, LASER_LIFETIME);
        self.play(audio::sounds::ZAP, false, 1.0);
    }

    pub fn fired_recently(&self, now: Duration) -> bool {
        self.lasers
            .last()
            .is_some_and(|&fired| now.saturating_sub(fired) < LASER_HIT_WINDOW)
    }

    /// Drop lasers past their lifetime once the cleanup timer fires.
    pub fn expire_lasers(&mut self, now: Duration) {
        if self.laser_cleanup.fire(now) {
            self.lasers.retain(|&fired| now.saturating_sub(fired) < LASER_LIFETIME);
        }
    }

    pub fn begin_orbit_drag(&mut self, pointer_id: u64, position: Vec2) {
        self.capture.begin(pointer_id, position);
    }

    pub fn orbit_drag(&mut self, pointer_id: u64, position: Vec2) {
        if let Some(delta) = self.capture.drag(pointer_id, position) {
            self.orbit.drag(delta);
        }
    }

    pub fn end_orbit_drag(&mut self, pointer_id: u64) {
        self.capture.release(pointer_id);
    }

    pub fn zoom(&mut self, delta_y: f32) {
        self.orbit.zoom(delta_y);
    }

    pub fn play(&mut self, name: &'static str, looped: bool, volume: f64) {
        self.cues.push(AudioCue::Play { name, looped, volume });
    }

    pub fn stop(&mut self, name: &'static str) {
        self.cues.push(AudioCue::Stop(name));
    }

    pub fn take_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn cancel_timers(&mut self) {
        self.laser_cleanup.cancel();
        self.score.combo.reset();
    }
}
