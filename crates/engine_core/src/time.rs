//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the loop started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time since start. This is the `now` fed to the controller.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Play-time clock that excludes paused intervals.
///
/// All methods take the current wall time as a `Duration` since the session
/// started, so the timer is fully deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct GameTimer {
    game_start: Duration,
    session_start: Duration,
    total_game_time: Duration,
    session_time: Duration,
    paused: bool,
    total_pause_time: Duration,
    pause_start: Duration,
}

impl GameTimer {
    pub fn new(now: Duration) -> Self {
        Self {
            game_start: now,
            session_start: now,
            ..Default::default()
        }
    }

    /// Recompute the running totals. Does nothing while paused.
    ///
    /// Returns the amount of game time that passed since the previous tick.
    pub fn tick(&mut self, now: Duration) -> Duration {
        if self.paused {
            return Duration::ZERO;
        }
        let previous = self.total_game_time;
        self.total_game_time = now
            .saturating_sub(self.game_start)
            .saturating_sub(self.total_pause_time);
        self.session_time = now
            .saturating_sub(self.session_start)
            .saturating_sub(self.total_pause_time);
        self.total_game_time.saturating_sub(previous)
    }

    /// Restart the session clock; also the total clock when `reset_total` is set.
    pub fn reset(&mut self, now: Duration, reset_total: bool) {
        self.session_start = now;
        self.session_time = Duration::ZERO;
        if reset_total {
            self.game_start = now;
            self.total_game_time = Duration::ZERO;
        }
        self.paused = false;
        self.total_pause_time = Duration::ZERO;
        self.pause_start = Duration::ZERO;
    }

    pub fn pause(&mut self, now: Duration) {
        if !self.paused {
            self.paused = true;
            self.pause_start = now;
        }
    }

    pub fn resume(&mut self, now: Duration) {
        if self.paused {
            self.total_pause_time += now.saturating_sub(self.pause_start);
            self.paused = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn total_game_time(&self) -> Duration {
        self.total_game_time
    }

    pub fn session_time(&self) -> Duration {
        self.session_time
    }

    /// Total game time formatted as `mm:ss.cc`.
    pub fn formatted(&self) -> String {
        let millis = self.total_game_time.as_millis();
        let total_seconds = millis / 1000;
        format!(
            "{:02}:{:02}.{:02}",
            total_seconds / 60,
            total_seconds % 60,
            (millis % 1000) / 10
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn game_timer_excludes_paused_time() {
        let mut timer = GameTimer::new(ms(0));
        timer.tick(ms(1_000));
        timer.pause(ms(1_000));
        assert_eq!(timer.tick(ms(5_000)), Duration::ZERO);
        timer.resume(ms(5_000));
        timer.tick(ms(6_000));
        assert_eq!(timer.total_game_time(), ms(2_000));
    }

    #[test]
    fn game_timer_reset_keeps_total_unless_requested() {
        let mut timer = GameTimer::new(ms(0));
        timer.tick(ms(3_000));
        timer.reset(ms(3_000), false);
        timer.tick(ms(4_000));
        assert_eq!(timer.session_time(), ms(1_000));
        assert_eq!(timer.total_game_time(), ms(4_000));

        timer.reset(ms(4_000), true);
        timer.tick(ms(4_500));
        assert_eq!(timer.total_game_time(), ms(500));
    }

    #[test]
    fn game_timer_formats_minutes_seconds_centis() {
        let mut timer = GameTimer::new(ms(0));
        timer.tick(ms(83_456));
        assert_eq!(timer.formatted(), "01:23.45");
    }
}
