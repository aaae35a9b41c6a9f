//! Debounced one-shot timers driven by the frame clock.

use std::time::Duration;

/// A one-shot timer that is cancelled before every reschedule, so at most one
/// deadline is ever pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debounce {
    deadline: Option<Duration>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending deadline with `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_replaces_previous_deadline() {
        let mut timer = Debounce::new();
        timer.schedule(Duration::from_millis(0), Duration::from_millis(1000));
        timer.schedule(Duration::from_millis(500), Duration::from_millis(1000));
        assert!(!timer.fire(Duration::from_millis(1200)));
        assert!(timer.fire(Duration::from_millis(1500)));
        assert!(!timer.fire(Duration::from_millis(2000)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = Debounce::new();
        timer.schedule(Duration::ZERO, Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.fire(Duration::from_secs(1)));
    }
}
