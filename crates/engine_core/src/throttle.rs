//! Per-category log throttling for diagnostics emitted every frame.

use std::collections::HashMap;
use std::time::Duration;

/// Default minimum spacing between two messages of one category.
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_millis(1000);

/// Lets at most one message per category through every `interval`.
#[derive(Debug, Clone)]
pub struct LogThrottle {
    interval: Duration,
    last: HashMap<&'static str, Duration>,
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }
}

impl LogThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: HashMap::new(),
        }
    }

    /// True when `category` may log at `now`; records the emission.
    pub fn ready(&mut self, category: &'static str, now: Duration) -> bool {
        match self.last.get(category) {
            Some(&last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last.insert(category, now);
                true
            }
        }
    }

    /// Log at debug level through the throttle.
    pub fn debug(&mut self, category: &'static str, now: Duration, message: std::fmt::Arguments<'_>) {
        if self.ready(category, now) {
            log::debug!("[{}] {}", category, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_throttled_independently() {
        let mut throttle = LogThrottle::new(Duration::from_millis(100));
        assert!(throttle.ready("ship", Duration::from_millis(0)));
        assert!(!throttle.ready("ship", Duration::from_millis(50)));
        assert!(throttle.ready("orbit", Duration::from_millis(50)));
        assert!(throttle.ready("ship", Duration::from_millis(100)));
    }
}
