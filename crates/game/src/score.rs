//! Battle scoring: per-target points, combo bonuses, clear bonuses,
//! stardust for observed points of interest, and on-screen notifications.

use std::time::Duration;

use engine_core::Debounce;

pub const ROCK_POINTS: u32 = 10;
pub const ENEMY_POINTS: u32 = 150;
pub const ALL_ENEMIES_BONUS: u32 = 800;
pub const ALL_ROCKS_BONUS: u32 = 1500;
/// Combo size for the small bonus (`count * 25`).
pub const COMBO_SMALL: u32 = 3;
/// Combo size for the big bonus (`count * 50`).
pub const COMBO_BIG: u32 = 5;
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

/// What a laser hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Rock,
    Enemy,
}

impl HitKind {
    pub fn points(self) -> u32 {
        match self {
            HitKind::Rock => ROCK_POINTS,
            HitKind::Enemy => ENEMY_POINTS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            HitKind::Rock => "ROCK",
            HitKind::Enemy => "ENEMY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreNotification {
    pub id: u64,
    pub text: String,
    pub points: u32,
    pub is_bonus: bool,
    pub expires_at: Duration,
}

/// Consecutive hits inside a time window. A debounced timer clears the
/// combo once the window passes without another hit.
#[derive(Debug, Clone)]
pub struct ComboSystem {
    pub count: u32,
    pub last_hit: Option<Duration>,
    pub window: Duration,
    pub active: bool,
    expiry: Debounce,
}

impl ComboSystem {
    pub fn new(window: Duration) -> Self {
        Self {
            count: 0,
            last_hit: None,
            window,
            active: false,
            expiry: Debounce::new(),
        }
    }

    /// Record `hits` simultaneous hits and return the combo bonus they earn.
    pub fn register(&mut self, hits: u32, now: Duration) -> u32 {
        let chained = self.last_hit.is_some_and(|last| now.saturating_sub(last) < self.window);
        self.count = if chained { self.count + hits } else { hits };
        self.last_hit = Some(now);
        self.active = true;
        self.expiry.cancel();
        self.expiry.schedule(now, self.window);

        if !chained {
            0
        } else if self.count >= COMBO_BIG {
            self.count * 50
        } else if self.count >= COMBO_SMALL {
            self.count * 25
        } else {
            0
        }
    }

    /// Clear the combo if its window has run out. Returns true when it did.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.expiry.fire(now) {
            self.count = 0;
            self.active = false;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.expiry.cancel();
        self.count = 0;
        self.last_hit = None;
        self.active = false;
    }
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    pub battle_score: u32,
    pub stardust: u32,
    pub combo: ComboSystem,
    notifications: Vec<ScoreNotification>,
    next_notification: u64,
}

impl ScoreBoard {
    pub fn new(combo_window: Duration) -> Self {
        Self {
            battle_score: 0,
            stardust: 0,
            combo: ComboSystem::new(combo_window),
            notifications: Vec::new(),
            next_notification: 0,
        }
    }

    pub fn notifications(&self) -> &[ScoreNotification] {
        &self.notifications
    }

    pub fn notify(&mut self, text: impl Into<String>, points: u32, is_bonus: bool, now: Duration) {
        let id = self.next_notification;
        self.next_notification += 1;
        self.notifications.push(ScoreNotification {
            id,
            text: text.into(),
            points,
            is_bonus,
            expires_at: now + NOTIFICATION_LIFETIME,
        });
    }

    /// Score `count` targets of one kind hit in the same frame. Returns the
    /// points added including any combo bonus.
    pub fn register_hit(&mut self, count: u32, kind: HitKind, now: Duration) -> u32 {
        if count == 0 {
            return 0;
        }
        let base = kind.points() * count;
        self.battle_score += base;
        self.notify(format!("{} x{}", kind.label(), count), base, false, now);

        let bonus = self.combo.register(count, now);
        if bonus > 0 {
            self.battle_score += bonus;
            self.notify(format!("COMBO x{}", self.combo.count), bonus, true, now);
            log::info!("Combo x{} (+{})", self.combo.count, bonus);
        }
        base + bonus
    }

    /// Bonus for wiping out every target of one kind.
    pub fn award_clear_bonus(&mut self, kind: HitKind, now: Duration) -> u32 {
        let (text, bonus) = match kind {
            HitKind::Enemy => ("ALL ENEMIES DESTROYED", ALL_ENEMIES_BONUS),
            HitKind::Rock => ("ALL ROCKS DESTROYED", ALL_ROCKS_BONUS),
        };
        self.battle_score += bonus;
        self.notify(text, bonus, true, now);
        log::info!("{} (+{})", text, bonus);
        bonus
    }

    pub fn add_stardust(&mut self, now: Duration) {
        self.stardust += 1;
        self.notify("STARDUST", 1, true, now);
    }

    /// Drop expired notifications and let the combo decay.
    pub fn tick(&mut self, now: Duration) {
        self.notifications.retain(|n| n.expires_at > now);
        self.combo.tick(now);
    }

    /// Clear score, combo and notifications. Stardust is kept across runs.
    pub fn reset(&mut self) {
        self.battle_score = 0;
        self.combo.reset();
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn single_hits_score_base_points() {
        let mut score = ScoreBoard::new(ms(2000));
        assert_eq!(score.register_hit(1, HitKind::Rock, ms(0)), 10);
        assert_eq!(score.register_hit(1, HitKind::Enemy, ms(5000)), 150);
        assert_eq!(score.battle_score, 160);
        assert_eq!(score.notifications().len(), 2);
    }

    #[test]
    fn combo_bonuses_grow_inside_window() {
        let mut score = ScoreBoard::new(ms(2000));
        score.register_hit(1, HitKind::Rock, ms(0));
        score.register_hit(1, HitKind::Rock, ms(500));
        // third hit: 3 * 25
        assert_eq!(score.register_hit(1, HitKind::Rock, ms(1000)), 10 + 75);
        score.register_hit(1, HitKind::Rock, ms(1500));
        // fifth hit: 5 * 50
        assert_eq!(score.register_hit(1, HitKind::Rock, ms(2000)), 10 + 250);
        assert_eq!(score.combo.count, 5);
    }

    #[test]
    fn combo_resets_after_window() {
        let mut score = ScoreBoard::new(ms(2000));
        score.register_hit(2, HitKind::Rock, ms(0));
        score.tick(ms(1999));
        assert!(score.combo.active);
        score.tick(ms(2000));
        assert!(!score.combo.active);
        assert_eq!(score.combo.count, 0);
        // a late hit starts a new combo without bonus
        assert_eq!(score.register_hit(1, HitKind::Rock, ms(2600)), 10);
        assert_eq!(score.combo.count, 1);
    }

    #[test]
    fn rescheduling_keeps_one_pending_expiry() {
        let mut combo = ComboSystem::new(ms(2000));
        combo.register(1, ms(0));
        combo.register(1, ms(1500));
        // the first deadline (2000) was cancelled
        assert!(!combo.tick(ms(2100)));
        assert!(combo.tick(ms(3500)));
        assert!(!combo.tick(ms(9000)));
    }

    #[test]
    fn notifications_expire_after_three_seconds() {
        let mut score = ScoreBoard::new(ms(2000));
        score.notify("HELLO", 0, false, ms(100));
        score.tick(ms(3099));
        assert_eq!(score.notifications().len(), 1);
        score.tick(ms(3100));
        assert!(score.notifications().is_empty());
    }

    #[test]
    fn clear_bonuses_and_stardust() {
        let mut score = ScoreBoard::new(ms(2000));
        assert_eq!(score.award_clear_bonus(HitKind::Enemy, ms(0)), 800);
        assert_eq!(score.award_clear_bonus(HitKind::Rock, ms(0)), 1500);
        score.add_stardust(ms(0));
        assert_eq!(score.battle_score, 2300);
        score.reset();
        assert_eq!(score.battle_score, 0);
        assert_eq!(score.stardust, 1);
    }
}
