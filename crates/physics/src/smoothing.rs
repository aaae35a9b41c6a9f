//! Critically damped smoothing for camera parameters.

/// A scalar that follows a target through a critically damped spring.
///
/// Never overshoots the target, so a clamped target keeps the value inside
/// the same range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothDamp {
    pub value: f32,
    pub target: f32,
    velocity: f32,
    /// Approximate time (seconds) to reach the target.
    smooth_time: f32,
}

impl SmoothDamp {
    pub fn new(value: f32, smooth_time: f32) -> Self {
        Self {
            value,
            target: value,
            velocity: 0.0,
            smooth_time: smooth_time.max(1e-4),
        }
    }

    /// Jump straight to `value` and stop moving.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn update(&mut self, dt: f32) -> f32 {
        if dt <= 0.0 {
            return self.value;
        }
        let omega = 2.0 / self.smooth_time;
        let x = omega * dt;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.value - self.target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut output = self.target + (change + temp) * decay;

        // don't pass the target
        if (self.target - self.value > 0.0) == (output > self.target) {
            output = self.target;
            self.velocity = 0.0;
        }
        self.value = output;
        output
    }
}
