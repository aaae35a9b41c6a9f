//! Inertial spring model that turns pointer targets into smooth ship motion.

use glam::{Vec2, Vec3};

/// Default response-curve exponent for pointer input.
pub const DEFAULT_RESPONSE_CURVE: f32 = 0.75;
/// Default damping applied by [`ShipPhysics::reset_forces`].
pub const DEFAULT_RESET_DAMPING: f32 = 0.9;

/// Spring constants shared by every degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub mass: f32,
    /// Velocity retained each step (air resistance).
    pub damping: f32,
    /// Pull toward the target per unit of displacement.
    pub return_force: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 0.85,
            return_force: 0.03,
        }
    }
}

/// Ship pose relative to its track anchor. Only x/y of `position` are driven
/// by the spring; z carries the float effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipPose {
    pub position: Vec3,
    /// XYZ Euler angles.
    pub rotation: Vec3,
}

/// Velocity of the five driven degrees of freedom.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipControlState {
    pub position: Vec2,
    pub rotation: Vec3,
}

/// Motion summary for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsMetrics {
    pub linear_speed: f32,
    pub rotational_speed: f32,
    pub is_stable: bool,
}

/// Screen-space bounds outside which the ship counts as colliding.
const BOUNDS: f32 = 100.0;

/// Map a normalized input in [-1, 1] through `sign(v)·|v|^exponent`.
///
/// Exponents above 1 soften the center of the range, below 1 the edges.
pub fn apply_response_curve(value: f32, exponent: f32) -> f32 {
    if value == 0.0 {
        return 0.0;
    }
    value.signum() * value.abs().powf(exponent)
}

#[derive(Debug, Clone, Default)]
pub struct ShipPhysics {
    params: SpringParams,
    velocity: ShipControlState,
}

impl ShipPhysics {
    pub fn new(params: SpringParams) -> Self {
        log::debug!("Ship physics initialized: {:?}", params);
        Self {
            params,
            velocity: ShipControlState::default(),
        }
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn state(&self) -> &ShipControlState {
        &self.velocity
    }

    /// Advance one frame: spring every driven axis of `pose` toward its target.
    pub fn update_physics(&mut self, pose: &mut ShipPose, target_position: Vec2, target_rotation: Vec3) {
        let SpringParams {
            mass,
            damping,
            return_force,
        } = self.params;

        let position_force = (target_position - pose.position.truncate()) * return_force;
        self.velocity.position = self.velocity.position * damping + position_force / mass;
        pose.position.x += self.velocity.position.x;
        pose.position.y += self.velocity.position.y;

        let rotation_force = (target_rotation - pose.rotation) * return_force;
        self.velocity.rotation = self.velocity.rotation * damping + rotation_force / mass;
        pose.rotation += self.velocity.rotation;
    }

    /// Bleed off velocity so the ship doesn't keep drifting after a mode change.
    pub fn reset_forces(&mut self, damping: f32) {
        self.velocity.position *= damping;
        self.velocity.rotation *= damping;
    }

    /// True when the pose has left the allowed screen-space box.
    pub fn check_collision_bounds(&self, pose: &ShipPose) -> bool {
        let p = pose.position;
        let outside = p.x.abs() > BOUNDS || p.y.abs() > BOUNDS;
        if outside {
            log::debug!("Ship outside bounds at ({:.2}, {:.2})", p.x, p.y);
        }
        outside
    }

    pub fn metrics(&self) -> PhysicsMetrics {
        let linear_speed = self.velocity.position.length();
        let rotational_speed = self.velocity.rotation.length();
        PhysicsMetrics {
            linear_speed,
            rotational_speed,
            is_stable: linear_speed < 0.001 && rotational_speed < 0.001,
        }
    }
}
