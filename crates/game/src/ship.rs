//! Ship steering: pointer position to spring targets, observation recentering,
//! the idle float effect, and the targeting ray.

use std::f32::consts::PI;

use engine_core::{basis_from_euler_xyz, Quat, Vec3};
use glam::Vec2;
use physics::{apply_response_curve, ShipPhysics, ShipPose, TargetingRay, DEFAULT_RESET_DAMPING};
use procgen::Placement;

use crate::config::ShipControls;

#[derive(Debug, Clone)]
pub struct ShipController {
    controls: ShipControls,
    physics: ShipPhysics,
    pose: ShipPose,
}

impl ShipController {
    pub fn new(controls: ShipControls) -> Self {
        Self {
            physics: ShipPhysics::new(controls.spring()),
            pose: Self::rest_pose(&controls),
            controls,
        }
    }

    fn rest_pose(controls: &ShipControls) -> ShipPose {
        ShipPose {
            position: Vec3::new(0.0, controls.offset_y, 0.0),
            rotation: Vec3::ZERO,
        }
    }

    pub fn pose(&self) -> ShipPose {
        self.pose
    }

    pub fn physics(&self) -> &ShipPhysics {
        &self.physics
    }

    /// Back to the rest pose with no velocity.
    pub fn reset(&mut self) {
        self.physics = ShipPhysics::new(self.controls.spring());
        self.pose = Self::rest_pose(&self.controls);
    }

    pub fn reset_forces(&mut self, damping: f32) {
        self.physics.reset_forces(damping);
    }

    /// One flight frame. `mouse` is the pointer offset from the viewport
    /// center in pixels (y down).
    pub fn fly(&mut self, mouse: Vec2, viewport: Vec2) {
        let half = (viewport / 2.0).max(Vec2::ONE);
        let normalized = (mouse / half).clamp(Vec2::NEG_ONE, Vec2::ONE);
        let c = &self.controls;
        let x = apply_response_curve(normalized.x, c.response_curve);
        let y = apply_response_curve(normalized.y, c.response_curve);

        let target_position = Vec2::new(x * c.range_x, -y * c.range_y + c.offset_y);
        let target_rotation = Vec3::new(-y * c.pitch_factor, -x * c.yaw_factor, x * c.bank_factor);
        self.physics.update_physics(&mut self.pose, target_position, target_rotation);
    }

    /// One observation frame: ease back to a level pose at observation
    /// height with a slow hover, and bleed off spring velocity.
    pub fn observe(&mut self, time_seconds: f32) {
        let c = &self.controls;
        let rate = c.observation_reset_rate;
        let hover = (time_seconds / c.hover_period).sin() * c.hover_amplitude;

        let pose = &mut self.pose;
        pose.position.x += (0.0 - pose.position.x) * rate;
        pose.position.y += (c.observation_height + hover - pose.position.y) * rate;
        pose.rotation += (Vec3::ZERO - pose.rotation) * rate;

        self.physics.reset_forces(DEFAULT_RESET_DAMPING);
    }

    /// Small fore/aft bob while flying.
    pub fn float_effect(&mut self, time_seconds: f32) {
        let c = &self.controls;
        self.pose.position.z = (time_seconds * c.float_frequency).sin() * PI * c.float_amplitude;
    }

    /// World-space orientation of the ship riding `track`.
    pub fn world_rotation(&self, track: &Placement) -> Quat {
        let local = Quat::from_mat3(&basis_from_euler_xyz(self.pose.rotation));
        track.rotation() * local
    }

    pub fn world_position(&self, track: &Placement) -> Vec3 {
        track.position + track.rotation() * self.pose.position
    }

    /// Ray from the ship's nose along its forward (-Z) axis.
    pub fn targeting_ray(&self, track: &Placement) -> TargetingRay {
        let direction = self.world_rotation(track) * Vec3::NEG_Z;
        TargetingRay::new(self.world_position(track), direction)
    }

    pub fn out_of_bounds(&self) -> bool {
        self.physics.check_collision_bounds(&self.pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Mat3;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    fn level_track() -> Placement {
        Placement {
            position: Vec3::new(0.0, 0.0, 0.0),
            basis: Mat3::IDENTITY,
            euler: Vec3::ZERO,
        }
    }

    #[test]
    fn centered_pointer_settles_at_offset_height() {
        let mut ship = ShipController::new(ShipControls::default());
        for _ in 0..600 {
            ship.fly(Vec2::ZERO, VIEWPORT);
        }
        let pose = ship.pose();
        assert!(pose.position.x.abs() < 1e-3);
        assert!((pose.position.y - 10.0).abs() < 1e-3);
        assert!(pose.rotation.length() < 1e-3);
    }

    #[test]
    fn pointer_right_banks_and_moves_right() {
        let mut ship = ShipController::new(ShipControls::default());
        for _ in 0..600 {
            ship.fly(Vec2::new(640.0, 0.0), VIEWPORT);
        }
        let pose = ship.pose();
        assert!((pose.position.x - 45.0).abs() < 0.01);
        assert!((pose.rotation.z - 0.4).abs() < 0.01);
        assert!((pose.rotation.y + 0.2).abs() < 0.01);
    }

    #[test]
    fn pointer_beyond_viewport_is_clamped() {
        let mut ship = ShipController::new(ShipControls::default());
        for _ in 0..600 {
            ship.fly(Vec2::new(0.0, 5000.0), VIEWPORT);
        }
        // full downward deflection: -range_y + offset_y
        assert!((ship.pose().position.y + 20.0).abs() < 0.01);
        assert!(!ship.out_of_bounds());
    }

    #[test]
    fn observation_recenters_and_hovers() {
        let mut ship = ShipController::new(ShipControls::default());
        for _ in 0..60 {
            ship.fly(Vec2::new(640.0, 360.0), VIEWPORT);
        }
        for frame in 0..600 {
            ship.observe(frame as f32 / 60.0);
        }
        let pose = ship.pose();
        assert!(pose.position.x.abs() < 0.01);
        assert!((pose.position.y - 25.0).abs() < 0.4);
        assert!(pose.rotation.length() < 0.01);
        assert!(ship.physics().metrics().linear_speed < 1e-6);
    }

    #[test]
    fn targeting_ray_points_down_the_track() {
        let ship = ShipController::new(ShipControls::default());
        let ray = ship.targeting_ray(&level_track());
        let hit = ray.cast_cube(Vec3::new(0.0, 10.0, -50.0), 2.0, 1000.0);
        assert!(hit.is_some());
        let miss = ray.cast_cube(Vec3::new(0.0, 10.0, 50.0), 2.0, 1000.0);
        assert!(miss.is_none());
    }
}
