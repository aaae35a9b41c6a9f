//! Observation orbit camera: circles a fixed center, steered by pointer drag
//! and wheel zoom, with every parameter smoothed.

use std::f32::consts::FRAC_PI_3;

use engine_core::Vec3;
use glam::Vec2;
use physics::SmoothDamp;

use crate::config::OrbitSettings;

/// Orbit height limit in radians, both directions.
pub const MAX_ORBIT_HEIGHT: f32 = FRAC_PI_3;

/// Eye and look-at point for the host camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    settings: OrbitSettings,
    center: Vec3,
    angle: SmoothDamp,
    height: SmoothDamp,
    distance: SmoothDamp,
    /// Angle advance per frame.
    speed: f32,
}

impl OrbitCamera {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            center: Vec3::ZERO,
            angle: SmoothDamp::new(0.0, settings.angle_smooth_time),
            height: SmoothDamp::new(0.0, settings.angle_smooth_time),
            distance: SmoothDamp::new(settings.min_distance, settings.zoom_smooth_time),
            speed: 0.0,
        }
    }

    /// Start a fresh orbit around `center`.
    pub fn setup(&mut self, center: Vec3, distance: f32, speed: f32) {
        self.center = center;
        self.angle.snap(0.0);
        self.height.snap(0.0);
        self.distance.snap(distance.clamp(self.settings.min_distance, self.settings.max_distance));
        self.speed = speed;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn angle(&self) -> f32 {
        self.angle.value
    }

    pub fn height(&self) -> f32 {
        self.height.value
    }

    pub fn distance(&self) -> f32 {
        self.distance.value
    }

    pub fn target_distance(&self) -> f32 {
        self.distance.target
    }

    /// Apply a pointer drag in pixels. Horizontal motion orbits, vertical
    /// motion changes height.
    pub fn drag(&mut self, delta: Vec2) {
        let sensitivity = self.settings.drag_sensitivity;
        self.angle.target += delta.x * sensitivity;
        self.height.target =
            (self.height.target + delta.y * sensitivity).clamp(-MAX_ORBIT_HEIGHT, MAX_ORBIT_HEIGHT);
    }

    /// Wheel zoom: positive `delta_y` (scroll down) moves away.
    pub fn zoom(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let step = self.settings.zoom_step * delta_y.signum();
        self.distance.target =
            (self.distance.target + step).clamp(self.settings.min_distance, self.settings.max_distance);
    }

    /// Advance one frame: the orbit keeps turning by its speed, then every
    /// parameter eases toward its target. Returns the new eye position.
    pub fn update(&mut self, dt: f32) -> Vec3 {
        self.angle.target += self.speed;
        self.angle.update(dt);
        self.height.update(dt);
        self.height.value = self.height.value.clamp(-MAX_ORBIT_HEIGHT, MAX_ORBIT_HEIGHT);
        self.distance.update(dt);
        self.eye()
    }

    pub fn eye(&self) -> Vec3 {
        let (d, a, h) = (self.distance.value, self.angle.value, self.height.value);
        self.center + Vec3::new(d * h.cos() * a.cos(), d * h.sin(), d * h.cos() * a.sin())
    }

    pub fn view(&self, fov_degrees: f32) -> CameraView {
        CameraView {
            eye: self.eye(),
            target: self.center,
            fov_degrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn orbit() -> OrbitCamera {
        let mut orbit = OrbitCamera::new(OrbitSettings::default());
        orbit.setup(Vec3::new(10.0, 0.0, -5.0), 80.0, 0.001);
        orbit
    }

    #[test]
    fn eye_starts_on_the_x_axis_at_distance() {
        let orbit = orbit();
        let eye = orbit.eye();
        assert!((eye - Vec3::new(90.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn height_stays_clamped_under_any_drag() {
        let mut orbit = orbit();
        for i in 0..200 {
            let dy = if i % 3 == 0 { -40.0 } else { 500.0 };
            orbit.drag(Vec2::new(3.0, dy));
            orbit.update(DT);
            assert!(orbit.height().abs() <= MAX_ORBIT_HEIGHT + 1e-6);
        }
        for _ in 0..200 {
            orbit.drag(Vec2::new(0.0, -1000.0));
            orbit.update(DT);
            assert!(orbit.height().abs() <= MAX_ORBIT_HEIGHT + 1e-6);
        }
        assert!((orbit.height() + MAX_ORBIT_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped_and_smoothed() {
        let mut orbit = orbit();
        orbit.zoom(-1.0);
        assert_eq!(orbit.target_distance(), 75.0);
        // smoothing: one frame moves only part of the way
        orbit.update(DT);
        assert!(orbit.distance() < 80.0 && orbit.distance() > 75.0);

        for _ in 0..100 {
            orbit.zoom(120.0);
        }
        assert_eq!(orbit.target_distance(), 200.0);
        for _ in 0..100 {
            orbit.zoom(-3.0);
        }
        assert_eq!(orbit.target_distance(), 30.0);
    }

    #[test]
    fn orbit_advances_by_speed_each_frame() {
        let mut orbit = orbit();
        for _ in 0..600 {
            orbit.update(DT);
        }
        // target has advanced 0.6 rad; the filter lags slightly behind
        assert!(orbit.angle() > 0.5 && orbit.angle() <= 0.6);
        let eye = orbit.eye();
        assert!(((eye - orbit.center()).length() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn drag_rotates_around_center() {
        let mut orbit = orbit();
        orbit.drag(Vec2::new(157.0, 0.0));
        for _ in 0..120 {
            orbit.update(DT);
        }
        assert!(orbit.angle() > 1.5);
    }
}
