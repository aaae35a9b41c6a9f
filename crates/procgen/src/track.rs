//! Track sampling: world-space position and orientation at a path parameter.

use crate::spline::{wide_granny_knot, ArcLengthCurve, Curve, FrenetFrame, Stretched, GrannyKnot};
use engine_core::{euler_xyz_from_basis, look_at_basis, Transform, TransformRaw};
use glam::{Mat3, Quat, Vec3};

/// Tube segments used for the track frames.
pub const TRACK_SEGMENTS: usize = 200;
/// World units per curve unit.
pub const DEFAULT_TRACK_SCALE: f32 = 15.0;

/// Well-known track parameters where content is placed.
pub mod positions {
    pub const START: f32 = 0.0;
    pub const PETERSEN_GRAPH: [f32; 4] = [0.1, 0.25, 0.55, 0.955];
    pub const CHAINWEB_3D: f32 = 0.4;
    pub const WARP_BEGIN: f32 = 0.3;
    pub const WARP_END: f32 = 0.4;
    pub const WARP_RESET: f32 = 0.5;
    pub const RINGS: f32 = 0.65;
    pub const SPACE_STATION: f32 = 0.79;
    pub const SPACE_PROBE: f32 = 0.86;
}

/// Position and orientation of something placed on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Rotation basis (columns are local X, Y, Z).
    pub basis: Mat3,
    /// XYZ Euler angles extracted from `basis`.
    pub euler: Vec3,
}

impl Placement {
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&self.basis).normalize()
    }

    /// Direction the placed object faces (local -Z).
    pub fn forward(&self) -> Vec3 {
        -self.basis.z_axis
    }

    pub fn to_transform(&self, scale: f32) -> Transform {
        Transform::from_basis(self.position, self.basis, scale)
    }

    pub fn to_raw(&self, scale: f32) -> TransformRaw {
        TransformRaw::from(self.to_transform(scale))
    }
}

/// Samples a closed curve by arc length and orients objects along it.
#[derive(Debug, Clone)]
pub struct TrackSampler<C = Stretched<GrannyKnot>> {
    path: ArcLengthCurve<C>,
    frames: Vec<FrenetFrame>,
    scale: f32,
}

impl TrackSampler {
    /// The standard tour track.
    pub fn granny_knot(scale: f32) -> Self {
        Self::new(wide_granny_knot(), TRACK_SEGMENTS, scale)
    }
}

impl<C: Curve> TrackSampler<C> {
    pub fn new(curve: C, segments: usize, scale: f32) -> Self {
        let path = ArcLengthCurve::new(curve);
        let frames = path.frenet_frames(segments, true);
        log::debug!(
            "Track built: length {:.1}, {} frames, scale {}",
            path.length(),
            frames.len(),
            scale
        );
        Self { path, frames, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Unscaled path length.
    pub fn length(&self) -> f32 {
        self.path.length()
    }

    pub fn frames(&self) -> &[FrenetFrame] {
        &self.frames
    }

    /// World position at `t`, wrapped into `[0, 1)`.
    pub fn position(&self, t: f32) -> Vec3 {
        self.path.point_at(wrap(t)) * self.scale
    }

    /// Frame of the segment containing `t`.
    pub fn frame(&self, t: f32) -> &FrenetFrame {
        let n = self.frames.len();
        let pick = (wrap(t) * n as f32).floor() as usize % n;
        &self.frames[pick]
    }

    /// Place an object at `t` facing along the track.
    pub fn sample(&self, t: f32) -> Placement {
        self.sample_with(t, 0.0, None)
    }

    /// Place an object at `t`, pushed `offset` units along the binormal, with an
    /// optional rotation applied in the object's local frame.
    pub fn sample_with(&self, t: f32, offset: f32, adjust: Option<Mat3>) -> Placement {
        let t = wrap(t);
        let mut position = self.position(t);
        let ahead = self.position(t + 1.0 / self.path.length());
        let up = self.frame(t).binormal;

        let mut basis = look_at_basis(position, ahead, up);
        if let Some(adjust) = adjust {
            basis *= adjust;
        }
        let euler = euler_xyz_from_basis(&basis);

        if offset != 0.0 {
            position += up * offset;
        }

        Placement {
            position,
            basis,
            euler,
        }
    }
}

/// Wrap a path parameter into `[0, 1)`.
pub fn wrap(t: f32) -> f32 {
    let w = t.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// True when `player_t` is within `range` of `target_t`, measured around the loop.
pub fn within_range(player_t: f32, target_t: f32, range: f32) -> bool {
    let diff = (wrap(player_t) - wrap(target_t)).abs();
    diff.min(1.0 - diff) < range
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> TrackSampler {
        TrackSampler::granny_knot(DEFAULT_TRACK_SCALE)
    }

    #[test]
    fn sample_is_periodic() {
        let track = sampler();
        for t in [0.25_f32, 0.5, 0.75] {
            let a = track.sample(t);
            let b = track.sample(t + 1.0);
            let c = track.sample(t - 1.0);
            assert!(a.position.distance(b.position) < 1e-2);
            assert!(a.position.distance(c.position) < 1e-2);
            assert!(a.euler.distance(c.euler) < 1e-3);
        }
    }

    #[test]
    fn placement_faces_along_the_track() {
        let track = sampler();
        let t = 0.42;
        let p = track.sample(t);
        let ahead = track.position(t + 0.005);
        let travel = (ahead - p.position).normalize();
        assert!(p.forward().dot(travel) > 0.9);
    }

    #[test]
    fn offset_moves_along_binormal() {
        let track = sampler();
        let base = track.sample(0.79);
        let shifted = track.sample_with(0.79, 100.0, None);
        let delta = shifted.position - base.position;
        assert!((delta.length() - 100.0).abs() < 1e-2);
        assert!(delta.normalize().dot(track.frame(0.79).binormal) > 0.999);
        assert_eq!(base.basis, shifted.basis);
    }

    #[test]
    fn adjustment_is_applied_in_local_frame() {
        let track = sampler();
        let turn = Mat3::from_rotation_y(std::f32::consts::PI);
        let plain = track.sample(0.3);
        let turned = track.sample_with(0.3, 0.0, Some(turn));
        assert!((plain.forward() + turned.forward()).length() < 1e-3);
    }

    #[test]
    fn range_check_wraps_around_the_loop() {
        assert!(within_range(0.98, 0.02, 0.05));
        assert!(within_range(0.5, 0.45, 0.15));
        assert!(!within_range(0.2, 0.6, 0.15));
    }

    #[test]
    fn wrap_stays_in_unit_interval() {
        assert_eq!(wrap(1.0), 0.0);
        assert!((wrap(-0.25) - 0.75).abs() < 1e-6);
        assert!(wrap(-1e-9) < 1.0);
    }
}
