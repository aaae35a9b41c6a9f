//! Closed parametric curves with arc-length sampling and Frenet frames.

use glam::{Mat3, Vec3};

/// Divisions used for the cumulative arc-length table.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// A parametric curve defined on `t ∈ [0, 1]`.
pub trait Curve {
    /// Point at raw curve parameter `t` (not arc-length uniform).
    fn point(&self, t: f32) -> Vec3;
}

/// The "granny knot" closed curve.
#[derive(Debug, Clone, Copy)]
pub struct GrannyKnot {
    pub radius: f32,
}

impl Default for GrannyKnot {
    fn default() -> Self {
        Self { radius: 20.0 }
    }
}

impl Curve for GrannyKnot {
    fn point(&self, t: f32) -> Vec3 {
        let t = std::f32::consts::TAU * t;
        let x = -0.22 * t.cos() - 1.28 * t.sin() - 0.44 * (3.0 * t).cos() - 0.78 * (3.0 * t).sin();
        let y = -0.1 * (2.0 * t).cos() - 0.27 * (2.0 * t).sin() + 0.38 * (4.0 * t).cos()
            + 0.46 * (4.0 * t).sin();
        let z = 0.7 * (3.0 * t).cos() - 0.4 * (3.0 * t).sin();
        Vec3::new(x, y, z) * self.radius
    }
}

/// Any curve stretched per axis. The track uses a granny knot widened to
/// leave room for props around the ship.
#[derive(Debug, Clone, Copy)]
pub struct Stretched<C> {
    pub inner: C,
    pub factors: Vec3,
}

impl<C: Curve> Curve for Stretched<C> {
    fn point(&self, t: f32) -> Vec3 {
        self.inner.point(t) * self.factors
    }
}

/// The widened knot the tour flies along.
pub fn wide_granny_knot() -> Stretched<GrannyKnot> {
    Stretched {
        inner: GrannyKnot::default(),
        factors: Vec3::new(1.6, 1.3, 1.15),
    }
}

/// Orthonormal moving frame at one segment boundary of the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetFrame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// A curve with a cached arc-length table, so it can be sampled uniformly by
/// distance travelled.
#[derive(Debug, Clone)]
pub struct ArcLengthCurve<C> {
    curve: C,
    /// Cumulative length at each of the `ARC_LENGTH_DIVISIONS + 1` samples.
    lengths: Vec<f32>,
}

impl<C: Curve> ArcLengthCurve<C> {
    pub fn new(curve: C) -> Self {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = curve.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for p in 1..=ARC_LENGTH_DIVISIONS {
            let current = curve.point(p as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        Self { curve, lengths }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Total length of the curve.
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Map an arc-length fraction `u` to the raw curve parameter.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let last = self.lengths.len() - 1;
        let target = u.clamp(0.0, 1.0) * self.length();

        // index of the last table entry strictly below the target
        let i = self.lengths.partition_point(|&l| l < target);
        if i == 0 {
            return 0.0;
        }
        let i = i - 1;
        if i >= last {
            return 1.0;
        }

        let before = self.lengths[i];
        let segment = self.lengths[i + 1] - before;
        if segment <= 0.0 {
            return i as f32 / last as f32;
        }
        let fraction = (target - before) / segment;
        (i as f32 + fraction) / last as f32
    }

    /// Point at arc-length fraction `u`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.curve.point(self.u_to_t(u))
    }

    /// Unit tangent at raw parameter `t` by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        const DELTA: f32 = 0.0001;
        let t1 = (t - DELTA).max(0.0);
        let t2 = (t + DELTA).min(1.0);
        (self.curve.point(t2) - self.curve.point(t1)).normalize_or_zero()
    }

    /// Unit tangent at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.tangent(self.u_to_t(u))
    }

    /// Parallel-transport frames at `segments + 1` evenly spaced arc-length
    /// positions. For closed curves the accumulated twist is spread across
    /// all segments so the first and last frame agree.
    pub fn frenet_frames(&self, segments: usize, closed: bool) -> Vec<FrenetFrame> {
        let tangents: Vec<Vec3> = (0..=segments)
            .map(|i| self.tangent_at(i as f32 / segments as f32))
            .collect();

        // initial normal: the axis the first tangent is least aligned with
        let t0 = tangents[0];
        let mut min = f32::MAX;
        let mut axis = Vec3::X;
        for candidate in [Vec3::X, Vec3::Y, Vec3::Z] {
            let component = t0.dot(candidate).abs();
            if component <= min {
                min = component;
                axis = candidate;
            }
        }
        let vec = t0.cross(axis).normalize();

        let mut normals = Vec::with_capacity(segments + 1);
        let mut binormals = Vec::with_capacity(segments + 1);
        normals.push(t0.cross(vec));
        binormals.push(t0.cross(normals[0]));

        for i in 1..=segments {
            let mut normal = normals[i - 1];
            let vec = tangents[i - 1].cross(tangents[i]);
            if vec.length() > f32::EPSILON {
                let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
                normal = Mat3::from_axis_angle(vec.normalize(), theta) * normal;
            }
            normals.push(normal);
            binormals.push(tangents[i].cross(normal));
        }

        if closed {
            let mut theta = normals[0].dot(normals[segments]).clamp(-1.0, 1.0).acos() / segments as f32;
            if tangents[0].dot(normals[0].cross(normals[segments])) > 0.0 {
                theta = -theta;
            }
            for i in 1..=segments {
                normals[i] = Mat3::from_axis_angle(tangents[i], theta * i as f32) * normals[i];
                binormals[i] = tangents[i].cross(normals[i]);
            }
        }

        tangents
            .into_iter()
            .zip(normals)
            .zip(binormals)
            .map(|((tangent, normal), binormal)| FrenetFrame {
                tangent,
                normal,
                binormal,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granny_knot_is_closed() {
        let knot = wide_granny_knot();
        assert!(knot.point(0.0).distance(knot.point(1.0)) < 1e-3);
    }

    #[test]
    fn arc_length_mapping_hits_endpoints_and_is_monotonic() {
        let curve = ArcLengthCurve::new(wide_granny_knot());
        assert_eq!(curve.u_to_t(0.0), 0.0);
        assert!((curve.u_to_t(1.0) - 1.0).abs() < 1e-4);
        let mut last = 0.0;
        for i in 1..50 {
            let t = curve.u_to_t(i as f32 / 50.0);
            assert!(t > last);
            last = t;
        }
    }

    #[test]
    fn equal_arc_steps_cover_equal_distances() {
        let curve = ArcLengthCurve::new(wide_granny_knot());
        let step = curve.length() / 100.0;
        for i in [5, 37, 80] {
            let a = curve.point_at(i as f32 / 100.0);
            let b = curve.point_at((i + 1) as f32 / 100.0);
            // chord is never longer than the arc, and close to it for small steps
            let chord = a.distance(b);
            assert!(chord <= step * 1.01);
            assert!(chord > step * 0.9);
        }
    }

    #[test]
    fn frenet_frames_are_orthonormal() {
        let curve = ArcLengthCurve::new(wide_granny_knot());
        let frames = curve.frenet_frames(200, true);
        assert_eq!(frames.len(), 201);
        for frame in frames.iter().step_by(17) {
            assert!((frame.tangent.length() - 1.0).abs() < 1e-3);
            assert!((frame.binormal.length() - 1.0).abs() < 1e-2);
            assert!(frame.tangent.dot(frame.normal).abs() < 1e-2);
            assert!(frame.tangent.dot(frame.binormal).abs() < 1e-2);
        }
    }
}
