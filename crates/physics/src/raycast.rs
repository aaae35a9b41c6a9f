//! Ray-vs-box queries for laser targeting.

use engine_core::Vec3;
use rapier3d::parry::bounding_volume::Aabb;
use rapier3d::parry::query::RayCast;
use rapier3d::prelude::*;

/// How far the targeting ray reaches.
pub const DEFAULT_TARGETING_RANGE: f32 = 10_000.0;

/// Where a ray entered a target box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

/// A ray in world space; the direction need not be normalized but distances
/// are reported in units of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetingRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl TargetingRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Cast against an axis-aligned cube centered at `center` with the given
    /// half extent. A ray starting inside the cube hits at distance 0.
    pub fn cast_cube(&self, center: Vec3, half_size: f32, max_distance: f32) -> Option<RayHit> {
        if self.direction == Vec3::ZERO {
            return None;
        }
        let min = center - Vec3::splat(half_size);
        let max = center + Vec3::splat(half_size);
        let aabb = Aabb::new(point![min.x, min.y, min.z], point![max.x, max.y, max.z]);
        let ray = Ray::new(
            point![self.origin.x, self.origin.y, self.origin.z],
            vector![self.direction.x, self.direction.y, self.direction.z],
        );

        aabb.cast_local_ray(&ray, max_distance, true).map(|toi| {
            let point = ray.point_at(toi);
            RayHit {
                distance: toi,
                point: Vec3::new(point.x, point.y, point.z),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_cube_in_front() {
        let ray = TargetingRay::new(Vec3::ZERO, -Vec3::Z);
        let hit = ray.cast_cube(Vec3::new(0.5, 0.0, -20.0), 2.0, DEFAULT_TARGETING_RANGE);
        let hit = hit.expect("cube in front should be hit");
        assert!((hit.distance - 18.0).abs() < 1e-3);
        assert!((hit.point.z + 18.0).abs() < 1e-3);
    }

    #[test]
    fn ray_misses_cube_behind_or_beside() {
        let ray = TargetingRay::new(Vec3::ZERO, -Vec3::Z);
        assert!(ray.cast_cube(Vec3::new(0.0, 0.0, 20.0), 2.0, DEFAULT_TARGETING_RANGE).is_none());
        assert!(ray.cast_cube(Vec3::new(5.0, 0.0, -20.0), 2.0, DEFAULT_TARGETING_RANGE).is_none());
    }

    #[test]
    fn ray_out_of_range_misses() {
        let ray = TargetingRay::new(Vec3::ZERO, Vec3::X);
        assert!(ray.cast_cube(Vec3::new(100.0, 0.0, 0.0), 1.0, 50.0).is_none());
    }
}
