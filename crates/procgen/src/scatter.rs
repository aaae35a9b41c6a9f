//! Random scatter of rocks, enemies and dust particles around the track.

use crate::spline::Curve;
use crate::track::TrackSampler;
use glam::Vec3;
use rand::Rng;

/// Parameters for one scatter pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterSpec {
    pub count: usize,
    /// Horizontal spread around the track point; vertical spread is half of it.
    pub radius: f32,
    /// Nominal object size before scaling.
    pub size: f32,
    pub scale_min: f32,
    pub scale_spread: f32,
}

impl ScatterSpec {
    pub const fn new(count: usize, radius: f32, size: f32, scale_min: f32, scale_spread: f32) -> Self {
        Self {
            count,
            radius,
            size,
            scale_min,
            scale_spread,
        }
    }

    /// Battle-mode asteroid field.
    pub const fn rocks(count: usize) -> Self {
        Self::new(count, 150.0, 8.0, 1.0, 3.0)
    }

    /// Enemy ships hugging the track.
    pub const fn enemies(count: usize) -> Self {
        Self::new(count, 20.0, 15.0, 1.0, 1.5)
    }

    /// Background dust.
    pub const fn particles(count: usize) -> Self {
        Self::new(count, 100.0, 1.0, 0.5, 0.8)
    }
}

/// One scattered object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterObject {
    pub guid: u64,
    pub scale: f32,
    pub size: f32,
    /// World position of the object.
    pub offset: Vec3,
    /// Track point the object was scattered around.
    pub anchor: Vec3,
    pub speed: f32,
    pub radius: f32,
    pub t: f32,
    pub rotation: Vec3,
}

impl ScatterObject {
    /// Half extent of the hit box.
    pub fn half_size(&self) -> f32 {
        self.size * self.scale / 2.0
    }
}

/// Scatter `layout.count` objects at random track parameters. `next_guid` is
/// advanced once per object so ids stay unique across passes.
pub fn scatter<C: Curve, R: Rng>(
    track: &TrackSampler<C>,
    layout: ScatterSpec,
    next_guid: &mut u64,
    rng: &mut R,
) -> Vec<ScatterObject> {
    let radius = layout.radius;
    (0..layout.count)
        .map(|_| {
            let t = rng.gen::<f32>();
            let anchor = track.position(t);

            // full spread horizontally, half spread vertically so fewer
            // objects end up far below the track
            let spread = Vec3::new(
                -radius + rng.gen::<f32>() * radius * 2.0,
                -radius / 2.0 + rng.gen::<f32>() * radius,
                -radius + rng.gen::<f32>() * radius * 2.0,
            );

            let guid = *next_guid;
            *next_guid += 1;

            ScatterObject {
                guid,
                scale: layout.scale_min + rng.gen::<f32>() * layout.scale_spread,
                size: layout.size,
                offset: anchor + spread,
                anchor,
                speed: 1.0 + rng.gen::<f32>(),
                radius,
                t,
                rotation: Vec3::new(rng.gen(), rng.gen(), rng.gen()),
            }
        })
        .collect()
}
