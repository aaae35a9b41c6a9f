//! Points of interest along the track and their orbit-camera parameters.

use procgen::positions;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointOfInterest {
    PetersenGraph,
    Chainweb3d,
    SpaceStation,
    SpaceProbe,
}

/// Static camera parameters for one point of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoiInfo {
    pub name: &'static str,
    /// Track parameter the orbit is centered on.
    pub track_position: f32,
    pub orbit_distance: f32,
    /// Orbit angle advance per frame, in radians.
    pub orbit_speed: f32,
}

impl PointOfInterest {
    pub const ALL: [PointOfInterest; 4] = [
        PointOfInterest::PetersenGraph,
        PointOfInterest::Chainweb3d,
        PointOfInterest::SpaceStation,
        PointOfInterest::SpaceProbe,
    ];

    pub fn info(self) -> PoiInfo {
        match self {
            PointOfInterest::PetersenGraph => PoiInfo {
                name: "Petersen Graph",
                track_position: positions::PETERSEN_GRAPH[0],
                orbit_distance: 50.0,
                orbit_speed: 0.002,
            },
            PointOfInterest::Chainweb3d => PoiInfo {
                name: "Chainweb 3D",
                track_position: positions::CHAINWEB_3D,
                orbit_distance: 120.0,
                orbit_speed: 0.0015,
            },
            PointOfInterest::SpaceStation => PoiInfo {
                name: "Space Station",
                track_position: positions::SPACE_STATION,
                orbit_distance: 80.0,
                orbit_speed: 0.001,
            },
            PointOfInterest::SpaceProbe => PoiInfo {
                name: "Space Probe",
                track_position: positions::SPACE_PROBE,
                orbit_distance: 100.0,
                orbit_speed: 0.001,
            },
        }
    }

    /// The point of interest closest along the track to `t`, wrapping at 1.
    pub fn nearest(t: f32) -> PointOfInterest {
        let distance = |poi: PointOfInterest| {
            let d = (poi.info().track_position - t.rem_euclid(1.0)).abs();
            d.min(1.0 - d)
        };
        let mut best = PointOfInterest::PetersenGraph;
        for poi in Self::ALL {
            if distance(poi) < distance(best) {
                best = poi;
            }
        }
        best
    }
}

impl fmt::Display for PointOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}
