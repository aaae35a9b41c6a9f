//! Decorative content laid out along the track: rings, graph props, labels,
//! stations and probes.

use crate::chainweb::ChainwebTopology;
use crate::spline::Curve;
use crate::track::{positions, Placement, TrackSampler};
use glam::{Mat3, Vec3};
use rand::Rng;

/// A prop placed on the track with a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropPlacement {
    pub placement: Placement,
    pub scale: f32,
}

impl PropPlacement {
    /// Map a point from the prop's local frame into the world.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.placement.position + self.placement.basis * (local * self.scale)
    }
}

/// A floating text label placed beside the track.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub placement: Placement,
    pub scale: f32,
    pub text: &'static str,
    pub color: &'static str,
}

/// Where a label goes and what it says.
#[derive(Debug, Clone, Copy)]
pub struct InfoLabel {
    pub t: f32,
    pub text: &'static str,
    pub color: &'static str,
}

pub const INFO_LABELS: [InfoLabel; 13] = [
    InfoLabel { t: 0.095, text: "Petersen Graph", color: "#4286f4" },
    InfoLabel { t: 0.245, text: "Graph Theory", color: "#c67eff" },
    InfoLabel { t: 0.545, text: "Scalable Structure", color: "#4286f4" },
    InfoLabel { t: 0.95, text: "Remarkable Configuration", color: "#c67eff" },
    InfoLabel { t: 0.395, text: "Chainweb", color: "#e6c86e" },
    InfoLabel { t: 0.45, text: "Blockchain", color: "#e6c86e" },
    InfoLabel { t: 0.49, text: "Kadena", color: "#e6c86e" },
    InfoLabel { t: 0.64, text: "3D Visual", color: "#7CFC00" },
    InfoLabel { t: 0.7, text: "Vootaa Lab", color: "#e38846" },
    InfoLabel { t: 0.78, text: "Space Station", color: "#9f7bea" },
    InfoLabel { t: 0.85, text: "Space Probe", color: "#9f7bea" },
    InfoLabel { t: 0.98, text: "Welcome to", color: "#20B2AA" },
    InfoLabel { t: 0.99, text: "Explore Journey", color: "#20B2AA" },
];

/// Labels hang this far below the track, along the binormal.
const LABEL_OFFSET: f32 = -10.0;
const LABEL_SCALE: f32 = 4.5;
/// Stations and probes sit this far off the track.
const LANDMARK_OFFSET: f32 = 100.0;

/// A run of rings starting at `start_t`, one every 0.001 of the track, with a
/// randomized wave in their scale.
pub fn rings<C: Curve, R: Rng>(
    track: &TrackSampler<C>,
    count: usize,
    start_t: f32,
    rng: &mut R,
) -> Vec<PropPlacement> {
    let base_scale = 15.0 + rng.gen::<f32>() * 10.0;
    let scale_variation = 0.5 + rng.gen::<f32>() * 1.5;
    let wave_factor = 0.05 + rng.gen::<f32>() * 0.15;
    let wave_frequency = 0.05 + rng.gen::<f32>() * 0.25;

    let mut t = start_t;
    (0..count)
        .map(|i| {
            t += 0.001;
            let i = i as f32;
            let scale = base_scale
                + i * scale_variation * (i * wave_frequency).sin() * std::f32::consts::FRAC_PI_2
                + rng.gen::<f32>() * wave_factor * base_scale;
            PropPlacement {
                placement: track.sample(t),
                scale,
            }
        })
        .collect()
}

/// Default ring run.
pub fn default_rings<C: Curve, R: Rng>(track: &TrackSampler<C>, rng: &mut R) -> Vec<PropPlacement> {
    rings(track, 40, positions::RINGS, rng)
}

/// Chainweb blocks after `start_t`. Battle mode thins them to a third with
/// triple spacing so they don't crowd the targets.
pub fn chainweb<C: Curve>(
    track: &TrackSampler<C>,
    count: usize,
    start_t: f32,
    battle: bool,
) -> Vec<PropPlacement> {
    let (actual, step_multiplier) = if battle { (count / 3, 3.0) } else { (count, 1.0) };
    let mut t = start_t;
    (0..actual)
        .map(|_| {
            t += 0.004 * step_multiplier;
            PropPlacement {
                placement: track.sample(t),
                scale: 100.0,
            }
        })
        .collect()
}

pub fn petersen_graphs<C: Curve>(track: &TrackSampler<C>) -> Vec<PropPlacement> {
    positions::PETERSEN_GRAPH
        .iter()
        .map(|&t| PropPlacement {
            placement: track.sample(t),
            scale: 30.0,
        })
        .collect()
}

/// All info labels, turned to face back toward the approaching camera and
/// tilted slightly down.
pub fn info_labels<C: Curve>(track: &TrackSampler<C>) -> Vec<LabelPlacement> {
    let adjust = Mat3::from_rotation_y(std::f32::consts::PI)
        * Mat3::from_rotation_x(-std::f32::consts::PI / 12.0);
    INFO_LABELS
        .iter()
        .map(|label| LabelPlacement {
            placement: track.sample_with(label.t, LABEL_OFFSET, Some(adjust)),
            scale: LABEL_SCALE,
            text: label.text,
            color: label.color,
        })
        .collect()
}

pub fn space_station<C: Curve>(track: &TrackSampler<C>) -> PropPlacement {
    PropPlacement {
        placement: track.sample_with(positions::SPACE_STATION, LANDMARK_OFFSET, None),
        scale: 8.0,
    }
}

pub fn space_probe<C: Curve>(track: &TrackSampler<C>) -> PropPlacement {
    PropPlacement {
        placement: track.sample_with(positions::SPACE_PROBE, LANDMARK_OFFSET, None),
        scale: 5.0,
    }
}

/// Every static decoration of the tour, generated once per session.
#[derive(Debug, Clone)]
pub struct TrackDecorations {
    pub rings: Vec<PropPlacement>,
    pub chainweb: Vec<PropPlacement>,
    /// Graph drawn at every chainweb placement.
    pub chainweb_model: ChainwebTopology,
    pub petersen_graphs: Vec<PropPlacement>,
    pub labels: Vec<LabelPlacement>,
    pub space_station: PropPlacement,
    pub space_probe: PropPlacement,
}

impl TrackDecorations {
    pub fn generate<C: Curve, R: Rng>(track: &TrackSampler<C>, battle: bool, rng: &mut R) -> Self {
        Self {
            rings: default_rings(track, rng),
            chainweb: chainweb(track, 30, positions::CHAINWEB_3D, battle),
            chainweb_model: ChainwebTopology::standard(&mut 0),
            petersen_graphs: petersen_graphs(track),
            labels: info_labels(track),
            space_station: space_station(track),
            space_probe: space_probe(track),
        }
    }

    /// Re-lay the chainweb blocks for a new mode; everything else is static.
    pub fn relayout_for_mode<C: Curve>(&mut self, track: &TrackSampler<C>, battle: bool) {
        self.chainweb = chainweb(track, 30, positions::CHAINWEB_3D, battle);
    }

    /// World positions of the chainweb nodes in block `index`.
    pub fn chainweb_nodes(&self, index: usize) -> Option<Vec<Vec3>> {
        let block = self.chainweb.get(index)?;
        Some(
            self.chainweb_model
                .nodes
                .iter()
                .map(|node| block.to_world(node.position))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::DEFAULT_TRACK_SCALE;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn battle_chainweb_is_thinned_with_wider_spacing() {
        let track = TrackSampler::granny_knot(DEFAULT_TRACK_SCALE);
        let explore = chainweb(&track, 30, positions::CHAINWEB_3D, false);
        let battle = chainweb(&track, 30, positions::CHAINWEB_3D, true);
        assert_eq!(explore.len(), 30);
        assert_eq!(battle.len(), 10);
        // both end at the same track parameter
        let last_explore = explore.last().map(|p| p.placement.position);
        let last_battle = battle.last().map(|p| p.placement.position);
        assert!(last_explore.zip(last_battle).is_some_and(|(a, b)| a.distance(b) < 1e-2));
    }

    #[test]
    fn chainweb_blocks_carry_the_layered_graph() {
        let track = TrackSampler::granny_knot(DEFAULT_TRACK_SCALE);
        let decorations = TrackDecorations::generate(&track, false, &mut StdRng::seed_from_u64(1));
        assert_eq!(decorations.chainweb_model.nodes.len(), 60);

        let block = decorations.chainweb[4];
        let nodes = decorations.chainweb_nodes(4).unwrap_or_default();
        assert_eq!(nodes.len(), 60);
        // outer-circle nodes of the front layer sit 0.48 * 100 from the block center
        let outer = nodes[10].distance(block.placement.position);
        assert!((outer - 48.0).abs() < 1e-2);
        assert!(decorations.chainweb_nodes(30).is_none());
    }

    #[test]
    fn rings_are_deterministic_per_seed() {
        let track = TrackSampler::granny_knot(DEFAULT_TRACK_SCALE);
        let a = default_rings(&track, &mut StdRng::seed_from_u64(7));
        let b = default_rings(&track, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.len(), 40);
        assert_eq!(a, b);
    }

    #[test]
    fn every_info_label_is_placed() {
        let track = TrackSampler::granny_knot(DEFAULT_TRACK_SCALE);
        let labels = info_labels(&track);
        assert_eq!(labels.len(), INFO_LABELS.len());
        assert_eq!(labels[0].text, "Petersen Graph");
        assert!(labels.iter().all(|l| l.placement.position.is_finite()));
    }

    #[test]
    fn landmarks_sit_off_the_track() {
        let track = TrackSampler::granny_knot(DEFAULT_TRACK_SCALE);
        let station = space_station(&track);
        let on_track = track.position(positions::SPACE_STATION);
        assert!((station.placement.position.distance(on_track) - LANDMARK_OFFSET).abs() < 0.1);
        assert_eq!(space_probe(&track).scale, 5.0);
    }
}
