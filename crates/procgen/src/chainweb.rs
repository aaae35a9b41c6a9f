//! Layered Petersen-graph topology behind the chainweb props.
//!
//! One layer holds 20 chains on three concentric circles (5 middle, 5
//! inner, 10 outer) joined by 30 fixed edges. Stacked layers are linked by
//! the same edge pattern in both directions plus one edge per chain.

use glam::Vec3;

pub const CHAINS_PER_LAYER: usize = 20;
pub const MIDDLE_RADIUS: f32 = 0.3;
pub const INNER_RADIUS: f32 = 0.15;
pub const OUTER_RADIUS: f32 = 0.48;
/// Layers stacked in each chainweb prop.
pub const CHAINWEB_LAYERS: usize = 3;

const NODE_RADIUS: f32 = 0.025;
const RING_THICKNESS: f32 = 0.003;

/// Angle of each chain on its circle, in radians.
const ANGLES: [f32; CHAINS_PER_LAYER] = [
    5.0265, 0.0, 1.2566, 2.5133, 3.7699, //
    5.0265, 0.0, 1.2566, 2.5133, 3.7699, //
    4.8521, 0.1745, 1.0821, 2.6878, 3.5954, 5.2009, 6.1087, 1.4312, 2.3387, 3.9444,
];

/// Chain pairs joined within a layer, with their edge style.
const EDGES: [(usize, usize, EdgeStyle); 30] = [
    (0, 5, EdgeStyle::MiddleInner),
    (1, 6, EdgeStyle::MiddleInner),
    (2, 7, EdgeStyle::MiddleInner),
    (3, 8, EdgeStyle::MiddleInner),
    (4, 9, EdgeStyle::MiddleInner),
    (0, 10, EdgeStyle::MiddleOuterNear),
    (1, 11, EdgeStyle::MiddleOuterNear),
    (2, 12, EdgeStyle::MiddleOuterNear),
    (3, 13, EdgeStyle::MiddleOuterNear),
    (4, 14, EdgeStyle::MiddleOuterNear),
    (0, 15, EdgeStyle::MiddleOuterFar),
    (1, 16, EdgeStyle::MiddleOuterFar),
    (2, 17, EdgeStyle::MiddleOuterFar),
    (3, 18, EdgeStyle::MiddleOuterFar),
    (4, 19, EdgeStyle::MiddleOuterFar),
    (5, 7, EdgeStyle::InnerCircle),
    (6, 8, EdgeStyle::InnerCircle),
    (7, 9, EdgeStyle::InnerCircle),
    (8, 5, EdgeStyle::InnerCircle),
    (9, 6, EdgeStyle::InnerCircle),
    (10, 11, EdgeStyle::OuterCircle),
    (11, 12, EdgeStyle::OuterCircle),
    (12, 13, EdgeStyle::OuterCircle),
    (13, 14, EdgeStyle::OuterCircle),
    (14, 15, EdgeStyle::OuterCircle),
    (15, 16, EdgeStyle::OuterCircle),
    (16, 17, EdgeStyle::OuterCircle),
    (17, 18, EdgeStyle::OuterCircle),
    (18, 19, EdgeStyle::OuterCircle),
    (19, 10, EdgeStyle::OuterCircle),
];

/// Which circle a chain sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Circle {
    Middle,
    Inner,
    Outer,
}

impl Circle {
    pub fn of(chain_id: usize) -> Self {
        match chain_id {
            0..=4 => Circle::Middle,
            5..=9 => Circle::Inner,
            _ => Circle::Outer,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            Circle::Middle => MIDDLE_RADIUS,
            Circle::Inner => INNER_RADIUS,
            Circle::Outer => OUTER_RADIUS,
        }
    }

    pub fn color(self) -> [f32; 3] {
        match self {
            Circle::Middle => [1.0, 0.0, 0.0],
            Circle::Inner => [0.0, 0.0, 1.0],
            Circle::Outer => [1.0, 1.0, 0.0],
        }
    }
}

/// Visual style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    MiddleInner,
    /// Middle to outer, chain + 10.
    MiddleOuterNear,
    /// Middle to outer, chain + 15.
    MiddleOuterFar,
    InnerCircle,
    OuterCircle,
    /// Same chain in the next layer.
    SameChain,
}

impl EdgeStyle {
    pub fn color(self) -> [f32; 3] {
        match self {
            EdgeStyle::MiddleInner => rgb(0xff6648),
            EdgeStyle::MiddleOuterNear => rgb(0xe5b24d),
            EdgeStyle::MiddleOuterFar => rgb(0x3896f4),
            EdgeStyle::InnerCircle => rgb(0x4de5ff),
            EdgeStyle::OuterCircle => rgb(0xffff35),
            EdgeStyle::SameChain => [0.5, 0.5, 0.5],
        }
    }
}

/// Pattern edges follow the Petersen wiring; same-chain edges tie a chain to
/// itself in the next layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Pattern,
    SameChain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainNode {
    pub id: u64,
    pub chain_id: usize,
    pub layer_id: usize,
    /// Position in the prop's local frame.
    pub position: Vec3,
    pub color: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from_chain: usize,
    pub to_chain: usize,
    pub from_layer: usize,
    pub to_layer: usize,
    pub kind: EdgeKind,
    pub style: EdgeStyle,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub color: [f32; 3],
    pub thickness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConfig {
    pub z: f32,
    pub scale: f32,
    pub rings: [Ring; 3],
}

fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Unit-layer position of a chain.
pub fn node_position(chain_id: usize) -> Vec3 {
    let angle = ANGLES[chain_id % CHAINS_PER_LAYER];
    let radius = Circle::of(chain_id).radius();
    Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
}

/// The 20 nodes of one layer at depth `z`. Node ids come from `next_id`.
pub fn create_layer(layer_id: usize, z: f32, scale: f32, next_id: &mut u64) -> Vec<ChainNode> {
    (0..CHAINS_PER_LAYER)
        .map(|chain_id| {
            let base = node_position(chain_id);
            let id = *next_id;
            *next_id += 1;
            ChainNode {
                id,
                chain_id,
                layer_id,
                position: Vec3::new(base.x * scale, base.y * scale, z),
                color: Circle::of(chain_id).color(),
                radius: NODE_RADIUS * scale,
            }
        })
        .collect()
}

/// The 30 pattern edges inside `layer_id`.
pub fn intra_layer_edges(layer_id: usize) -> Vec<Edge> {
    EDGES
        .iter()
        .map(|&(from, to, style)| Edge {
            from_chain: from,
            to_chain: to,
            from_layer: layer_id,
            to_layer: layer_id,
            kind: EdgeKind::Pattern,
            style,
            color: style.color(),
        })
        .collect()
}

/// Edges from layer `source` to layer `target`: every pattern edge in both
/// directions, then one same-chain edge per chain.
pub fn inter_layer_edges(source: usize, target: usize) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(EDGES.len() * 2 + CHAINS_PER_LAYER);
    for &(a, b, style) in &EDGES {
        for (from, to) in [(a, b), (b, a)] {
            edges.push(Edge {
                from_chain: from,
                to_chain: to,
                from_layer: source,
                to_layer: target,
                kind: EdgeKind::Pattern,
                style,
                color: style.color(),
            });
        }
    }
    for chain in 0..CHAINS_PER_LAYER {
        let node = Circle::of(chain).color();
        edges.push(Edge {
            from_chain: chain,
            to_chain: chain,
            from_layer: source,
            to_layer: target,
            kind: EdgeKind::SameChain,
            style: EdgeStyle::SameChain,
            // halfway between white and the node color
            color: node.map(|c| (1.0 + c) * 0.5),
        });
    }
    edges
}

/// Guide rings for a layer drawn at `scale`: inner, middle, outer.
pub fn ring_configurations(scale: f32) -> [Ring; 3] {
    [
        (INNER_RADIUS, rgb(0x4cc8ff)),
        (MIDDLE_RADIUS, rgb(0xff7f4d)),
        (OUTER_RADIUS, rgb(0xffff66)),
    ]
    .map(|(radius, color)| Ring {
        radius: radius * scale,
        color,
        thickness: RING_THICKNESS * scale,
    })
}

/// `count` layers receding along -Z, each 5% smaller than the one before.
pub fn layer_configurations(count: usize, base_scale: f32) -> Vec<LayerConfig> {
    let depth_step = 0.2 * base_scale;
    (0..count)
        .map(|i| {
            let scale = base_scale * (1.0 - i as f32 * 0.05);
            LayerConfig {
                z: -(i as f32) * depth_step,
                scale,
                rings: ring_configurations(scale),
            }
        })
        .collect()
}

/// A stack of layers and every edge between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainwebTopology {
    pub layers: Vec<LayerConfig>,
    pub nodes: Vec<ChainNode>,
    pub edges: Vec<Edge>,
}

impl ChainwebTopology {
    pub fn build(layers: Vec<LayerConfig>, next_id: &mut u64) -> Self {
        let mut nodes = Vec::with_capacity(layers.len() * CHAINS_PER_LAYER);
        let mut edges = Vec::new();
        for (layer_id, layer) in layers.iter().enumerate() {
            nodes.extend(create_layer(layer_id, layer.z, layer.scale, next_id));
            edges.extend(intra_layer_edges(layer_id));
            if layer_id > 0 {
                edges.extend(inter_layer_edges(layer_id - 1, layer_id));
            }
        }
        log::debug!("Chainweb topology: {} layers, {} nodes, {} edges", layers.len(), nodes.len(), edges.len());
        Self { layers, nodes, edges }
    }

    /// The stack every chainweb prop draws.
    pub fn standard(next_id: &mut u64) -> Self {
        Self::build(layer_configurations(CHAINWEB_LAYERS, 1.0), next_id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node(&self, layer_id: usize, chain_id: usize) -> Option<&ChainNode> {
        if chain_id >= CHAINS_PER_LAYER {
            return None;
        }
        self.nodes.get(layer_id * CHAINS_PER_LAYER + chain_id)
    }

    /// Local-frame end points of an edge.
    pub fn segment(&self, edge: &Edge) -> Option<(Vec3, Vec3)> {
        let from = self.node(edge.from_layer, edge.from_chain)?;
        let to = self.node(edge.to_layer, edge.to_chain)?;
        Some((from.position, to.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    #[test]
    fn layer_has_twenty_nodes_on_three_circles() {
        let mut id = 0;
        let layer = create_layer(2, -0.4, 2.0, &mut id);
        assert_eq!(layer.len(), CHAINS_PER_LAYER);
        assert_eq!(id, 20);
        for node in &layer {
            let expected = Circle::of(node.chain_id).radius() * 2.0;
            assert!((node.position.truncate().length() - expected).abs() < 1e-4);
            assert_eq!(node.position.z, -0.4);
            assert_eq!(node.layer_id, 2);
        }
        assert_eq!(layer.iter().filter(|n| n.color == [1.0, 0.0, 0.0]).count(), 5);
        assert_eq!(layer.iter().filter(|n| n.color == [1.0, 1.0, 0.0]).count(), 10);
    }

    #[test]
    fn every_chain_has_degree_three_within_a_layer() {
        let edges = intra_layer_edges(0);
        assert_eq!(edges.len(), 30);
        let mut degree = [0; CHAINS_PER_LAYER];
        for edge in &edges {
            degree[edge.from_chain] += 1;
            degree[edge.to_chain] += 1;
        }
        assert!(degree.iter().all(|&d| d == 3));
    }

    #[test]
    fn inter_layer_edges_cover_pattern_both_ways_and_each_chain() {
        let edges = inter_layer_edges(0, 1);
        assert_eq!(edges.len(), 80);
        let same: Vec<&Edge> = edges.iter().filter(|e| e.kind == EdgeKind::SameChain).collect();
        assert_eq!(same.len(), CHAINS_PER_LAYER);
        assert!(same.iter().all(|e| e.from_chain == e.to_chain));
        assert!(edges.iter().all(|e| e.from_layer == 0 && e.to_layer == 1));
        assert!(edges.iter().any(|e| e.from_chain == 10 && e.to_chain == 0));
    }

    #[test]
    fn layers_recede_and_shrink() {
        let layers = layer_configurations(3, 1.0);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].z, 0.0);
        assert!((layers[2].z + 0.4).abs() < 1e-6);
        assert!((layers[2].scale - 0.9).abs() < 1e-6);
        assert!((layers[2].rings[2].radius - OUTER_RADIUS * 0.9).abs() < 1e-6);
    }

    #[test]
    fn stacked_topology_is_connected() {
        let mut id = 100;
        let web = ChainwebTopology::standard(&mut id);
        assert_eq!(web.layer_count(), CHAINWEB_LAYERS);
        assert_eq!(web.nodes.len(), 60);
        assert_eq!(web.edges.len(), 3 * 30 + 2 * 80);
        assert_eq!(web.nodes[0].id, 100);

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(0, 0)]);
        while let Some(node) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            for edge in &web.edges {
                let (a, b) = ((edge.from_layer, edge.from_chain), (edge.to_layer, edge.to_chain));
                if a == node {
                    queue.push_back(b);
                } else if b == node {
                    queue.push_back(a);
                }
            }
        }
        assert_eq!(seen.len(), 60);

        let bridge = web.edges.iter().find(|e| e.kind == EdgeKind::SameChain);
        let segment = bridge.and_then(|e| web.segment(e));
        assert!(segment.is_some_and(|(a, b)| (a.z - b.z).abs() > 0.1));
    }
}
