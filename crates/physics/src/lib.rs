//! Ship motion, camera smoothing and targeting queries.

pub mod raycast;
pub mod ship;
pub mod smoothing;

pub use raycast::*;
pub use ship::*;
pub use smoothing::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
