//! Core types and utilities shared by the space tour crates.
//!
//! This crate provides the foundational pieces used across all systems:
//! - Transform, look-at bases and Euler extraction
//! - Frame time and the pause-aware game timer
//! - Debounced one-shot timers
//! - Throttled logging for per-frame diagnostics

pub mod throttle;
pub mod time;
pub mod timer;
pub mod transform;

pub use throttle::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
