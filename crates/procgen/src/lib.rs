//! Procedural track geometry and content placement along it.

pub mod chainweb;
pub mod placement;
pub mod scatter;
pub mod spline;
pub mod track;

pub use chainweb::*;
pub use placement::*;
pub use scatter::*;
pub use spline::*;
pub use track::*;
