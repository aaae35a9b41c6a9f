//! Space tour flight controller: game modes, ship steering, observation
//! orbits, battle scoring and audio cues. Rendering is left to the host,
//! which reads poses, camera views and instance transforms from
//! [`GameController`].

pub mod config;
pub mod controller;
pub mod orbit;
pub mod poi;
pub mod score;
pub mod session;
pub mod ship;
pub mod state;
pub mod world;

pub use config::{ConfigError, GameConfig, SpeedMode};
pub use controller::{GameController, ModeSwitch};
pub use orbit::CameraView;
pub use poi::PointOfInterest;
pub use session::{Modal, Session};
pub use state::{GameState, GameStateManager, SubscriptionId, TRANSITIONS};
