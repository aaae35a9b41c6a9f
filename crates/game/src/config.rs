//! Game configuration (window, logging, ship handling, orbit camera, track).
//! Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use physics::SpringParams;

/// Errors reading or writing `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// How fast the ship laps the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedMode {
    Slow,
    Normal,
    Fast,
}

impl SpeedMode {
    /// Time for one full lap.
    pub fn loop_time(self) -> Duration {
        match self {
            SpeedMode::Slow => Duration::from_secs(80),
            SpeedMode::Normal => Duration::from_secs(60),
            SpeedMode::Fast => Duration::from_secs(40),
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            SpeedMode::Slow => 0.5,
            SpeedMode::Normal => 1.0,
            SpeedMode::Fast => 1.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedMode::Slow => "SLOW",
            SpeedMode::Normal => "NORMAL",
            SpeedMode::Fast => "FAST",
        }
    }

    /// Fast -> Slow -> Normal -> Fast.
    pub fn next(self) -> Self {
        match self {
            SpeedMode::Fast => SpeedMode::Slow,
            SpeedMode::Slow => SpeedMode::Normal,
            SpeedMode::Normal => SpeedMode::Fast,
        }
    }

    /// Camera field of view in degrees; faster modes widen it.
    pub fn fov_degrees(self) -> f32 {
        70.0 + (self.factor() - 1.0) * 10.0
    }
}

/// Ship handling constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipControls {
    /// Horizontal travel at full pointer deflection.
    pub range_x: f32,
    /// Vertical travel at full pointer deflection.
    pub range_y: f32,
    /// Resting height above the track.
    pub offset_y: f32,
    /// Response-curve exponent (>1 softer center, <1 softer edges).
    pub response_curve: f32,
    /// Pitch per unit of vertical input.
    pub pitch_factor: f32,
    /// Yaw per unit of horizontal input.
    pub yaw_factor: f32,
    /// Bank per unit of horizontal input.
    pub bank_factor: f32,
    pub mass: f32,
    pub damping: f32,
    pub return_force: f32,
    /// Fraction of the pose recentered per frame while observing.
    pub observation_reset_rate: f32,
    /// Resting height while observing.
    pub observation_height: f32,
    pub hover_period: f32,
    pub hover_amplitude: f32,
    pub float_frequency: f32,
    pub float_amplitude: f32,
}

impl Default for ShipControls {
    fn default() -> Self {
        Self {
            range_x: 45.0,
            range_y: 30.0,
            offset_y: 10.0,
            response_curve: physics::DEFAULT_RESPONSE_CURVE,
            pitch_factor: 0.3,
            yaw_factor: 0.2,
            bank_factor: 0.4,
            mass: 1.0,
            damping: 0.85,
            return_force: 0.03,
            observation_reset_rate: 0.05,
            observation_height: 25.0,
            hover_period: 3.0,
            hover_amplitude: 0.3,
            float_frequency: 40.0,
            float_amplitude: 0.2,
        }
    }
}

impl ShipControls {
    pub fn spring(&self) -> SpringParams {
        SpringParams {
            mass: self.mass,
            damping: self.damping,
            return_force: self.return_force,
        }
    }
}

/// Observation orbit camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Radians of orbit per pixel dragged.
    pub drag_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per wheel notch.
    pub zoom_step: f32,
    /// Smoothing time (seconds) for angle and height.
    pub angle_smooth_time: f32,
    /// Smoothing time (seconds) for zoom.
    pub zoom_smooth_time: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            min_distance: 30.0,
            max_distance: 200.0,
            zoom_step: 5.0,
            angle_smooth_time: 0.15,
            zoom_smooth_time: 0.25,
        }
    }
}

/// Track and run settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// World units per curve unit.
    pub scale: f32,
    /// Laps until the run ends.
    pub total_loops: u32,
    pub speed_mode: SpeedMode,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            scale: procgen::DEFAULT_TRACK_SCALE,
            total_loops: 7,
            speed_mode: SpeedMode::Fast,
        }
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Verbose per-frame diagnostics (debug log level).
    #[serde(default = "default_dev_logging")]
    pub dev_logging: bool,
    /// Start with sound on. Off until the player turns it on.
    #[serde(default)]
    pub sound: bool,
    /// Directory holding the audio cues.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// Seed for procedural placement; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Window in which consecutive hits build a combo, in milliseconds.
    #[serde(default = "default_combo_window_ms")]
    pub combo_window_ms: u64,
    #[serde(default)]
    pub ship: ShipControls,
    #[serde(default)]
    pub orbit: OrbitSettings,
    #[serde(default)]
    pub track: TrackSettings,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_dev_logging() -> bool {
    cfg!(debug_assertions)
}
fn default_audio_dir() -> PathBuf {
    PathBuf::from("assets/audio")
}
fn default_combo_window_ms() -> u64 {
    2000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            dev_logging: default_dev_logging(),
            sound: false,
            audio_dir: default_audio_dir(),
            seed: None,
            combo_window_ms: default_combo_window_ms(),
            ship: ShipControls::default(),
            orbit: OrbitSettings::default(),
            track: TrackSettings::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Saved settings to {:?}", path),
            Err(e) => log::warn!("{}", e),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_ron()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn combo_window(&self) -> Duration {
        Duration::from_millis(self.combo_window_ms)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
