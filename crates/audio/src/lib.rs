//! Audio cues for the tour: a small playback trait and a Kira backend.
//!
//! Each named sound has a single voice; playing a name that is already
//! sounding restarts it. Missing or undecodable files are logged and
//! remembered as not loaded, and playing them is a silent no-op.

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Names of the cues the game triggers.
pub mod sounds {
    pub const BG: &str = "bg";
    pub const CLICK: &str = "click";
    pub const ENGINE: &str = "engine";
    pub const ENGINE2: &str = "engine2";
    pub const EXPLOSION: &str = "explosion";
    pub const ZAP: &str = "zap";
    pub const WARP: &str = "warp";

    /// Cue name and file name under the audio directory.
    pub const FILES: [(&str, &str); 7] = [
        (BG, "bg.mp3"),
        (CLICK, "click.mp3"),
        (ENGINE, "engine.mp3"),
        (ENGINE2, "engine2.mp3"),
        (EXPLOSION, "explosion.mp3"),
        (ZAP, "laser.mp3"),
        (WARP, "warp.mp3"),
    ];
}

/// Playback operations the game relies on. Implementations never fail
/// loudly; problems are logged.
pub trait AudioBackend {
    /// Start (or restart) `name`.
    fn play(&mut self, name: &str, looped: bool, volume: f64);
    fn stop(&mut self, name: &str);
    fn pause_all(&mut self);
    fn resume_all(&mut self);
    /// Master volume, clamped to [0, 1].
    fn set_volume(&mut self, volume: f64);
    fn stop_all(&mut self);
    fn is_loaded(&self, name: &str) -> bool;
}

/// Backend used when no output device is available.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, name: &str, _looped: bool, _volume: f64) {
        log::trace!("(silent) play {}", name);
    }
    fn stop(&mut self, _name: &str) {}
    fn pause_all(&mut self) {}
    fn resume_all(&mut self) {}
    fn set_volume(&mut self, _volume: f64) {}
    fn stop_all(&mut self) {}
    fn is_loaded(&self, _name: &str) -> bool {
        false
    }
}

/// Kira-backed audio system.
pub struct KiraAudio {
    manager: AudioManager,
    sounds: HashMap<String, StaticSoundData>,
    voices: HashMap<String, StaticSoundHandle>,
    missing: HashSet<String>,
}

impl KiraAudio {
    /// Create a new audio system on the default output device.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
            voices: HashMap::new(),
            missing: HashSet::new(),
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        self.missing.remove(name);
        Ok(())
    }

    /// Load every cue in [`sounds::FILES`] from `dir`. Failures are logged and
    /// the cue is marked not loaded; the rest still load.
    pub fn load_all(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for (name, file) in sounds::FILES {
            match self.load_sound(name, &dir.join(file)) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    log::error!("Failed to load audio '{}' from {:?}: {}", name, dir.join(file), e);
                    self.missing.insert(name.to_string());
                }
            }
        }
        log::info!("Audio loaded: {}/{} cues", loaded, sounds::FILES.len());
        loaded
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    fn try_play(&mut self, name: &str, looped: bool, volume: f64) -> Result<()> {
        let Some(sound_data) = self.sounds.get(name) else {
            log::warn!("Audio '{}' not found", name);
            return Ok(());
        };
        let mut settings = StaticSoundSettings::new().volume(volume);
        if looped {
            settings = settings.loop_region(..);
        }
        let sound = sound_data.clone().with_settings(settings);

        if let Some(mut previous) = self.voices.remove(name) {
            let _ = previous.stop(Tween::default());
        }
        let handle = self.manager.play(sound)?;
        self.voices.insert(name.to_string(), handle);
        Ok(())
    }
}

impl AudioBackend for KiraAudio {
    fn play(&mut self, name: &str, looped: bool, volume: f64) {
        if let Err(e) = self.try_play(name, looped, volume) {
            log::error!("Could not play '{}': {}", name, e);
        }
    }

    fn stop(&mut self, name: &str) {
        if let Some(mut handle) = self.voices.remove(name) {
            let _ = handle.stop(Tween::default());
        }
    }

    fn pause_all(&mut self) {
        for handle in self.voices.values_mut() {
            let _ = handle.pause(Tween::default());
        }
    }

    fn resume_all(&mut self) {
        for handle in self.voices.values_mut() {
            let _ = handle.resume(Tween::default());
        }
    }

    fn set_volume(&mut self, volume: f64) {
        let _ = self
            .manager
            .main_track()
            .set_volume(volume.clamp(0.0, 1.0), Tween::default());
    }

    fn stop_all(&mut self) {
        for (_, mut handle) in self.voices.drain() {
            let _ = handle.stop(Tween::default());
        }
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }
}

// Re-export for convenience
pub use kira;
