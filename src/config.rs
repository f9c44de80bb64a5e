//! User settings.

use std::convert::TryFrom;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::util::DATA_DIR;

/// Milliseconds between two animation frames for each speed setting.
const DELAYS: [u64; 4] = [0, 15, 35, 60];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid settings file: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid animation speed {0}, expected a number between 0 and 3")]
    InvalidAnimationSpeed(u8),
}

/// How fast moves are replayed. Zero means moves are performed instantly, higher numbers mean
/// longer pauses between the individual steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnimationSpeed(u8);

impl AnimationSpeed {
    pub const INSTANT: AnimationSpeed = AnimationSpeed(0);

    pub fn new(n: u8) -> Result<Self, SettingsError> {
        if (n as usize) < DELAYS.len() {
            Ok(AnimationSpeed(n))
        } else {
            Err(SettingsError::InvalidAnimationSpeed(n))
        }
    }

    pub fn is_instant(self) -> bool {
        self.0 == 0
    }

    /// Time to wait between two steps of an animated move.
    pub fn delay(self) -> Duration {
        Duration::from_millis(DELAYS[self.0 as usize])
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        AnimationSpeed(2)
    }
}

impl TryFrom<u8> for AnimationSpeed {
    type Error = SettingsError;

    fn try_from(n: u8) -> Result<Self, SettingsError> {
        AnimationSpeed::new(n)
    }
}

impl From<AnimationSpeed> for u8 {
    fn from(speed: AnimationSpeed) -> u8 {
        speed.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub animation_speed: AnimationSpeed,
}

impl Settings {
    /// Read the settings from the user's data directory. Missing or broken files yield the
    /// default settings.
    pub fn load() -> Self {
        let path = DATA_DIR.join("settings.json");
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
