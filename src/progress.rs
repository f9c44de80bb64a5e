//! On-disc record of how far the user got in each collection.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::util::DATA_DIR;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to create file: {0}")]
    FailedToCreateFile(String),

    #[error("Failed to create CBOR: {0}")]
    CBOREncodeError(String),
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::FailedToCreateFile(e.to_string())
    }
}

impl From<serde_cbor::error::Error> for SaveError {
    fn from(e: serde_cbor::error::Error) -> Self {
        SaveError::CBOREncodeError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionProgress {
    pub name: String,

    /// Levels are unlocked in order, so this is also the index of the first unsolved level.
    #[serde(default)]
    pub completed_levels: usize,
}

impl CollectionProgress {
    /// Create a new `CollectionProgress` with no solved levels.
    pub fn new(name: &str) -> Self {
        CollectionProgress {
            name: name.to_string(),
            completed_levels: 0,
        }
    }

    /// Try to load the progress for the collection with the given name from the user's data
    /// directory. If that fails, return a new empty `CollectionProgress`.
    pub fn load(name: &str) -> Self {
        Self::load_from(&DATA_DIR, name)
    }

    pub fn load_from(dir: &Path, name: &str) -> Self {
        let path = dir.join(name);
        Self::load_cbor(&path)
            .or_else(|| Self::load_json(&path))
            .unwrap_or_else(|| Self::new(name))
    }

    fn load_json(path: &Path) -> Option<Self> {
        let file = File::open(path.with_extension("json")).ok()?;
        serde_json::from_reader(file).ok()
    }

    fn load_cbor(path: &Path) -> Option<Self> {
        let file = File::open(path.with_extension("cbor")).ok()?;
        serde_cbor::from_reader(file).ok()
    }

    /// Save the current state to disc.
    pub fn save(&self) -> Result<(), SaveError> {
        self.save_to(&DATA_DIR)
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), SaveError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.name).with_extension("cbor");
        let mut file = File::create(path)?;
        serde_cbor::to_writer(&mut file, &self)?;
        Ok(())
    }

    /// Record that the level with the given index has been solved. Return true if that unlocked
    /// a new level.
    pub fn level_completed(&mut self, level: usize) -> bool {
        if level < self.completed_levels {
            return false;
        }
        self.completed_levels = level + 1;
        true
    }
}
