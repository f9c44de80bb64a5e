use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;

lazy_static! {
    /// Where level collections are stored.
    pub static ref ASSETS: PathBuf = find_folder::Search::ParentsThenKids(3, 3)
        .for_folder("assets")
        .unwrap_or_else(|_| PathBuf::from("assets"));

    /// Where progress and settings are stored.
    pub static ref DATA_DIR: PathBuf = ProjectDirs::from("org", "kde", "skladnik")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
}

#[derive(Debug, thiserror::Error)]
pub enum SokobanError {
    #[error("{0}")]
    IoError(#[from] io::Error),

    #[error("XML error: {0}")]
    XmlError(String),

    #[error("NoLevel({0})")]
    NoLevel(usize),

    #[error("InvalidCharacter({rank}, '{chr}', line {line}, column {column})")]
    InvalidCharacter {
        rank: usize,
        chr: char,
        line: usize,
        column: usize,
    },

    #[error("NoWorker({0})")]
    NoWorker(usize),

    #[error("TwoWorkers({0})")]
    TwoWorkers(usize),
}

impl From<quick_xml::Error> for SokobanError {
    fn from(e: quick_xml::Error) -> Self {
        SokobanError::XmlError(e.to_string())
    }
}
