use std::path::{Path, PathBuf};
use std::time::Duration;

/// A playable file. The absolute path is its identity within a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    pub path: PathBuf,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename, as stored in the ignore list.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }
}

/// What a metadata provider knows about one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub duration: Duration,
    pub title: Option<String>,
    pub album: Option<String>,
    /// First embedded picture, if any.
    pub picture: Option<Vec<u8>>,
}
