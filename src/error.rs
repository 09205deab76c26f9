//! Error types shared across the library scanner, playlist and player.
//!
//! Every failure that can reach the control thread has its own enum so
//! callers can decide locally whether to absorb it (per-file, per-track)
//! or surface it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reading tags or stream properties from a single file failed.
#[derive(Debug, Clone, Error)]
#[error("failed to read metadata from {}: {reason}", .path.display())]
pub struct MetadataError {
    pub path: PathBuf,
    pub reason: String,
}

impl MetadataError {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors that abort a whole scan (per-file failures never do).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("playlist is empty")]
    Empty,
    #[error("track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The playback engine could not do what it was asked.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("cannot open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },
    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Reading or writing the ignore list failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read ignore list {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write ignore list {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a rejected controller command.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
