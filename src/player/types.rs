//! Small playback types shared by the engine and the controller.

use std::fmt;

use crate::error::EngineError;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Nothing open, or the last open failed.
    #[default]
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        };
        f.write_str(label)
    }
}

/// Something the engine noticed on its own.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The open track played to the end.
    Ended,
    /// The open track could not continue.
    Failed(EngineError),
}
