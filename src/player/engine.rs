use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;

use super::types::EngineEvent;

/// What the controller needs from an audio backend.
///
/// Engines do not call back into the controller. They queue what happened and
/// hand it out through [`poll_event`](PlaybackEngine::poll_event), which the
/// control loop calls on every wake-up, so events are processed in the order
/// they occurred and never in the middle of another transition.
pub trait PlaybackEngine {
    /// Load `path`, replacing whatever was open. The track starts paused.
    fn open(&mut self, path: &Path) -> Result<(), EngineError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Drop the open track.
    fn stop(&mut self);
    /// Whether `play` after `pause` continues where it left off.
    fn can_resume(&self) -> bool;
    fn elapsed(&self) -> Duration;
    /// Length of the open track, when the decoder knows it.
    fn total(&self) -> Option<Duration>;
    /// `fraction` is in `0.0..=1.0` of the track length.
    fn seek_to(&mut self, fraction: f32) -> Result<(), EngineError>;
    fn set_volume(&mut self, volume: f32);
    fn poll_event(&mut self) -> Option<EngineEvent>;

    /// Playback position as a fraction of the track length, 0.0 when unknown.
    fn position_fraction(&self) -> f32 {
        match self.total() {
            Some(total) if !total.is_zero() => {
                (self.elapsed().as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
