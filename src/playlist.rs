//! The ordered track list and its cursor.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::PlaylistError;
use crate::library::Track;

/// Tracks in playback order plus the index of the current one.
///
/// `current` is either `None` or a valid index.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a whole new list. The cursor is cleared.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current = None;
    }

    /// Add tracks to the end, skipping paths already present. The cursor
    /// stays where it is. Returns how many were added.
    pub fn append(&mut self, tracks: Vec<Track>) -> usize {
        let mut known: HashSet<PathBuf> = self.tracks.iter().map(|t| t.path.clone()).collect();
        let before = self.tracks.len();
        self.tracks.extend(tracks.into_iter().filter(|t| known.insert(t.path.clone())));
        self.tracks.len() - before
    }

    pub fn set_current(&mut self, index: usize) -> Result<(), PlaylistError> {
        if index >= self.tracks.len() {
            return Err(PlaylistError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    /// Move to the following track, wrapping to the first after the last.
    ///
    /// With no current track this lands on index 0.
    pub fn next(&mut self) -> Result<usize, PlaylistError> {
        if self.tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.tracks.len());
        self.current = Some(next);
        Ok(next)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
