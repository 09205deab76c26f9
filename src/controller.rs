//! The playback state machine.
//!
//! [`PlaybackController`] owns the playlist, the playback state and the
//! engine, and is only ever touched from the control thread. Every method is
//! one transition: the state and the engine command change together, or
//! neither does.
//!
//! | command              | Stopped        | Playing          | Paused            |
//! |----------------------|----------------|------------------|-------------------|
//! | select / next / random | open+play    | open+play        | open+play         |
//! | toggle               | no-op          | pause            | resume            |
//! | track ended          | ignored        | advance          | ignored           |
//! | track failed         | ignored        | stop             | stop              |
//! | skip                 | no-op          | ignore + advance | ignore + advance  |
//!
//! Every transport command is a no-op on an empty playlist.

use crate::error::{EngineError, PlaybackError};
use crate::library::{IgnoreSet, IgnoreStore, ScanMode, ScanOutcome, ScanTicket, Track};
use crate::player::{EngineEvent, PlaybackEngine, PlaybackState};
use crate::playlist::Playlist;
use crate::shuffle::{RandomSource, shuffle};

/// A user-issued transport command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the track at this 0-based index.
    Select(usize),
    TogglePlayPause,
    Next,
    Random,
    /// Remember the current track in the ignore list and move on.
    Skip,
    SeekTo(f32),
    SetVolume(f32),
}

pub struct PlaybackController<E: PlaybackEngine> {
    engine: E,
    playlist: Playlist,
    state: PlaybackState,
    ignore: IgnoreSet,
    store: Box<dyn IgnoreStore>,
    rng: Box<dyn RandomSource>,
    scan_generation: u64,
}

impl<E: PlaybackEngine> PlaybackController<E> {
    pub fn new(
        engine: E,
        ignore: IgnoreSet,
        store: Box<dyn IgnoreStore>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            engine,
            playlist: Playlist::new(),
            state: PlaybackState::Stopped,
            ignore,
            store,
            rng,
            scan_generation: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current_track()
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Dispatch one command to its transition.
    pub fn apply(&mut self, command: Command) -> Result<(), PlaybackError> {
        match command {
            Command::Select(index) => self.select_track(index),
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Next => self.next(),
            Command::Random => self.select_random_track(),
            Command::Skip => self.skip_and_advance(),
            Command::SeekTo(fraction) => self.seek_to(fraction),
            Command::SetVolume(volume) => {
                self.set_volume(volume);
                Ok(())
            }
        }
    }

    /// Open and play the track at `index`.
    ///
    /// Fails without touching anything when `index` is out of range.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            log::debug!("select ignored: playlist is empty");
            return Ok(());
        }
        self.playlist.set_current(index)?;
        self.start_current()
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        match self.state {
            PlaybackState::Stopped => Ok(()),
            PlaybackState::Playing => {
                self.engine.pause();
                self.state = PlaybackState::Paused;
                Ok(())
            }
            PlaybackState::Paused => {
                if self.engine.can_resume() {
                    self.engine.play();
                    self.state = PlaybackState::Playing;
                    Ok(())
                } else {
                    self.start_current()
                }
            }
        }
    }

    /// Manual "next": advance (wrapping) and play, from any state.
    pub fn next(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        self.playlist.next()?;
        self.start_current()
    }

    /// Play a uniformly random track. The current one may come up again.
    pub fn select_random_track(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        let index = self.rng.below(self.playlist.len());
        self.select_track(index)
    }

    /// Put the current track on the ignore list and advance.
    ///
    /// A failure to persist the name is logged; playback moves on regardless.
    pub fn skip_and_advance(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() || self.state == PlaybackState::Stopped {
            return Ok(());
        }

        if let Some(name) = self.current_track().and_then(Track::file_name) {
            let name = name.to_string();
            if self.ignore.insert(name.clone()) {
                match self.store.append(&name) {
                    Ok(()) => log::info!("added {name} to the ignore list"),
                    Err(e) => log::warn!("{e}"),
                }
            }
        }

        self.advance()
    }

    pub fn seek_to(&mut self, fraction: f32) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() || self.state == PlaybackState::Stopped {
            return Ok(());
        }
        self.engine.seek_to(fraction.clamp(0.0, 1.0))?;
        Ok(())
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.engine.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Take the next pending engine event, if any.
    pub fn poll_engine(&mut self) -> Option<EngineEvent> {
        self.engine.poll_event()
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) -> Result<(), PlaybackError> {
        match event {
            EngineEvent::Ended => self.on_track_ended(),
            EngineEvent::Failed(error) => {
                self.on_track_failed(error);
                Ok(())
            }
        }
    }

    /// Auto-advance. Only meaningful while playing.
    pub fn on_track_ended(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Playing {
            log::debug!("track ended while {}, ignoring", self.state);
            return Ok(());
        }
        self.advance()
    }

    pub fn on_track_failed(&mut self, error: EngineError) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        log::error!("{error}");
        self.engine.stop();
        self.state = PlaybackState::Stopped;
    }

    /// Start a new scan. Any scan started earlier becomes stale.
    pub fn begin_scan(&mut self, mode: ScanMode) -> ScanTicket {
        self.scan_generation += 1;
        ScanTicket {
            generation: self.scan_generation,
            mode,
        }
    }

    pub fn is_current_scan(&self, ticket: ScanTicket) -> bool {
        ticket.generation == self.scan_generation
    }

    /// Shuffle a finished scan into the playlist.
    ///
    /// Returns `false` and changes nothing when a newer scan has been started
    /// since `ticket` was issued.
    pub fn finish_scan(&mut self, ticket: ScanTicket, outcome: ScanOutcome) -> bool {
        if !self.is_current_scan(ticket) {
            log::debug!(
                "dropping stale scan {} (latest is {})",
                ticket.generation,
                self.scan_generation
            );
            return false;
        }

        let mut tracks = outcome.tracks;
        shuffle(&mut tracks, self.rng.as_mut());

        match ticket.mode {
            ScanMode::Replace => {
                if self.state != PlaybackState::Stopped {
                    self.engine.stop();
                    self.state = PlaybackState::Stopped;
                }
                self.playlist.replace(tracks);
            }
            ScanMode::Append => {
                let offered = tracks.len();
                let added = self.playlist.append(tracks);
                if added < offered {
                    log::debug!("{} tracks were already in the playlist", offered - added);
                }
            }
        }
        true
    }

    pub fn shutdown(&mut self) {
        self.engine.stop();
        self.state = PlaybackState::Stopped;
    }

    fn advance(&mut self) -> Result<(), PlaybackError> {
        self.playlist.next()?;
        self.start_current()
    }

    /// Open and play whatever the cursor points at. Any failure ends in `Stopped`.
    fn start_current(&mut self) -> Result<(), PlaybackError> {
        let Some(track) = self.playlist.current_track() else {
            return Ok(());
        };

        match self.engine.open(track.path()) {
            Ok(()) => {
                self.engine.play();
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(e) => {
                self.engine.stop();
                self.state = PlaybackState::Stopped;
                Err(e.into())
            }
        }
    }
}
