use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config;
use crate::controller::{Command, PlaybackController};
use crate::library::{
    Artwork, MetadataProvider, ScanCompleted, ScanMode, cover_art, format_mmss, list_entry,
    now_playing_text, position_text, spawn_scan,
};
use crate::player::{PlaybackEngine, PlaybackState};
use crate::runtime::input::{HELP, Input, parse_line};

/// Everything the control thread reacts to, in arrival order.
#[derive(Debug)]
pub enum Message {
    Line(String),
    InputClosed,
    Scanned(ScanCompleted),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Forward stdin lines into the control queue until EOF.
pub fn spawn_stdin_reader(tx: Sender<Message>) -> JoinHandle<()> {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Message::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Message::InputClosed);
    })
}

/// The command shell around a [`PlaybackController`].
///
/// Owns nothing but borrowed state and the sender half of the control queue,
/// which background scans use to report back.
pub struct Shell<'a, E: PlaybackEngine, W: Write> {
    controller: &'a mut PlaybackController<E>,
    settings: &'a config::Settings,
    provider: Arc<dyn MetadataProvider>,
    tx: Sender<Message>,
    out: W,
}

impl<'a, E: PlaybackEngine, W: Write> Shell<'a, E, W> {
    pub fn new(
        controller: &'a mut PlaybackController<E>,
        settings: &'a config::Settings,
        provider: Arc<dyn MetadataProvider>,
        tx: Sender<Message>,
        out: W,
    ) -> Self {
        Self {
            controller,
            settings,
            provider,
            tx,
            out,
        }
    }

    pub fn handle(&mut self, message: Message) -> io::Result<Flow> {
        let before = self.snapshot();
        let flow = match message {
            Message::Line(line) => self.handle_line(&line)?,
            Message::InputClosed => {
                log::debug!("stdin closed");
                Flow::Quit
            }
            Message::Scanned(done) => {
                self.on_scanned(done)?;
                Flow::Continue
            }
        };
        self.announce_if_changed(before)?;
        Ok(flow)
    }

    /// Feed every pending engine event to the controller.
    pub fn poll_engine(&mut self) -> io::Result<()> {
        let before = self.snapshot();
        while let Some(event) = self.controller.poll_engine() {
            if let Err(e) = self.controller.handle_engine_event(event) {
                writeln!(self.out, "error: {e}")?;
            }
        }
        self.announce_if_changed(before)
    }

    /// Start a background scan of `dir`.
    pub fn open_folder(&mut self, dir: PathBuf, mode: ScanMode) -> io::Result<()> {
        let ticket = self.controller.begin_scan(mode);
        writeln!(self.out, "scanning {} ...", dir.display())?;

        let tx = self.tx.clone();
        spawn_scan(
            ticket,
            dir,
            self.settings.library.clone(),
            self.controller.ignore_set().clone(),
            Arc::clone(&self.provider),
            move |done| {
                let _ = tx.send(Message::Scanned(done));
            },
        );
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let input = match parse_line(line) {
            Ok(Some(input)) => input,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        match input {
            Input::Transport(command) => {
                log::debug!("command {command:?}");
                let needs_tracks = !matches!(command, Command::SetVolume(_));
                if needs_tracks && self.controller.playlist().is_empty() {
                    writeln!(self.out, "the playlist is empty, `open` a folder first")?;
                } else if let Err(e) = self.controller.apply(command) {
                    writeln!(self.out, "error: {e}")?;
                }
            }
            Input::Open(dir) => self.open_folder(dir, ScanMode::Replace)?,
            Input::Add(dir) => self.open_folder(dir, ScanMode::Append)?,
            Input::List => self.print_list()?,
            Input::Status => {
                let line = self.status_line();
                writeln!(self.out, "{line}")?;
            }
            Input::Info => self.print_info()?,
            Input::Help => writeln!(self.out, "{HELP}")?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn on_scanned(&mut self, done: ScanCompleted) -> io::Result<()> {
        if !self.controller.is_current_scan(done.ticket) {
            log::info!(
                "discarding results for {}, a newer scan was started",
                done.root.display()
            );
            return Ok(());
        }

        let outcome = match done.result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{e}");
                return writeln!(self.out, "error: {e}");
            }
        };

        let summary = format!(
            "{} tracks from {} ({} ignored, {} too short, {} unreadable)",
            outcome.tracks.len(),
            done.root.display(),
            outcome.ignored,
            outcome.too_short,
            outcome.failures.len(),
        );

        self.controller.finish_scan(done.ticket, outcome);
        writeln!(self.out, "{summary}")?;
        writeln!(
            self.out,
            "{} tracks in the playlist",
            self.controller.playlist().len()
        )
    }

    fn snapshot(&self) -> (Option<usize>, PlaybackState) {
        (
            self.controller.playlist().current_index(),
            self.controller.state(),
        )
    }

    fn announce_if_changed(&mut self, before: (Option<usize>, PlaybackState)) -> io::Result<()> {
        let after = self.snapshot();
        if after != before && after.1 == PlaybackState::Playing {
            let line = self.status_line();
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// `[playing] 3/12  Album - Title  01:05 / 03:20`
    pub fn status_line(&self) -> String {
        let state = self.controller.state();
        let playlist = self.controller.playlist();
        let (Some(index), Some(track)) = (playlist.current_index(), playlist.current_track())
        else {
            return format!("[{state}] {} tracks, nothing selected", playlist.len());
        };

        let meta = self.provider.read(track.path()).ok();
        let title = now_playing_text(track.path(), meta.as_ref(), &self.settings.display.album_strip);
        let engine = self.controller.engine();
        let position = position_text(
            engine.elapsed(),
            engine.total().or(meta.map(|m| m.duration)),
        );

        format!(
            "[{state}] {}/{}  {title}  {position}",
            index + 1,
            playlist.len()
        )
    }

    fn print_list(&mut self) -> io::Result<()> {
        let playlist = self.controller.playlist();
        if playlist.is_empty() {
            return writeln!(self.out, "the playlist is empty");
        }

        let current = playlist.current_index();
        let strip = &self.settings.display.album_strip;
        for (i, track) in playlist.tracks().iter().enumerate() {
            let meta = self.provider.read(track.path()).ok();
            let entry = list_entry(i + 1, track.path(), meta.as_ref(), strip);
            let marker = if current == Some(i) { ">" } else { " " };
            writeln!(self.out, "{marker} {}", entry.primary)?;
            writeln!(self.out, "      {}", entry.secondary)?;
        }
        Ok(())
    }

    fn print_info(&mut self) -> io::Result<()> {
        let Some(track) = self.controller.current_track() else {
            return writeln!(self.out, "nothing selected");
        };

        let path = track.path().to_path_buf();
        writeln!(self.out, "file:     {}", path.display())?;
        match self.provider.read(&path) {
            Ok(meta) => {
                let strip = &self.settings.display.album_strip;
                writeln!(
                    self.out,
                    "title:    {}",
                    now_playing_text(&path, Some(&meta), strip)
                )?;
                writeln!(self.out, "length:   {}", format_mmss(meta.duration))?;
                let art = match cover_art(&path, &meta) {
                    Some(Artwork::Embedded(bytes)) => format!("embedded ({} bytes)", bytes.len()),
                    Some(Artwork::File(file)) => file.display().to_string(),
                    None => "none".to_string(),
                };
                writeln!(self.out, "artwork:  {art}")?;
            }
            Err(e) => writeln!(self.out, "metadata: {e}")?,
        }
        if self.controller.state() != PlaybackState::Stopped {
            let engine = self.controller.engine();
            writeln!(
                self.out,
                "position: {} ({:.0}%)",
                position_text(engine.elapsed(), engine.total()),
                engine.position_fraction() * 100.0
            )?;
        }
        writeln!(
            self.out,
            "ignored:  {} names on the skip list",
            self.controller.ignore_set().len()
        )
    }
}

/// Serve the control queue until the user quits or stdin closes.
///
/// The engine is polled on every wake-up, and at least every `poll_interval`.
pub fn run<E: PlaybackEngine, W: Write>(
    shell: &mut Shell<'_, E, W>,
    rx: &Receiver<Message>,
    poll_interval: Duration,
) -> io::Result<()> {
    loop {
        let flow = match rx.recv_timeout(poll_interval) {
            Ok(message) => shell.handle(message)?,
            Err(RecvTimeoutError::Timeout) => Flow::Continue,
            Err(RecvTimeoutError::Disconnected) => Flow::Quit,
        };
        shell.poll_engine()?;
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}
