//! [`PlaybackEngine`] on top of `rodio`.
//!
//! One `Sink` per open track. Opening a track decodes it into a fresh paused
//! sink; the previous sink is stopped first.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::EngineError;

use super::engine::PlaybackEngine;
use super::types::EngineEvent;

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    total: Option<Duration>,
    volume: f32,
    /// Set once `Ended` has been reported for the open sink.
    drained: bool,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn new(volume: f32) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the shell.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            total: None,
            volume: volume.clamp(0.0, 1.0),
            drained: false,
        })
    }
}

/// Create a paused `Sink` playing `path`, and the decoder's idea of its length.
fn create_sink(
    stream: &OutputStream,
    path: &Path,
    volume: f32,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|e| EngineError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

impl PlaybackEngine for RodioEngine {
    fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        self.stop();
        let (sink, total) = create_sink(&self.stream, path, self.volume)?;
        self.sink = Some(sink);
        self.total = total;
        self.drained = false;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.total = None;
        self.drained = false;
    }

    fn can_resume(&self) -> bool {
        true
    }

    fn elapsed(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn total(&self) -> Option<Duration> {
        self.total
    }

    fn seek_to(&mut self, fraction: f32) -> Result<(), EngineError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let total = self
            .total
            .ok_or_else(|| EngineError::Seek("track length is unknown".to_string()))?;
        sink.try_seek(total.mul_f32(fraction.clamp(0.0, 1.0)))
            .map_err(|e| EngineError::Seek(e.to_string()))
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = &self.sink {
            s.set_volume(self.volume);
        }
    }

    /// Only ever yields `Ended`. rodio's decoder stops yielding samples on a
    /// mid-stream decode error, so a broken file drains the sink and reads as
    /// end-of-track; open and decode failures surface from `open` instead.
    fn poll_event(&mut self) -> Option<EngineEvent> {
        let sink = self.sink.as_ref()?;
        if !self.drained && !sink.is_paused() && sink.empty() {
            self.drained = true;
            return Some(EngineEvent::Ended);
        }
        None
    }
}
