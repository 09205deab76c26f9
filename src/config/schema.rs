use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rondo/config.toml` or `~/.config/rondo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RONDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub ignore: IgnoreSettings,
    pub playback: PlaybackSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, leading dot optional).
    pub extensions: Vec<String>,
    /// Tracks shorter than this many seconds are left out of the playlist.
    pub min_duration_secs: u64,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Number of metadata workers per scan. Unset means one per available core.
    pub scan_workers: Option<usize>,
}

impl LibrarySettings {
    pub fn min_duration(&self) -> Duration {
        Duration::from_secs(self.min_duration_secs)
    }
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into()],
            min_duration_secs: 20,
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            scan_workers: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IgnoreSettings {
    /// Where skipped filenames are remembered.
    ///
    /// Defaults to `$XDG_DATA_HOME/rondo/ignorelist.txt`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial output volume, 0.0 to 1.0.
    pub volume: f32,
    /// Fixed seed for shuffling and random picks. Unset seeds from the OS.
    pub shuffle_seed: Option<u64>,
    /// How often the control loop checks the engine for finished tracks (milliseconds).
    pub poll_interval_ms: u64,
}

impl PlaybackSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle_seed: None,
            poll_interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Phrases removed from album names before they are shown.
    ///
    /// Example: ["Original Sound Track", "(Deluxe Edition)"]
    pub album_strip: Vec<String>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            album_strip: vec!["Original Sound Track".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    /// `RONDO_LOG` overrides this at startup.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
