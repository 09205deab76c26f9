use std::path::Path;
use std::time::Duration;

use super::model::TrackMetadata;

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Album name with every configured phrase removed. `None` when nothing is left.
pub fn album_label(album: Option<&str>, strip: &[String]) -> Option<String> {
    let mut label = album?.to_string();
    for phrase in strip.iter().filter(|p| !p.trim().is_empty()) {
        label = label.replace(phrase.as_str(), "");
    }
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Tag title, falling back to the file stem.
pub fn title_or_stem(path: &Path, meta: Option<&TrackMetadata>) -> String {
    meta.and_then(|m| m.title.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// "Album - Title", or just the title when there is no album.
pub fn now_playing_text(path: &Path, meta: Option<&TrackMetadata>, strip: &[String]) -> String {
    let title = title_or_stem(path, meta);
    match album_label(meta.and_then(|m| m.album.as_deref()), strip) {
        Some(album) => format!("{album} - {title}"),
        None => title,
    }
}

/// One playlist row: `"01. Title"` plus `"Album | 03:25"` underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub primary: String,
    pub secondary: String,
}

/// `position` is 1-based.
pub fn list_entry(
    position: usize,
    path: &Path,
    meta: Option<&TrackMetadata>,
    strip: &[String],
) -> ListEntry {
    let title = title_or_stem(path, meta);
    let album = album_label(meta.and_then(|m| m.album.as_deref()), strip).unwrap_or_default();
    let length = meta
        .map(|m| format_mmss(m.duration))
        .unwrap_or_else(|| "--:--".to_string());

    ListEntry {
        primary: format!("{position:02}. {title}"),
        secondary: format!("{album} | {length}"),
    }
}

/// Elapsed / total, e.g. `01:05 / 03:20`.
pub fn position_text(elapsed: Duration, total: Option<Duration>) -> String {
    match total {
        Some(total) => format!("{} / {}", format_mmss(elapsed), format_mmss(total)),
        None => format_mmss(elapsed),
    }
}
