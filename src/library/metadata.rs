use std::path::{Path, PathBuf};

use lofty::prelude::*;
use lofty::probe::Probe;

use crate::error::MetadataError;

use super::model::TrackMetadata;

/// Source of per-file duration and display metadata.
///
/// Scans call this from several worker threads at once.
pub trait MetadataProvider: Send + Sync {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError>;
}

/// Reads tags and stream properties with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadata;

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MetadataProvider for LoftyMetadata {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let tagged = Probe::open(path)
            .and_then(|p| p.read())
            .map_err(|e| MetadataError::new(path, e))?;

        let mut meta = TrackMetadata {
            duration: tagged.properties().duration(),
            ..TrackMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            meta.title = non_empty(tag.title());
            meta.album = non_empty(tag.album());
            meta.picture = tag.pictures().first().map(|p| p.data().to_vec());
        }

        Ok(meta)
    }
}

/// Where a track's cover image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Embedded(Vec<u8>),
    File(PathBuf),
}

/// Embedded picture first, then `cover.png` / `cover.jpg` beside the file.
pub fn cover_art(path: &Path, meta: &TrackMetadata) -> Option<Artwork> {
    if let Some(bytes) = &meta.picture {
        return Some(Artwork::Embedded(bytes.clone()));
    }

    let dir = path.parent()?;
    ["cover.png", "cover.jpg"]
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(Artwork::File)
}
