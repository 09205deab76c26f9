//! Music folder discovery.
//!
//! Walks a folder for audio files, validates each candidate against the
//! duration threshold and the ignore list, and hands the survivors back as
//! [`Track`]s. Tag reading and ignore-list persistence sit behind the
//! [`MetadataProvider`] and [`IgnoreStore`] traits.

mod display;
mod ignore;
mod job;
mod metadata;
mod model;
mod scan;

pub use display::*;
pub use ignore::{FileIgnoreStore, IgnoreSet, IgnoreStore};
pub use job::{ScanCompleted, ScanMode, ScanTicket, spawn_scan};
pub use metadata::{Artwork, LoftyMetadata, MetadataProvider, cover_art};
pub use model::{Track, TrackMetadata};
pub use scan::{ScanOutcome, scan};

#[cfg(test)]
mod tests;
