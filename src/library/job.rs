//! Background scans.
//!
//! A scan can take a while on a large folder, so it runs on its own thread
//! and reports back through a callback. Each scan carries the ticket the
//! controller issued for it; a result whose ticket is no longer the latest
//! is simply dropped by the receiver.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::ignore::IgnoreSet;
use super::metadata::MetadataProvider;
use super::scan::{ScanOutcome, scan};

/// What to do with the tracks once the scan lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// "Open folder": the new tracks become the whole playlist.
    Replace,
    /// "Add folder": the new tracks go after the existing ones.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    pub generation: u64,
    pub mode: ScanMode,
}

#[derive(Debug)]
pub struct ScanCompleted {
    pub ticket: ScanTicket,
    pub root: PathBuf,
    pub result: Result<ScanOutcome, ScanError>,
}

/// Run [`scan`] on a new thread and hand the result to `deliver`.
///
/// `ignore` is a snapshot; names skipped while the scan runs only affect later
/// scans.
pub fn spawn_scan<F>(
    ticket: ScanTicket,
    root: PathBuf,
    settings: LibrarySettings,
    ignore: IgnoreSet,
    provider: Arc<dyn MetadataProvider>,
    deliver: F,
) -> JoinHandle<()>
where
    F: FnOnce(ScanCompleted) + Send + 'static,
{
    thread::spawn(move || {
        let result = scan(&root, &settings, &ignore, provider.as_ref());
        deliver(ScanCompleted {
            ticket,
            root,
            result,
        });
    })
}
