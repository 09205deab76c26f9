use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{MetadataError, ScanError};

use super::ignore::IgnoreSet;
use super::metadata::MetadataProvider;
use super::model::Track;

/// A candidate whose metadata could not be read.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: MetadataError,
}

/// Everything one scan produced.
///
/// `tracks` is in worker completion order, which is not meaningful.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub tracks: Vec<Track>,
    pub failures: Vec<ScanFailure>,
    pub ignored: usize,
    pub too_short: usize,
}

enum Verdict {
    Accepted(Track),
    Ignored,
    TooShort,
    Failed(MetadataError),
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_allowed_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Every file under `dir` whose extension is on the allowlist.
pub fn list_candidates(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_allowed_extension(path, &exts))
        .collect()
}

fn validate(
    path: &Path,
    settings: &LibrarySettings,
    ignore: &IgnoreSet,
    provider: &dyn MetadataProvider,
) -> Verdict {
    let track = Track::new(path);
    if track.file_name().is_some_and(|name| ignore.contains(name)) {
        return Verdict::Ignored;
    }

    match provider.read(path) {
        Ok(meta) if meta.duration >= settings.min_duration() => Verdict::Accepted(track),
        Ok(_) => Verdict::TooShort,
        Err(e) => Verdict::Failed(e),
    }
}

/// Size of a dedicated scan pool, or `None` to use rayon's global pool.
fn worker_count(settings: &LibrarySettings, candidates: usize) -> Option<usize> {
    settings
        .scan_workers
        .map(|wanted| wanted.clamp(1, candidates.max(1)))
}

/// Scan `dir` and keep every candidate that is long enough and not ignored.
///
/// Metadata is read in parallel with rayon; the call returns once every
/// candidate has been looked at. Unreadable files end up in
/// [`ScanOutcome::failures`] and never abort the scan.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    ignore: &IgnoreSet,
    provider: &dyn MetadataProvider,
) -> Result<ScanOutcome, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    let root = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let candidates = list_candidates(&root, settings);
    log::debug!(
        "validating {} candidates under {}",
        candidates.len(),
        root.display()
    );

    let outcome = Mutex::new(ScanOutcome::default());
    let validate_all = || {
        candidates.par_iter().for_each(|path| {
            let verdict = validate(path, settings, ignore, provider);
            let mut out = outcome.lock().unwrap_or_else(PoisonError::into_inner);
            match verdict {
                Verdict::Accepted(track) => out.tracks.push(track),
                Verdict::Ignored => out.ignored += 1,
                Verdict::TooShort => out.too_short += 1,
                Verdict::Failed(error) => {
                    log::debug!("{error}");
                    out.failures.push(ScanFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        })
    };

    match worker_count(settings, candidates.len()) {
        Some(workers) => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(validate_all),
            Err(e) => {
                log::warn!("cannot start {workers} scan workers ({e}), using the shared pool");
                validate_all();
            }
        },
        None => validate_all(),
    }

    let outcome = outcome.into_inner().unwrap_or_else(PoisonError::into_inner);
    log::info!(
        "scanned {}: {} playable, {} ignored, {} too short, {} unreadable",
        root.display(),
        outcome.tracks.len(),
        outcome.ignored,
        outcome.too_short,
        outcome.failures.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_insensitive_and_dot_tolerant() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), "flac".into(), "  ".into()],
            ..LibrarySettings::default()
        };
        let exts = normalized_extensions(&settings);
        assert_eq!(exts, vec!["mp3".to_string(), "flac".to_string()]);

        assert!(has_allowed_extension(Path::new("/tmp/a.mp3"), &exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.Mp3"), &exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.FLAC"), &exts));
        assert!(!has_allowed_extension(Path::new("/tmp/a.ogg"), &exts));
        assert!(!has_allowed_extension(Path::new("/tmp/mp3"), &exts));
    }

    #[test]
    fn worker_count_never_exceeds_candidates() {
        let settings = LibrarySettings {
            scan_workers: Some(8),
            ..LibrarySettings::default()
        };
        assert_eq!(worker_count(&settings, 3), Some(3));
        assert_eq!(worker_count(&settings, 100), Some(8));
        assert_eq!(worker_count(&settings, 0), Some(1));
        assert_eq!(worker_count(&LibrarySettings::default(), 10), None);
    }
}
