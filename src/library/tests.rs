use super::scan::list_candidates;
use super::*;
use crate::config::LibrarySettings;
use crate::error::MetadataError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Durations keyed by basename; anything missing fails to read.
struct FakeMetadata {
    durations: HashMap<String, u64>,
}

impl FakeMetadata {
    fn new(entries: &[(&str, u64)]) -> Self {
        Self {
            durations: entries
                .iter()
                .map(|(name, secs)| (name.to_string(), *secs))
                .collect(),
        }
    }
}

impl MetadataProvider for FakeMetadata {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        self.durations
            .get(name)
            .map(|secs| TrackMetadata {
                duration: Duration::from_secs(*secs),
                ..TrackMetadata::default()
            })
            .ok_or_else(|| MetadataError::new(path, "no tags"))
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"not really audio").unwrap();
}

fn names(tracks: &[Track]) -> Vec<String> {
    let mut v: Vec<String> = tracks
        .iter()
        .map(|t| t.file_name().unwrap().to_string())
        .collect();
    v.sort();
    v
}

#[test]
fn scan_excludes_ignored_basenames() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3");
    touch(dir.path(), "b.mp3");

    let provider = FakeMetadata::new(&[("a.mp3", 30), ("b.mp3", 30)]);
    let ignore: IgnoreSet = ["b.mp3"].into_iter().collect();
    let out = scan(dir.path(), &LibrarySettings::default(), &ignore, &provider).unwrap();

    assert_eq!(names(&out.tracks), vec!["a.mp3"]);
    assert_eq!(out.ignored, 1);
    assert!(out.failures.is_empty());
}

#[test]
fn scan_threshold_is_inclusive() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "short.mp3");
    touch(dir.path(), "exact.mp3");
    touch(dir.path(), "long.flac");

    let provider = FakeMetadata::new(&[("short.mp3", 15), ("exact.mp3", 20), ("long.flac", 300)]);
    let out = scan(
        dir.path(),
        &LibrarySettings::default(),
        &IgnoreSet::new(),
        &provider,
    )
    .unwrap();

    assert_eq!(names(&out.tracks), vec!["exact.mp3", "long.flac"]);
    assert_eq!(out.too_short, 1);
}

#[test]
fn scan_records_unreadable_files_and_keeps_going() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "good.mp3");
    touch(dir.path(), "broken.mp3");

    let provider = FakeMetadata::new(&[("good.mp3", 60)]);
    let out = scan(
        dir.path(),
        &LibrarySettings::default(),
        &IgnoreSet::new(),
        &provider,
    )
    .unwrap();

    assert_eq!(names(&out.tracks), vec!["good.mp3"]);
    assert_eq!(out.failures.len(), 1);
    assert!(out.failures[0].path.ends_with("broken.mp3"));
    assert!(out.failures[0].error.to_string().contains("no tags"));
}

#[test]
fn scan_filters_extensions_and_recurses() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("disc 2");
    fs::create_dir_all(&sub).unwrap();
    touch(dir.path(), "one.MP3");
    touch(dir.path(), "cover.jpg");
    touch(dir.path(), "notes.txt");
    touch(&sub, "two.flac");

    let provider = FakeMetadata::new(&[("one.MP3", 90), ("two.flac", 90)]);
    let out = scan(
        dir.path(),
        &LibrarySettings::default(),
        &IgnoreSet::new(),
        &provider,
    )
    .unwrap();

    assert_eq!(names(&out.tracks), vec!["one.MP3", "two.flac"]);
    assert!(out.failures.is_empty());
    assert!(out.tracks.iter().all(|t| t.path.is_absolute()));
}

#[test]
fn scan_respects_recursive_false_and_hidden() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    touch(dir.path(), "root.mp3");
    touch(dir.path(), ".hidden.mp3");
    touch(&sub, "child.mp3");

    let settings = LibrarySettings {
        recursive: false,
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let candidates = list_candidates(dir.path(), &settings);
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].ends_with("root.mp3"));
}

#[test]
fn scan_of_missing_folder_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let provider = FakeMetadata::new(&[]);
    let err = scan(&missing, &LibrarySettings::default(), &IgnoreSet::new(), &provider);
    assert!(err.is_err());
}

/// Blocks each read until a second read is in flight (or a timeout passes),
/// and remembers the highest concurrency it saw.
struct RendezvousMetadata {
    state: Mutex<(usize, usize)>,
    cv: Condvar,
}

impl MetadataProvider for RendezvousMetadata {
    fn read(&self, _path: &Path) -> Result<TrackMetadata, MetadataError> {
        let mut guard = self.state.lock().unwrap();
        guard.0 += 1;
        guard.1 = guard.1.max(guard.0);
        self.cv.notify_all();
        let (mut guard, _) = self
            .cv
            .wait_timeout_while(guard, Duration::from_secs(2), |s| s.1 < 2)
            .unwrap();
        guard.0 -= 1;
        Ok(TrackMetadata {
            duration: Duration::from_secs(60),
            ..TrackMetadata::default()
        })
    }
}

#[test]
fn scan_reads_metadata_in_parallel() {
    let dir = tempdir().unwrap();
    for name in ["a.mp3", "b.mp3", "c.mp3", "d.mp3"] {
        touch(dir.path(), name);
    }

    let provider = RendezvousMetadata {
        state: Mutex::new((0, 0)),
        cv: Condvar::new(),
    };
    let settings = LibrarySettings {
        scan_workers: Some(4),
        ..LibrarySettings::default()
    };
    let out = scan(dir.path(), &settings, &IgnoreSet::new(), &provider).unwrap();

    assert_eq!(out.tracks.len(), 4);
    assert!(provider.state.lock().unwrap().1 >= 2);
}

#[test]
fn spawn_scan_delivers_with_its_ticket() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "x.mp3");
    touch(dir.path(), "y.flac");

    let (tx, rx) = mpsc::channel();
    let ticket = ScanTicket {
        generation: 7,
        mode: ScanMode::Append,
    };
    let provider: Arc<dyn MetadataProvider> =
        Arc::new(FakeMetadata::new(&[("x.mp3", 25), ("y.flac", 25)]));
    spawn_scan(
        ticket,
        dir.path().to_path_buf(),
        LibrarySettings::default(),
        IgnoreSet::new(),
        provider,
        move |done| {
            let _ = tx.send(done);
        },
    );

    let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(done.ticket, ticket);
    assert_eq!(names(&done.result.unwrap().tracks), vec!["x.mp3", "y.flac"]);
}

#[test]
fn file_ignore_store_round_trips_and_tolerates_missing_file() {
    let dir = tempdir().unwrap();
    let store = FileIgnoreStore::new(dir.path().join("state").join("ignorelist.txt"));

    assert!(store.load().unwrap().is_empty());

    store.append("intro.mp3").unwrap();
    store.append("skit.flac").unwrap();
    fs::write(
        store.path(),
        format!("{}\n\n", fs::read_to_string(store.path()).unwrap()),
    )
    .unwrap();

    let set = store.load().unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("intro.mp3"));
    assert!(set.contains("skit.flac"));
}

#[test]
fn append_starts_a_fresh_line_after_a_hand_edited_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ignorelist.txt");
    fs::write(&path, "hand-edited.mp3").unwrap();

    let store = FileIgnoreStore::new(&path);
    store.append("skipped.mp3").unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "hand-edited.mp3\nskipped.mp3\n"
    );
    let set = store.load().unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("hand-edited.mp3"));
    assert!(set.contains("skipped.mp3"));
}

#[test]
fn ignore_set_only_grows() {
    let mut set = IgnoreSet::new();
    assert!(set.insert("a.mp3"));
    assert!(!set.insert("a.mp3"));
    assert_eq!(set.len(), 1);
}

#[test]
fn track_file_name_is_the_basename() {
    let t = Track::new("/music/Album/01 Song.flac");
    assert_eq!(t.file_name(), Some("01 Song.flac"));
}

#[test]
fn album_label_strips_configured_phrases() {
    let strip = vec!["Original Sound Track".to_string()];
    assert_eq!(
        album_label(Some("Halo 3 Original Sound Track"), &strip),
        Some("Halo 3".to_string())
    );
    assert_eq!(album_label(Some("Original Sound Track"), &strip), None);
    assert_eq!(album_label(None, &strip), None);
}

#[test]
fn now_playing_text_prefers_album_dash_title() {
    let strip = vec!["Original Sound Track".to_string()];
    let p = Path::new("/m/track01.mp3");
    let meta = TrackMetadata {
        title: Some("Opening".into()),
        album: Some("Journey Original Sound Track".into()),
        ..TrackMetadata::default()
    };
    assert_eq!(now_playing_text(p, Some(&meta), &strip), "Journey - Opening");

    let bare = TrackMetadata::default();
    assert_eq!(now_playing_text(p, Some(&bare), &strip), "track01");
    assert_eq!(now_playing_text(p, None, &strip), "track01");
}

#[test]
fn list_entry_numbers_rows_and_shows_length() {
    let meta = TrackMetadata {
        duration: Duration::from_secs(205),
        title: Some("Song".into()),
        album: Some("Album".into()),
        picture: None,
    };
    let row = list_entry(3, Path::new("/m/s.mp3"), Some(&meta), &[]);
    assert_eq!(row.primary, "03. Song");
    assert_eq!(row.secondary, "Album | 03:25");

    let row = list_entry(12, Path::new("/m/s.mp3"), None, &[]);
    assert_eq!(row.primary, "12. s");
    assert_eq!(row.secondary, " | --:--");
}

#[test]
fn position_text_formats_both_halves() {
    assert_eq!(
        position_text(Duration::from_secs(65), Some(Duration::from_secs(200))),
        "01:05 / 03:20"
    );
    assert_eq!(position_text(Duration::from_secs(5), None), "00:05");
}

#[test]
fn cover_art_prefers_embedded_then_png_then_jpg() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");

    let embedded = TrackMetadata {
        picture: Some(vec![1, 2, 3]),
        ..TrackMetadata::default()
    };
    assert_eq!(
        cover_art(&song, &embedded),
        Some(Artwork::Embedded(vec![1, 2, 3]))
    );

    let plain = TrackMetadata::default();
    assert_eq!(cover_art(&song, &plain), None);

    touch(dir.path(), "cover.jpg");
    assert_eq!(
        cover_art(&song, &plain),
        Some(Artwork::File(dir.path().join("cover.jpg")))
    );

    touch(dir.path(), "cover.png");
    assert_eq!(
        cover_art(&song, &plain),
        Some(Artwork::File(dir.path().join("cover.png")))
    );
}
