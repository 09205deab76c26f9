//! The skip list: basenames that never make it into a playlist again.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// Filenames (basename only) excluded from scans.
///
/// Only grows during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.names.contains(file_name)
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, file_name: impl Into<String>) -> bool {
        self.names.insert(file_name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Durable home of the ignore set.
pub trait IgnoreStore: Send {
    fn load(&self) -> Result<IgnoreSet, PersistenceError>;
    fn append(&self, file_name: &str) -> Result<(), PersistenceError>;
}

/// One filename per line in a plain text file.
#[derive(Debug, Clone)]
pub struct FileIgnoreStore {
    path: PathBuf,
}

impl FileIgnoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IgnoreStore for FileIgnoreStore {
    fn load(&self) -> Result<IgnoreSet, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            // A missing file just means nothing has been skipped yet.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IgnoreSet::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect())
    }

    fn append(&self, file_name: &str) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;

        // A hand-edited list may lack the trailing newline.
        let mut line = String::new();
        if file.metadata().map_err(write_err)?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).map_err(write_err)?;
            file.read_exact(&mut last).map_err(write_err)?;
            if last[0] != b'\n' {
                line.push('\n');
            }
        }
        line.push_str(file_name);
        line.push('\n');
        file.write_all(line.as_bytes()).map_err(write_err)
    }
}
