//! Staging index
//!
//! The index is the staging area that tracks which files should be included
//! in the next commit. Each entry records a path, the blob holding its
//! staged content, and the stat fields used for change detection.
//!
//! ## File Format
//!
//! Plain text, one entry per line:
//!
//! ```text
//! <40-hex-oid> <mtime-seconds> <size-bytes> <path>
//! ```
//!
//! Entries keep their insertion order on disk: staging an already-tracked
//! path overwrites its line in place, a new path appends. Lines that fail to
//! parse are skipped with a warning.

use crate::areas::lockfile::{LockFile, atomic_write};
use crate::artifacts::index::IndexEntry;
use std::io::Read;
use std::ops::DerefMut;
use std::path::Path;

/// Staging index
///
/// Tracks files staged for the next commit along with their metadata.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.vcs/index`)
    path: Box<Path>,
    /// Staged entries in insertion order, unique by path
    entries: Vec<IndexEntry>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: Vec::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an entry by its path
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// A missing file yields an empty index. Malformed lines are skipped
    /// with a warning rather than failing the whole load.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;
        drop(lock);

        for line in content.lines() {
            match IndexEntry::parse_line(line) {
                Ok(entry) => self.upsert(entry),
                Err(err) => log::warn!("skipping malformed index line {:?}: {}", line, err),
            }
        }
        self.changed = false;

        Ok(())
    }

    /// Stage an entry: an existing path is overwritten in place, a new path
    /// appends.
    pub fn add(&mut self, entry: IndexEntry) {
        self.upsert(entry);
        self.changed = true;
    }

    fn upsert(&mut self, entry: IndexEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.path == entry.path)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove an entry; returns whether the path was tracked.
    pub fn remove(&mut self, path: &Path) -> bool {
        let count_before = self.entries.len();
        self.entries.retain(|entry| entry.path != path);

        let removed = self.entries.len() != count_before;
        if removed {
            self.changed = true;
        }
        removed
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the index atomically
    ///
    /// Serializes all entries and replaces the index file through a
    /// temporary sibling, holding a `.lock` guard for the duration.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let _lock = LockFile::acquire(self.path())?;

        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&entry.format_line()?);
            contents.push('\n');
        }

        atomic_write(self.path(), contents.as_bytes())?;
        self.changed = false;

        Ok(())
    }
}
