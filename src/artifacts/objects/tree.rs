//! Tree object
//!
//! Trees represent snapshots of the staged files. Each entry pairs a path
//! with the blob holding its content.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are sorted by name and unique; every entry carries the regular
//! file mode. Nested snapshots (tree entries pointing at trees) are an
//! extension point, not part of the current format.

use crate::artifacts::core::error::VcsError;
use crate::artifacts::index::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// File mode recorded for every tree entry
pub const REGULAR_FILE_MODE: &str = "100644";

/// Tree object representing a snapshot of staged paths
///
/// The entry map keeps names sorted and unique, which the on-disk format
/// requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    /// Build a tree from staged index entries
    ///
    /// Entry names are the staged paths; insertion into the map establishes
    /// the sorted order the serializer relies on.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut tree = Self::default();

        for entry in entries {
            let name = entry
                .path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("invalid path in index: {:?}", entry.path))?;
            tree.entries.insert(name.to_string(), entry.oid.clone());
        }

        Ok(tree)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, oid) in &self.entries {
            write!(content_bytes, "{} {}", REGULAR_FILE_MODE, name)?;
            content_bytes.push(0);
            oid.write_raw_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!(VcsError::Corrupt("unexpected EOF in tree entry mode".into()));
            }
            if mode_bytes.is_empty() || !mode_bytes.iter().all(|b| b.is_ascii_digit()) {
                anyhow::bail!(VcsError::Corrupt("invalid tree entry mode".into()));
            }

            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                anyhow::bail!(VcsError::Corrupt("unexpected EOF in tree entry name".into()));
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| VcsError::Corrupt("tree entry name is not valid utf-8".into()))?
                .to_owned();

            let oid = ObjectId::read_raw_from(&mut reader)
                .map_err(|_| VcsError::Corrupt("unexpected EOF in tree entry object id".into()))?;

            if entries.insert(name, oid).is_some() {
                anyhow::bail!(VcsError::Corrupt("duplicate tree entry name".into()));
            }
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, oid)| format!("{} blob {}\t{}", REGULAR_FILE_MODE, oid.as_ref(), name))
            .collect::<Vec<String>>()
            .join("\n")
    }
}
