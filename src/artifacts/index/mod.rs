//! Staging area entry types
//!
//! Each entry records a staged file: its path, the blob object ID of its
//! content, and the stat fields used for change detection.
//!
//! ## Entry Format
//!
//! One line per entry: `<hex-oid> <mtime> <size> <path>`. The path takes the
//! remainder of the line, so names with embedded spaces survive a round
//! trip. Paths with a trailing newline or leading spaces are not supported.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::PathBuf;

/// Index entry representing a staged file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the repository root
    pub path: PathBuf,
    /// SHA-1 hash of the staged blob
    pub oid: ObjectId,
    /// Modification time (seconds since Unix epoch)
    pub mtime: i64,
    /// File size in bytes
    pub size: u64,
}

impl IndexEntry {
    /// Parse a single index line
    pub fn parse_line(line: &str) -> anyhow::Result<Self> {
        let mut fields = line.splitn(4, ' ');

        let oid = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing object id field"))?;
        let oid = ObjectId::try_parse(oid.to_string())?;

        let mtime = fields
            .next()
            .and_then(|field| field.parse::<i64>().ok())
            .ok_or_else(|| anyhow::anyhow!("invalid mtime field"))?;

        let size = fields
            .next()
            .and_then(|field| field.parse::<u64>().ok())
            .ok_or_else(|| anyhow::anyhow!("invalid size field"))?;

        let path = fields
            .next()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing path field"))?;

        Ok(IndexEntry::new(PathBuf::from(path), oid, mtime, size))
    }

    /// Render the entry as an index line (without the trailing newline)
    pub fn format_line(&self) -> anyhow::Result<String> {
        let path = self
            .path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("invalid path in index: {:?}", self.path))?;

        Ok(format!(
            "{} {} {} {}",
            self.oid.as_ref(),
            self.mtime,
            self.size,
            path
        ))
    }
}
