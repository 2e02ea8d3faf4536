//! Object database
//!
//! The database stores all objects (blobs, trees, commits) using
//! content-addressable storage. Objects are identified by their SHA-1 hash
//! and stored in a directory structure based on the hash prefix for
//! efficient lookup.
//!
//! ## Storage Format
//!
//! Objects are stored as:
//! - Path: `.vcs/objects/ab/cdef123...` (first 2 chars as directory, rest as filename)
//! - Content: Compressed (zlib) format containing type, size, and data
//!
//! Writes go through a temporary sibling file renamed into place, so a
//! reader sees either the complete object or none at all. Since paths are
//! content-addressed, concurrent writers of identical content converge.

use crate::artifacts::core::error::VcsError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Object database
///
/// Manages storage and retrieval of content-addressable objects.
/// All objects are identified by their SHA-1 hash and stored in compressed
/// format.
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.vcs/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Get the path to the objects directory
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object in the database
    ///
    /// The object is serialized and written to the path derived from its
    /// SHA-1 hash. If the object already exists, nothing is rewritten.
    ///
    /// # Returns
    ///
    /// The object's ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            log::debug!("stored {} object {}", object.object_type(), object_id);
        }

        Ok(object_id)
    }

    /// Whether an object with this ID exists in the database
    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Parse an object from the database into the appropriate type
    ///
    /// Loads the object, determines its type, and deserializes it into
    /// the corresponding struct (Blob, Tree, or Commit).
    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    /// Parse an object as a Blob, if it is one
    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Tree, if it is one
    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Commit, if it is one
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.exists() {
            anyhow::bail!(VcsError::ObjectNotFound(object_id.to_string()));
        }

        let object_content = self.read_object(object_path)?;
        let total_len = object_content.len();

        let mut object_reader = Cursor::new(object_content);
        let (object_type, declared_size) = ObjectType::parse_header(&mut object_reader)?;

        let payload_len = total_len - object_reader.position() as usize;
        if payload_len != declared_size {
            anyhow::bail!(VcsError::Corrupt(format!(
                "object {} declares {} payload bytes but carries {}",
                object_id, declared_size, payload_len
            )));
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        // compress the object content
        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|err| {
                VcsError::Corrupt(format!("unable to decompress object content: {err}"))
            })?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose OID starts with the given prefix
    ///
    /// Used to resolve abbreviated OIDs to their full form. Prefixes shorter
    /// than the shard directory name match nothing.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        if prefix.len() < 2 {
            return Ok(matches);
        }

        let dir_name = &prefix[..2];
        let file_prefix = &prefix[2..];
        let dir_path = self.path.join(dir_name);

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix) {
                    if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                        matches.push(oid);
                    }
                }
            }
        }

        Ok(matches)
    }

    /// Resolve a full or abbreviated object ID to a stored object
    ///
    /// Abbreviations must be at least 7 hex characters and unambiguous.
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.len() < MIN_PREFIX_LENGTH
            || prefix.len() > OBJECT_ID_LENGTH
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            anyhow::bail!(VcsError::BadOid(prefix.to_string()));
        }

        if prefix.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(prefix.to_string())?;
            if !self.contains(&oid) {
                anyhow::bail!(VcsError::ObjectNotFound(prefix.to_string()));
            }
            return Ok(oid);
        }

        let mut matches = self.find_objects_by_prefix(&prefix.to_ascii_lowercase())?;
        match matches.len() {
            0 => anyhow::bail!(VcsError::ObjectNotFound(prefix.to_string())),
            1 => Ok(matches.remove(0)),
            _ => anyhow::bail!(VcsError::AmbiguousOid(prefix.to_string())),
        }
    }
}
