//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (the staged snapshot)
//! - An optional parent commit ID (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <identity> <unix-seconds>
//! committer <identity> <unix-seconds>
//!
//! <commit message>
//! ```
//!
//! The identity is an opaque printable string (conventionally
//! `Name <email>`); the timestamp is decimal Unix seconds with no timezone
//! offset. Unknown header lines are skipped on decode.

use crate::artifacts::core::error::VcsError;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Author or committer information
///
/// Pairs an opaque identity string with a timestamp. The identity may itself
/// contain spaces, so the header line is split from the right when parsing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    identity: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(identity: String) -> Self {
        Author {
            identity,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn new_with_timestamp(identity: String, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        Author {
            identity,
            timestamp,
        }
    }

    /// Header form: `<identity> <unix-seconds>`
    pub fn display(&self) -> String {
        format!("{} {}", self.identity, self.timestamp.timestamp())
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        self.timestamp
    }

    /// Format timestamp in human-readable form for log output
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y").to_string()
    }

    /// Build the commit identity from the environment
    ///
    /// `VIT_AUTHOR_NAME`/`VIT_AUTHOR_EMAIL` take precedence; otherwise the
    /// identity is derived from `USER`/`HOSTNAME` with fixed fallbacks.
    pub fn load_from_env() -> Self {
        let name = std::env::var("VIT_AUTHOR_NAME").ok();
        let email = std::env::var("VIT_AUTHOR_EMAIL").ok();

        let identity = match (name, email) {
            (Some(name), Some(email)) => format!("{} <{}>", name, email),
            _ => {
                let user = std::env::var("USER").unwrap_or_else(|_| "you".to_string());
                let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
                format!("{} <{}@{}>", user, user, host)
            }
        };

        Author::new(identity)
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "<identity> <unix-seconds>"; the identity may contain
        // spaces, so split on the last one.
        let (identity, seconds) = value
            .rsplit_once(' ')
            .ok_or_else(|| VcsError::Corrupt("invalid author line".into()))?;
        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| VcsError::Corrupt("invalid author timestamp".into()))?;
        let timestamp = chrono::DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| VcsError::Corrupt("author timestamp out of range".into()))?;

        Ok(Author {
            identity: identity.to_string(),
            timestamp,
        })
    }
}

/// Commit object
///
/// Represents a snapshot of the repository with metadata. Non-merge and
/// merge commits alike carry at most one parent; the merged branch tip is
/// not recorded as a second parent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID (absent for the root commit)
    parent: Option<ObjectId>,
    /// Tree object ID representing the snapshot
    tree_oid: ObjectId,
    /// Author who wrote the changes
    author: Author,
    /// Committer who recorded the commit
    committer: Author,
    /// Commit message
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("author {}", self.author.display()));
        object_content.push(format!("committer {}", self.committer.display()));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let mut object_content = object_content.join("\n");
        if !object_content.ends_with('\n') {
            object_content.push('\n');
        }

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), object_content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(object_content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)
            .map_err(|_| VcsError::Corrupt("commit payload is not valid utf-8".into()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| VcsError::Corrupt("commit object: missing message separator".into()))?;
        let message = message.strip_suffix('\n').unwrap_or(message).to_string();

        let mut tree_oid = None;
        let mut parent = None;
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            if let Some(rest) = line.strip_prefix("tree ") {
                tree_oid = Some(ObjectId::try_parse(rest.to_string())?);
            } else if let Some(rest) = line.strip_prefix("parent ") {
                // the first parent wins; later ones would not be walked anyway
                if parent.is_none() {
                    parent = Some(ObjectId::try_parse(rest.to_string())?);
                }
            } else if let Some(rest) = line.strip_prefix("author ") {
                author = Some(Author::try_from(rest)?);
            } else if let Some(rest) = line.strip_prefix("committer ") {
                committer = Some(Author::try_from(rest)?);
            }
            // unknown header lines are skipped
        }

        let tree_oid = tree_oid
            .ok_or_else(|| VcsError::Corrupt("commit object: missing tree header".into()))?;
        let author = author
            .ok_or_else(|| VcsError::Corrupt("commit object: missing author header".into()))?;
        let committer = committer.unwrap_or_else(|| author.clone());

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
