//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 hashes. There are
//! three object kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Snapshot listing (names, modes, and object IDs)
//! - **Commit**: History node with metadata (author, message, parent, tree)
//!
//! All objects implement serialization/deserialization for the common object
//! framing: `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_RAW_LENGTH: usize = 20;

/// Shortest accepted abbreviated object id
pub const MIN_PREFIX_LENGTH: usize = 7;
