//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch name validation
//! - `core`: Shared utilities (typed errors, pager wrapper)
//! - `history`: Commit graph traversal (first-parent walk, merge base)
//! - `index`: Staging area entry types
//! - `objects`: Object types (blob, tree, commit)

pub mod branch;
pub mod core;
pub mod history;
pub mod index;
pub mod objects;
