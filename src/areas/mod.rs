//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area for tracking file changes
//! - `lockfile`: Advisory lock guard and atomic file replacement
//! - `refs`: Reference management (branches, HEAD)
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod lockfile;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod workspace;
