//! Repository abstraction and coordination
//!
//! This module provides the main `Repository` type that coordinates all
//! repository operations. It acts as a facade over the lower-level
//! components (database, index, workspace, refs) and implements high-level
//! commands.
//!
//! ## Architecture
//!
//! The repository maintains references to:
//! - Database: Object storage (blobs, trees, commits)
//! - Index: Staging area for tracking changes
//! - Workspace: Working directory operations
//! - Refs: Branch and HEAD management
//!
//! ## Thread Safety
//!
//! The index is wrapped in Arc<Mutex<>> to allow safe concurrent access,
//! while other components use interior mutability where needed.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::VcsError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Repository directory name
pub const VCS_DIR: &str = ".vcs";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Config file name
pub const CONFIG_FILE: &str = "config";

/// Repository handle
///
/// Coordinates all repository operations and provides access to the
/// database, index, workspace, and refs subsystems. This is the main entry
/// point for all operations; owning the root path here keeps every derived
/// path local to the handle, so multiple repositories can coexist in one
/// process.
pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout or pager)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Index (staging area) with thread-safe access
    index: Arc<Mutex<Index>>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl Repository {
    /// Open (or prepare to create) a repository rooted at `path`
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let vcs_path = path.join(VCS_DIR);
        let index = Index::new(vcs_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(vcs_path.join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(vcs_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    /// Locate an existing repository by walking up from `start`
    pub fn discover(start: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = start.canonicalize()?;
        let mut current = Some(start.as_path());

        while let Some(dir) = current {
            if dir.join(VCS_DIR).join("HEAD").is_file() {
                return Self::new(dir.to_path_buf(), writer);
            }
            current = dir.parent();
        }

        anyhow::bail!(VcsError::NotARepository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vcs_path(&self) -> PathBuf {
        self.path.join(VCS_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
