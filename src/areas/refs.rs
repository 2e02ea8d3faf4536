//! References and HEAD
//!
//! This module manages references: human-readable names pointing to commits.
//!
//! ## Reference Types
//!
//! - HEAD: Special reference pointing to the current branch or commit
//! - Branches: `refs/heads/*` pointing to branch tip commits
//!
//! ## File Format
//!
//! A branch ref is a text file containing a 40-character SHA-1 followed by a
//! newline. HEAD contains either `ref: refs/heads/<name>` (attached) or a
//! bare SHA-1 (detached). An attached HEAD whose branch ref does not exist
//! yet is an unborn branch: the position a freshly initialized repository is
//! in before its first commit.
//!
//! All mutations replace the target file through a temporary sibling plus
//! rename, guarded by a `.lock` sibling file.

use crate::areas::lockfile::{LockFile, atomic_write};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::VcsError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing the attached HEAD form
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Current position in history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a branch that has no commits yet
    Unborn(BranchName),
    /// HEAD follows a branch ref
    Attached { branch: BranchName, oid: ObjectId },
    /// HEAD pins a raw object id
    Detached(ObjectId),
}

/// References manager
///
/// Handles reading and writing references (branches and HEAD).
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.vcs`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.heads_path().join(name.as_ref()).into_boxed_path()
    }

    /// Write `oid` to the branch ref, creating parent directories
    pub fn write_ref(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.branch_path(name);

        std::fs::create_dir_all(ref_path.parent().with_context(|| {
            format!("failed to locate parent directory for ref at {:?}", ref_path)
        })?)?;

        let _lock = LockFile::acquire(&ref_path)?;
        atomic_write(&ref_path, format!("{}\n", oid.as_ref()).as_bytes())
    }

    /// Read a branch ref; `None` when the branch has no ref yet
    pub fn read_ref(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.branch_path(name);
        if !ref_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&ref_path)
            .with_context(|| format!("failed to read ref file at {:?}", ref_path))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Point HEAD at `target`
    ///
    /// Exactly 40 hex characters detach HEAD to that object id; anything
    /// else is treated as a branch name. The rule is purely syntactic; the
    /// callers that accept user input validate their target first.
    pub fn update_head(&self, target: &str) -> anyhow::Result<()> {
        let head_path = self.head_path();
        let _lock = LockFile::acquire(&head_path)?;

        let contents = if target.len() == OBJECT_ID_LENGTH
            && target.chars().all(|c| c.is_ascii_hexdigit())
        {
            format!("{}\n", target.to_ascii_lowercase())
        } else {
            format!("ref: refs/heads/{}\n", target)
        };

        atomic_write(&head_path, contents.as_bytes())
    }

    /// Parse HEAD into its three states
    pub fn head(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref) = symref {
            let branch = BranchName::try_parse(symref[1].to_string())?;
            match self.read_ref(&branch)? {
                Some(oid) => Ok(Head::Attached { branch, oid }),
                None => Ok(Head::Unborn(branch)),
            }
        } else {
            Ok(Head::Detached(ObjectId::try_parse(content.to_string())?))
        }
    }

    /// Object id HEAD currently resolves to, if any
    ///
    /// Follows the single level of indirection of an attached HEAD.
    pub fn head_commit(&self) -> anyhow::Result<Option<ObjectId>> {
        Ok(match self.head()? {
            Head::Unborn(_) => None,
            Head::Attached { oid, .. } => Some(oid),
            Head::Detached(oid) => Some(oid),
        })
    }

    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        Ok(match self.head()? {
            Head::Unborn(branch) | Head::Attached { branch, .. } => Some(branch),
            Head::Detached(_) => None,
        })
    }

    pub fn is_head_detached(&self) -> anyhow::Result<bool> {
        Ok(matches!(self.head()?, Head::Detached(_)))
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            anyhow::bail!(VcsError::BranchAlreadyExists(name.to_string()));
        }

        self.write_ref(name, source_oid)
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if self.current_branch()?.as_ref() == Some(name) {
            anyhow::bail!(VcsError::BranchIsCurrent(name.to_string()));
        }

        let branch_path = self.branch_path(name);
        match self.read_ref(name)? {
            Some(oid) => {
                std::fs::remove_file(branch_path.as_ref()).with_context(|| {
                    format!("failed to delete branch file at {:?}", branch_path)
                })?;
                self.prune_branch_empty_parent_dirs(branch_path.as_ref())?;

                Ok(oid)
            }
            None => anyhow::bail!(VcsError::BranchNotFound(name.to_string())),
        }
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).exists()
    }

    /// All branches under `refs/heads`, dotfiles excluded, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(heads_path.as_ref()).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    const OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    fn test_refs() -> (assert_fs::TempDir, Refs) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        let vcs_path = dir.path().join(".vcs");
        std::fs::create_dir_all(vcs_path.join("refs").join("heads")).unwrap();
        let refs = Refs::new(vcs_path.into_boxed_path());
        (dir, refs)
    }

    fn oid() -> ObjectId {
        ObjectId::try_parse(OID.to_string()).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[test]
    fn head_starts_unborn_and_becomes_attached() {
        let (_dir, refs) = test_refs();
        refs.update_head("master").unwrap();

        assert_eq!(refs.head().unwrap(), Head::Unborn(branch("master")));
        assert_eq!(refs.head_commit().unwrap(), None);

        refs.write_ref(&branch("master"), &oid()).unwrap();
        assert_eq!(
            refs.head().unwrap(),
            Head::Attached {
                branch: branch("master"),
                oid: oid()
            }
        );
        assert_eq!(refs.head_commit().unwrap(), Some(oid()));
    }

    #[test]
    fn forty_hex_chars_detach_head() {
        let (_dir, refs) = test_refs();
        refs.update_head(OID).unwrap();

        assert_eq!(refs.head().unwrap(), Head::Detached(oid()));
        assert!(refs.is_head_detached().unwrap());
        assert_eq!(refs.current_branch().unwrap(), None);

        let head_contents = std::fs::read_to_string(refs.head_path()).unwrap();
        assert_eq!(head_contents, format!("{}\n", OID));
    }

    #[test]
    fn ref_file_carries_oid_and_newline() {
        let (_dir, refs) = test_refs();
        refs.write_ref(&branch("feat"), &oid()).unwrap();

        let ref_contents =
            std::fs::read_to_string(refs.heads_path().join("feat")).unwrap();
        assert_eq!(ref_contents, format!("{}\n", OID));
        assert_eq!(refs.read_ref(&branch("feat")).unwrap(), Some(oid()));
    }

    #[test]
    fn create_branch_refuses_duplicates() {
        let (_dir, refs) = test_refs();
        refs.create_branch(&branch("feat"), &oid()).unwrap();

        let err = refs.create_branch(&branch("feat"), &oid()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VcsError>(),
            Some(VcsError::BranchAlreadyExists(_))
        ));
    }

    #[test]
    fn delete_branch_guards() {
        let (_dir, refs) = test_refs();
        refs.update_head("master").unwrap();
        refs.write_ref(&branch("master"), &oid()).unwrap();

        let err = refs.delete_branch(&branch("master")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VcsError>(),
            Some(VcsError::BranchIsCurrent(_))
        ));

        let err = refs.delete_branch(&branch("ghost")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VcsError>(),
            Some(VcsError::BranchNotFound(_))
        ));
    }

    #[test]
    fn deleting_hierarchical_branch_prunes_empty_dirs() {
        let (_dir, refs) = test_refs();
        refs.update_head("master").unwrap();
        refs.write_ref(&branch("feature/login"), &oid()).unwrap();

        refs.delete_branch(&branch("feature/login")).unwrap();
        assert!(!refs.heads_path().join("feature").exists());
    }

    #[test]
    fn list_branches_skips_dotfiles() {
        let (_dir, refs) = test_refs();
        refs.write_ref(&branch("beta"), &oid()).unwrap();
        refs.write_ref(&branch("alpha"), &oid()).unwrap();
        std::fs::write(refs.heads_path().join(".hidden"), OID).unwrap();

        let branches = refs.list_branches().unwrap();
        assert_eq!(branches, vec![branch("alpha"), branch("beta")]);
    }

    proptest! {
        #[test]
        fn valid_branch_names_parse(branch_name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn hierarchical_branch_names_parse(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn branch_names_starting_with_dot_are_rejected(suffix in "[a-zA-Z0-9_-]+") {
            let branch_name = format!(".{}", suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_names_ending_with_lock_are_rejected(prefix in "[a-zA-Z0-9_-]+") {
            let branch_name = format!("{}.lock", prefix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_names_with_consecutive_dots_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_names_with_special_chars_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }
    }

    #[test]
    fn empty_branch_name_is_rejected() {
        assert!(BranchName::try_parse("".to_string()).is_err());
    }
}
