//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level user interface for version
//! control. They compose plumbing commands and internal operations into
//! workflows that match typical usage patterns.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `status`: Show working tree status
//! - `diff`: Show staged changes against a commit
//! - `log`: Show commit history
//! - `branch`: Create, list, or delete branches
//! - `checkout`: Move HEAD to a branch or commit
//! - `merge`: Integrate another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;
