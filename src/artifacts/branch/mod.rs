//! Branch name handling
//!
//! Branch names follow the usual ref-name rules: no leading dot, no `..`,
//! no control characters or glob metacharacters, no trailing `.lock`, and
//! no slash at either end. Hierarchical names (`feature/login`) are valid.

pub mod branch_name;

/// Regex pattern for invalid characters in branch names
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
