use std::path::PathBuf;

/// Typed failures for repository operations
///
/// Logical precondition failures carry one of these kinds so callers can
/// react to the kind rather than a message, and so the CLI can tell user
/// errors apart from internal/IO errors when mapping exit codes. IO failures
/// stay `std::io::Error` inside the surrounding `anyhow` chain.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("not a vit repository (or any of the parent directories)")]
    NotARepository,

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("ambiguous object id prefix: {0}")]
    AmbiguousOid(String),

    #[error("corrupt object: {0}")]
    Corrupt(String),

    #[error("invalid object id: {0}")]
    BadOid(String),

    #[error("invalid object type: {0}")]
    BadObjectType(String),

    #[error("branch {0} not found")]
    BranchNotFound(String),

    #[error("branch {0} already exists")]
    BranchAlreadyExists(String),

    #[error("cannot delete the current branch: {0}")]
    BranchIsCurrent(String),

    #[error("HEAD is detached")]
    DetachedHead,

    #[error("nothing staged to commit")]
    EmptyIndex,

    #[error("branch or commit {0} not found")]
    UnknownTarget(String),
}
