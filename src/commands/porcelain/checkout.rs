use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::VcsError;
use std::io::Write;

impl Repository {
    /// Move HEAD to a branch (attached) or an object id (detached)
    ///
    /// Working-tree files are left untouched; only HEAD moves. An object id
    /// target may be abbreviated to a unique prefix of at least 7 hex
    /// characters.
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        if let Ok(branch) = BranchName::try_parse(target.to_string())
            && self.refs().branch_exists(&branch)
        {
            self.refs().update_head(branch.as_ref())?;
            writeln!(self.writer(), "Switched to branch '{}'", branch)?;
            return Ok(());
        }

        let oid = match self.database().resolve_prefix(target) {
            Ok(oid) => oid,
            Err(err) => match err.downcast_ref::<VcsError>() {
                Some(VcsError::BadOid(_)) | Some(VcsError::ObjectNotFound(_)) => {
                    anyhow::bail!(VcsError::UnknownTarget(target.to_string()))
                }
                _ => return Err(err),
            },
        };

        let was_attached = !self.refs().is_head_detached()?;
        self.refs().update_head(oid.as_ref())?;

        if was_attached {
            writeln!(
                self.writer(),
                "Note: switching to '{}' detaches HEAD",
                target
            )?;
        }
        writeln!(self.writer(), "HEAD is now at {}", oid.to_short_oid())?;

        Ok(())
    }
}
