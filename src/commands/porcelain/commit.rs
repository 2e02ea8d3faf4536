use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let message = message.trim().to_string();

        let head = self.refs().head()?;
        let parent = match &head {
            Head::Unborn(_) => None,
            Head::Attached { oid, .. } => Some(oid.clone()),
            Head::Detached(oid) => Some(oid.clone()),
        };
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let (commit, commit_id) = self.write_commit(parent, message).await?;

        match head {
            Head::Unborn(branch) | Head::Attached { branch, .. } => {
                self.refs().write_ref(&branch, &commit_id)?;
                writeln!(
                    self.writer(),
                    "[{} {}{}] {}",
                    branch,
                    is_root,
                    commit_id.to_short_oid(),
                    commit.short_message()
                )?;
            }
            Head::Detached(_) => {
                self.refs().update_head(commit_id.as_ref())?;
                writeln!(
                    self.writer(),
                    "[detached HEAD {}] {}",
                    commit_id.to_short_oid(),
                    commit.short_message()
                )?;
            }
        }

        Ok(())
    }
}
