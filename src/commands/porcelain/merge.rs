use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::VcsError;
use crate::artifacts::history;
use std::io::Write;

impl Repository {
    /// Integrate `target` into the current branch
    ///
    /// Picks between three outcomes: already up to date, fast-forward when
    /// the current head is a first-parent ancestor of the target tip, or a
    /// synthetic merge commit built from the current index. The synthetic
    /// commit records only the current head as parent.
    pub async fn merge(&mut self, target: &str) -> anyhow::Result<()> {
        let target = BranchName::try_parse(target.to_string())?;

        let (current, head_oid) = match self.refs().head()? {
            Head::Attached { branch, oid } => (branch, oid),
            Head::Unborn(_) => anyhow::bail!("no commits on the current branch"),
            Head::Detached(_) => anyhow::bail!(VcsError::DetachedHead),
        };

        if target == current {
            anyhow::bail!("cannot merge branch '{}' into itself", target);
        }

        let merge_oid = self
            .refs()
            .read_ref(&target)?
            .ok_or_else(|| VcsError::BranchNotFound(target.to_string()))?;

        if head_oid == merge_oid {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(());
        }

        // the current head is an ancestor of the target tip exactly when it
        // shows up on the target's first-parent chain
        let base = history::merge_base(self.database(), &merge_oid, &head_oid)?;
        if base.as_ref() == Some(&head_oid) {
            self.refs().write_ref(&current, &merge_oid)?;

            writeln!(
                self.writer(),
                "Updating {}..{}",
                head_oid.to_short_oid(),
                merge_oid.to_short_oid()
            )?;
            writeln!(self.writer(), "Fast-forward")?;
            return Ok(());
        }

        let message = format!("Merge branch '{}' into {}", target, current);
        let (commit, commit_id) = self.write_commit(Some(head_oid), message).await?;
        self.refs().write_ref(&current, &commit_id)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            current,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
