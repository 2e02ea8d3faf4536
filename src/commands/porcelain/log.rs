use crate::areas::repository::Repository;
use crate::artifacts::history::FirstParentWalk;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Maximum number of commits to show
    pub limit: Option<usize>,
}

impl Repository {
    pub fn log(&self, opts: &LogOptions) -> anyhow::Result<()> {
        let Some(head_oid) = self.refs().head_commit()? else {
            writeln!(self.writer(), "No commits yet")?;
            return Ok(());
        };

        let mut shown = 0usize;
        for commit_oid in FirstParentWalk::new(self.database(), head_oid) {
            if let Some(limit) = opts.limit
                && shown >= limit
            {
                break;
            }

            let commit_oid = commit_oid?;
            let commit = self
                .database()
                .parse_object_as_commit(&commit_oid)?
                .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", commit_oid))?;

            writeln!(self.writer(), "commit {}", commit_oid)?;
            writeln!(self.writer(), "Author: {}", commit.author().identity())?;
            writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {}", line)?;
            }
            writeln!(self.writer())?;

            shown += 1;
        }

        Ok(())
    }
}
