use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn create_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name.to_string())?;
        let source_oid = self
            .refs()
            .head_commit()?
            .ok_or_else(|| anyhow::anyhow!("no current HEAD to branch from"))?;

        self.refs().create_branch(&name, &source_oid)?;
        writeln!(self.writer(), "Created branch '{}'", name)?;

        Ok(())
    }

    pub fn delete_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name.to_string())?;
        let oid = self.refs().delete_branch(&name)?;

        writeln!(
            self.writer(),
            "Deleted branch {} (was {})",
            name,
            oid.to_short_oid()
        )?;

        Ok(())
    }

    pub fn list_branches(&mut self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            if current.as_ref() == Some(&branch) {
                writeln!(self.writer(), "{}", format!("* {}", branch).green())?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }
}
