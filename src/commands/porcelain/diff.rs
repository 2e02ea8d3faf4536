use crate::areas::repository::Repository;
use crate::artifacts::objects::tree::Tree;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Structural name-status diff of the index against a commit's tree
    ///
    /// Compares the staged entries with the tree of `revision` (or HEAD) by
    /// object id only; content reconciliation is out of scope.
    pub async fn diff(&mut self, revision: Option<&str>) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let tree = match revision {
            Some(revision) => {
                let oid = self.database().resolve_prefix(revision)?;
                let commit = self
                    .database()
                    .parse_object_as_commit(&oid)?
                    .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", oid))?;
                self.database()
                    .parse_object_as_tree(commit.tree_oid())?
                    .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", commit.tree_oid()))?
            }
            None => self.head_tree()?.unwrap_or_else(Tree::default),
        };

        for entry in index.entries() {
            let name = entry.path.to_string_lossy();
            match tree.get(name.as_ref()) {
                None => writeln!(self.writer(), "{}\t{}", "A".green(), name)?,
                Some(oid) if oid != &entry.oid => {
                    writeln!(self.writer(), "{}\t{}", "M".yellow(), name)?
                }
                Some(_) => {}
            }
        }

        for (name, _) in tree.entries() {
            if index.entry_by_path(Path::new(name)).is_none() {
                writeln!(self.writer(), "{}\t{}", "D".red(), name)?;
            }
        }

        Ok(())
    }
}
