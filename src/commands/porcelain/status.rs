use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::objects::tree::Tree;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        match self.refs().head()? {
            Head::Unborn(branch) => {
                writeln!(self.writer(), "On branch {}", branch)?;
                writeln!(self.writer())?;
                writeln!(self.writer(), "No commits yet")?;
            }
            Head::Attached { branch, .. } => {
                writeln!(self.writer(), "On branch {}", branch)?;
            }
            Head::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?;
            }
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let head_tree = self.head_tree()?;
        let staged = index
            .entries()
            .filter_map(|entry| {
                let name = entry.path.to_string_lossy().to_string();
                match head_tree.as_ref().and_then(|tree| tree.get(&name)) {
                    None => Some((name, "new file:")),
                    Some(oid) if oid != &entry.oid => Some((name, "modified:")),
                    Some(_) => None,
                }
            })
            .collect::<Vec<_>>();

        if !staged.is_empty() {
            writeln!(self.writer())?;
            writeln!(self.writer(), "Changes to be committed:")?;
            for (name, label) in &staged {
                writeln!(self.writer(), "\t{}", format!("{:<12}{}", label, name).green())?;
            }
        } else {
            writeln!(self.writer())?;
            writeln!(self.writer(), "No changes staged for commit")?;
        }

        let untracked = self
            .workspace()
            .list_files(None)?
            .into_iter()
            .filter(|path| index.entry_by_path(path).is_none())
            .collect::<Vec<_>>();

        if !untracked.is_empty() {
            writeln!(self.writer())?;
            writeln!(self.writer(), "Untracked files:")?;
            for path in untracked {
                writeln!(self.writer(), "\t{}", path.display().to_string().red())?;
            }
        }

        Ok(())
    }

    /// Tree of the commit HEAD resolves to, if any
    pub(crate) fn head_tree(&self) -> anyhow::Result<Option<Tree>> {
        let Some(head_oid) = self.refs().head_commit()? else {
            return Ok(None);
        };

        let commit = self
            .database()
            .parse_object_as_commit(&head_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", head_oid))?;
        let tree = self
            .database()
            .parse_object_as_tree(commit.tree_oid())?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", commit.tree_oid()))?;

        Ok(Some(tree))
    }
}
