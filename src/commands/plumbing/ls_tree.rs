use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    pub fn ls_tree(&mut self, target: &str) -> anyhow::Result<()> {
        let object_id = self.database().resolve_prefix(target)?;
        let tree = self
            .database()
            .parse_object_as_tree(&object_id)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", object_id))?;

        if !tree.is_empty() {
            writeln!(self.writer(), "{}", tree.display())?;
        }

        Ok(())
    }
}
