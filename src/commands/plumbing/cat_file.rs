use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use std::io::Write;

impl Repository {
    pub fn cat_file(&mut self, target: &str) -> anyhow::Result<()> {
        let object_id = self.database().resolve_prefix(target)?;
        let object = self.database().parse_object(&object_id)?;

        let rendered = match object {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        };

        write!(self.writer(), "{}", rendered)?;
        if !rendered.ends_with('\n') {
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
