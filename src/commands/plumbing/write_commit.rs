use crate::areas::repository::Repository;
use crate::artifacts::core::error::VcsError;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;

impl Repository {
    /// Project the index into a tree, then write the commit object
    ///
    /// Object writes happen here, before any ref is updated by the caller,
    /// so a new ref never points at objects that are not yet durable.
    pub(crate) async fn write_commit(
        &mut self,
        parent: Option<ObjectId>,
        message: String,
    ) -> anyhow::Result<(Commit, ObjectId)> {
        let tree_id = self.write_tree().await?;

        let author = Author::load_from_env();
        let commit = Commit::new(parent, tree_id, author, message);
        let commit_id = self.database().store(&commit)?;

        Ok((commit, commit_id))
    }

    async fn write_tree(&mut self) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        if index.is_empty() {
            anyhow::bail!(VcsError::EmptyIndex);
        }

        let tree = Tree::build(index.entries())?;
        self.database().store(&tree)
    }
}
