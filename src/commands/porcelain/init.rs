use crate::areas::repository::{CONFIG_FILE, Repository};
use crate::artifacts::core::error::VcsError;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

const CONFIG_STUB: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n";

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let vcs_path = self.vcs_path();
        if vcs_path.exists() {
            anyhow::bail!(VcsError::AlreadyInitialized(vcs_path));
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;

        // HEAD names the default branch; the branch ref itself is only
        // created by the first commit
        self.refs()
            .update_head(DEFAULT_BRANCH)
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let index = index.lock().await;
        fs::write(index.path(), b"").context("Failed to create index file")?;

        fs::write(vcs_path.join(CONFIG_FILE), CONFIG_STUB)
            .context("Failed to create config file")?;

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            vcs_path.display()
        )?;

        Ok(())
    }
}
