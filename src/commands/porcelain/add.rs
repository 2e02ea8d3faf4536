use crate::areas::repository::Repository;
use crate::artifacts::index::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        for raw_path in paths {
            match self.workspace().list_files(Some(PathBuf::from(raw_path))) {
                Ok(files) => {
                    for path in files {
                        let data = self.workspace().read_file(&path)?;
                        let stat = self.workspace().stat_file(&path)?;

                        let blob = Blob::new(data);
                        let blob_id = self.database().store(&blob)?;

                        index.add(IndexEntry::new(
                            path.clone(),
                            blob_id,
                            stat.mtime,
                            stat.size,
                        ));
                        writeln!(self.writer(), "Added '{}'", path.display())?;
                    }
                }
                Err(_) => {
                    // a vanished path that is still tracked becomes a staged
                    // deletion; anything else is ignored
                    if index.remove(&PathBuf::from(raw_path)) {
                        writeln!(self.writer(), "Removed '{}'", raw_path)?;
                    } else {
                        log::warn!("path {:?} does not exist; ignoring", raw_path);
                    }
                }
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
