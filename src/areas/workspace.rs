use bytes::Bytes;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Stat fields the index records for change detection
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub mtime: i64,
    pub size: u64,
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List regular files under `root` (or the whole workspace), relative to
    /// the workspace root
    ///
    /// The repository directory and dot-files are skipped at every depth.
    /// A missing root is an error so callers can treat it as a vanished path.
    pub fn list_files(&self, root: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root {
            Some(p) => std::fs::canonicalize(self.path.join(p))?,
            None => self.path.clone().into(),
        };

        if root.is_dir() {
            let mut files = WalkDir::new(&root)
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0
                        || !entry.file_name().to_string_lossy().starts_with('.')
                })
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| {
                    entry
                        .path()
                        .strip_prefix(self.path.as_ref())
                        .ok()
                        .map(PathBuf::from)
                })
                .collect::<Vec<_>>();
            files.sort();

            Ok(files)
        } else {
            Ok(vec![
                root.strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let data = std::fs::read(self.path.join(file_path))?;

        Ok(Bytes::from(data))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<FileStat> {
        let metadata = std::fs::metadata(self.path.join(file_path))?;

        Ok(FileStat {
            mtime: metadata.mtime(),
            size: metadata.len(),
        })
    }
}
