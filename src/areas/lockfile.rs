use anyhow::Context;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Advisory lock guard for files mutated in place
///
/// Creates a `<file>.lock` sibling with create-exclusive semantics and
/// removes it when dropped, so the lock is released on every exit path.
/// A second writer racing on the same file fails to create the sibling and
/// surfaces the contention as an error instead of clobbering the update.
#[derive(Debug)]
pub struct LockFile {
    lock_path: PathBuf,
}

impl LockFile {
    pub fn acquire(target: &Path) -> anyhow::Result<Self> {
        let lock_path = lock_path_for(target);

        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| format!("unable to acquire lock file {}", lock_path.display()))?;

        Ok(LockFile { lock_path })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    target.with_file_name(name)
}

/// Replace `path` with `contents` through a temporary sibling file
///
/// The rename is the commit point: readers observe either the complete
/// previous file or the complete new one, never a partial write.
pub fn atomic_write(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("invalid path {}", path.display()))?;
    let temp_path = parent.join(format!("tmp-{}", fake::rand::random::<u32>()));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("unable to open temp file {}", temp_path.display()))?;

    let mut lock = file_guard::lock(&mut temp_file, Lock::Exclusive, 0, 1)?;
    lock.deref_mut()
        .write_all(contents)
        .with_context(|| format!("unable to write temp file {}", temp_path.display()))?;
    drop(lock);

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("unable to rename temp file to {}", path.display()))?;

    Ok(())
}
