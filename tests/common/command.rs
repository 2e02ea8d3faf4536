use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "Test Author";
pub const AUTHOR_EMAIL: &str = "test@example.com";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized repository with `a.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file = FileSpec::new(repository_dir.path().join("a.txt"), "hello\n".to_string());
    write_file(&file);

    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    vit_commit(repository_dir.path(), "first").assert().success();

    repository_dir
}

pub fn run_vit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vit").expect("Failed to find vit binary");
    cmd.current_dir(dir);
    cmd.env("VIT_AUTHOR_NAME", AUTHOR_NAME);
    cmd.env("VIT_AUTHOR_EMAIL", AUTHOR_EMAIL);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn vit_commit(dir: &Path, message: &str) -> Command {
    run_vit_command(dir, &["commit", "-m", message])
}

/// Read the OID a branch ref currently points at
pub fn read_ref(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".vcs").join("refs").join("heads").join(branch);
    std::fs::read_to_string(ref_path)
        .expect("Failed to read branch ref")
        .trim()
        .to_string()
}

pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".vcs").join("HEAD")).expect("Failed to read HEAD")
}

/// Count the object files in the database (shard directories excluded)
pub fn count_objects(dir: &Path) -> usize {
    let objects_dir = dir.join(".vcs").join("objects");
    walkdir(&objects_dir)
}

fn walkdir(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += walkdir(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}
