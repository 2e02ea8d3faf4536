use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{init_repository_dir, repository_dir, run_vit_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn add_single_file_writes_blob_and_index_entry(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\n".to_string(),
    ));

    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'a.txt'"));

    // blob of "hello\n" lands at its content address
    let blob_path = repository_dir
        .path()
        .join(".vcs")
        .join("objects")
        .join("ce")
        .join("013625030ba8dba906f756967f9e9ca394464a");
    assert!(blob_path.is_file());

    let index = std::fs::read_to_string(repository_dir.path().join(".vcs").join("index"))?;
    assert!(index.contains("ce013625030ba8dba906f756967f9e9ca394464a"));
    assert!(index.trim_end().ends_with("a.txt"));

    Ok(())
}

#[rstest]
fn add_directory_stages_files_recursively(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "one".to_string(),
    ));
    write_file(&FileSpec::new(
        repository_dir.path().join("sub").join("b.txt"),
        "two".to_string(),
    ));
    write_file(&FileSpec::new(
        repository_dir.path().join(".hidden"),
        "no".to_string(),
    ));

    run_vit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let index = std::fs::read_to_string(repository_dir.path().join(".vcs").join("index"))?;
    assert!(index.contains("a.txt"));
    assert!(index.contains("sub/b.txt"));
    assert!(!index.contains(".hidden"));

    Ok(())
}

#[rstest]
fn staging_twice_without_modification_is_byte_identical(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file_path = repository_dir.path().join("a.txt");
    write_file(&FileSpec::new(file_path.clone(), "hello\n".to_string()));

    // pin the mtime so the entry's stat fields are deterministic
    let mtime = filetime::FileTime::from_unix_time(1700000000, 0);
    filetime::set_file_mtime(&file_path, mtime)?;

    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    let first = std::fs::read(repository_dir.path().join(".vcs").join("index"))?;

    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    let second = std::fs::read(repository_dir.path().join(".vcs").join("index"))?;

    assert_eq!(first, second);
    assert!(String::from_utf8(first)?.contains(" 1700000000 6 a.txt"));

    Ok(())
}

#[rstest]
fn adding_a_vanished_tracked_file_stages_a_deletion(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    std::fs::remove_file(repository_dir.path().join("a.txt"))?;

    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'a.txt'"));

    let index = std::fs::read_to_string(repository_dir.path().join(".vcs").join("index"))?;
    assert!(!index.contains("a.txt"));

    Ok(())
}

#[rstest]
fn adding_a_nonexistent_untracked_path_is_ignored(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_vit_command(repository_dir.path(), &["add", "ghost.txt"])
        .assert()
        .success();

    Ok(())
}

#[rstest]
fn path_with_spaces_round_trips_through_the_index(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(&FileSpec::new(
        repository_dir.path().join("notes from meeting.txt"),
        "agenda\n".to_string(),
    ));

    run_vit_command(repository_dir.path(), &["add", "notes from meeting.txt"])
        .assert()
        .success();

    // staging again must find the same entry instead of appending a second one
    run_vit_command(repository_dir.path(), &["add", "notes from meeting.txt"])
        .assert()
        .success();

    let index = std::fs::read_to_string(repository_dir.path().join(".vcs").join("index"))?;
    assert_eq!(index.matches("notes from meeting.txt").count(), 1);

    Ok(())
}
