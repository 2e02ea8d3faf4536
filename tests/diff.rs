use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{init_repository_dir, read_ref, run_vit_command, vit_commit};
use common::file::{FileSpec, write_file};

#[rstest]
fn unchanged_index_produces_no_output(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    let output = run_vit_command(repository_dir.path(), &["diff"])
        .assert()
        .success();

    assert!(output.get_output().stdout.is_empty());

    Ok(())
}

#[rstest]
fn modified_staged_file_is_reported(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\nworld\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_vit_command(repository_dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^M\ta.txt\n$")?);

    Ok(())
}

#[rstest]
fn new_and_deleted_paths_are_reported(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    write_file(&FileSpec::new(
        repository_dir.path().join("b.txt"),
        "new\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "b.txt"])
        .assert()
        .success();

    std::fs::remove_file(repository_dir.path().join("a.txt"))?;
    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_vit_command(repository_dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A\tb.txt"))
        .stdout(predicate::str::contains("D\ta.txt"));

    Ok(())
}

#[rstest]
fn diff_against_an_explicit_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let first_oid = read_ref(repository_dir.path(), "master");

    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\nworld\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vit_commit(repository_dir.path(), "second")
        .assert()
        .success();

    // against the first commit the staged a.txt is a modification
    run_vit_command(repository_dir.path(), &["diff", &first_oid])
        .assert()
        .success()
        .stdout(predicate::str::contains("M\ta.txt"));

    // against HEAD nothing differs
    let output = run_vit_command(repository_dir.path(), &["diff"])
        .assert()
        .success();
    assert!(output.get_output().stdout.is_empty());

    Ok(())
}
