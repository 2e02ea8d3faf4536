use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{
    count_objects, init_repository_dir, read_ref, run_vit_command, vit_commit,
};
use common::file::{FileSpec, write_file};

#[rstest]
fn merging_the_same_tip_is_up_to_date(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_vit_command(repository_dir.path(), &["branch", "feat"])
        .assert()
        .success();

    run_vit_command(repository_dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date."));

    Ok(())
}

#[rstest]
fn fast_forward_advances_the_ref_without_a_new_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    // branch ahead of master by one commit
    run_vit_command(repository_dir.path(), &["branch", "feat"])
        .assert()
        .success();
    run_vit_command(repository_dir.path(), &["checkout", "feat"])
        .assert()
        .success();

    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\nworld\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vit_commit(repository_dir.path(), "extend a.txt")
        .assert()
        .success();

    run_vit_command(repository_dir.path(), &["checkout", "master"])
        .assert()
        .success();

    let objects_before = count_objects(repository_dir.path());

    run_vit_command(repository_dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    assert_eq!(
        read_ref(repository_dir.path(), "master"),
        read_ref(repository_dir.path(), "feat")
    );
    // no merge commit (or any other object) was written
    assert_eq!(count_objects(repository_dir.path()), objects_before);

    Ok(())
}

#[rstest]
fn divergent_merge_synthesizes_a_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    // feat gains b.txt
    run_vit_command(repository_dir.path(), &["branch", "feat"])
        .assert()
        .success();
    run_vit_command(repository_dir.path(), &["checkout", "feat"])
        .assert()
        .success();
    write_file(&FileSpec::new(
        repository_dir.path().join("b.txt"),
        "feature work\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "b.txt"])
        .assert()
        .success();
    vit_commit(repository_dir.path(), "add b.txt")
        .assert()
        .success();

    // master diverges by modifying a.txt
    run_vit_command(repository_dir.path(), &["checkout", "master"])
        .assert()
        .success();
    write_file(&FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\nmaster\n".to_string(),
    ));
    run_vit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    vit_commit(repository_dir.path(), "master work")
        .assert()
        .success();

    let master_before = read_ref(repository_dir.path(), "master");
    let feat_tip = read_ref(repository_dir.path(), "feat");

    run_vit_command(repository_dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge branch 'feat' into master"));

    let merge_oid = read_ref(repository_dir.path(), "master");
    assert_ne!(merge_oid, master_before);
    assert_ne!(merge_oid, feat_tip);

    let cat = run_vit_command(repository_dir.path(), &["cat-file", &merge_oid])
        .assert()
        .success();
    let stdout = String::from_utf8(cat.get_output().stdout.clone())?;

    // the synthetic commit records only the previous master head as parent
    assert!(stdout.contains(&format!("parent {}", master_before)));
    assert!(!stdout.contains(&format!("parent {}", feat_tip)));
    assert!(stdout.contains("Merge branch 'feat' into master"));

    // its tree is the projection of the current index, which has not changed
    // since master's last commit; feat's tree is not consulted
    let merge_tree = tree_header(&stdout);

    let cat = run_vit_command(repository_dir.path(), &["cat-file", &master_before])
        .assert()
        .success();
    let master_stdout = String::from_utf8(cat.get_output().stdout.clone())?;
    assert_eq!(merge_tree, tree_header(&master_stdout));

    let ls = run_vit_command(repository_dir.path(), &["ls-tree", &merge_tree])
        .assert()
        .success();
    let tree_listing = String::from_utf8(ls.get_output().stdout.clone())?;
    assert!(tree_listing.contains("a.txt"));

    Ok(())
}

fn tree_header(commit_text: &str) -> String {
    commit_text
        .lines()
        .find(|line| line.starts_with("tree "))
        .map(|line| line.trim_start_matches("tree ").to_string())
        .expect("missing tree header")
}

#[rstest]
fn merge_with_detached_head_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let root_oid = read_ref(repository_dir.path(), "master");

    run_vit_command(repository_dir.path(), &["branch", "feat"])
        .assert()
        .success();
    run_vit_command(repository_dir.path(), &["checkout", &root_oid])
        .assert()
        .success();

    run_vit_command(repository_dir.path(), &["merge", "feat"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("HEAD is detached"));

    Ok(())
}

#[rstest]
fn merge_branch_into_itself_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_vit_command(repository_dir.path(), &["merge", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("into itself"));

    Ok(())
}

#[rstest]
fn merge_missing_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_vit_command(repository_dir.path(), &["merge", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));

    Ok(())
}
