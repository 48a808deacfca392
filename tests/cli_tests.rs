use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ENV_VARS: [&str; 5] = [
    "SERIES_ROOT",
    "MOUNT_POINT",
    "SERIES_NAME",
    "AUTO_RUN",
    "AUTO_ROLLBACK",
];

/// Binary with a clean environment, run from `cwd` so no stray `.env` is read
fn renamer(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("series-renamer").unwrap();
    cmd.current_dir(cwd).env("NO_COLOR", "1");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn create_season(root: &Path) -> PathBuf {
    let season = root.join("SEASON.01");
    fs::create_dir(&season).unwrap();
    fs::write(season.join("ep01.mkv"), "one").unwrap();
    fs::write(season.join("ep02.mkv"), "two").unwrap();
    fs::write(season.join("notes.txt"), "notes").unwrap();
    season
}

fn assert_original(root: &Path) {
    let season = root.join("SEASON.01");
    assert!(season.join("ep01.mkv").exists());
    assert!(season.join("ep02.mkv").exists());
    assert!(season.join("notes.txt").exists());
    assert!(!root.join("Foo_S01").exists());
}

fn assert_renamed(root: &Path) {
    let season = root.join("Foo_S01");
    assert!(!root.join("SEASON.01").exists());
    assert_eq!(fs::read_to_string(season.join("Foo_S01E01.mkv")).unwrap(), "one");
    assert_eq!(fs::read_to_string(season.join("Foo_S01E02.mkv")).unwrap(), "two");
    assert!(season.join("notes.txt").exists());
}

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    renamer(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Normalize TV series"));
}

#[test]
fn test_version_flag() {
    let dir = tempdir().unwrap();
    renamer(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_root_is_configuration_error() {
    let dir = tempdir().unwrap();
    renamer(dir.path())
        .args(["--name", "Foo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SERIES_ROOT"));
}

#[test]
fn test_missing_name_is_configuration_error() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--name"));

    assert_original(dir.path());
}

#[test]
fn test_nonexistent_root() {
    let dir = tempdir().unwrap();
    renamer(dir.path())
        .arg(dir.path().join("missing"))
        .args(["--name", "Foo"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo", "--dry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("SEASON.01/ep01.mkv  ->  SEASON.01/Foo_S01E01.mkv"))
        .stdout(predicate::str::contains("SEASON.01/  ->  Foo_S01/"))
        .stdout(predicate::str::contains("notes.txt").not());

    assert_original(dir.path());
}

#[test]
fn test_declined_confirmation_changes_nothing() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted"));

    assert_original(dir.path());
}

#[test]
fn test_closed_stdin_declines() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo"])
        .assert()
        .success();

    assert_original(dir.path());
}

#[test]
fn test_auto_run_keeps_changes() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo", "--auto", "--rollback", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully renamed 3 entries"));

    assert_renamed(dir.path());
}

#[test]
fn test_interactive_run_then_rollback() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo"])
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rollback would restore 3 entries"));

    assert_original(dir.path());
}

#[test]
fn test_auto_run_still_asks_before_rollback() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo", "--auto"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Rollback all changes?"));

    assert_renamed(dir.path());
}

#[test]
fn test_environment_configuration() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .env("SERIES_ROOT", dir.path())
        .env("SERIES_NAME", "Foo")
        .env("AUTO_RUN", "1")
        .env("AUTO_ROLLBACK", "never")
        .assert()
        .success();

    assert_renamed(dir.path());
}

#[test]
fn test_collision_aborts_before_renaming() {
    let dir = tempdir().unwrap();
    let season = create_season(dir.path());
    fs::write(season.join("E01.mkv"), "dup").unwrap();

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo", "--auto", "--rollback", "never"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Foo_S01E01.mkv"));

    assert_original(dir.path());
    assert!(season.join("E01.mkv").exists());
}

#[test]
fn test_normalized_tree_has_nothing_to_do() {
    let dir = tempdir().unwrap();
    let season = dir.path().join("Foo_S01");
    fs::create_dir(&season).unwrap();
    fs::write(season.join("Foo_S01E01.mkv"), "one").unwrap();

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to rename"));
}

#[test]
fn test_saved_journal_can_be_reverted() {
    let dir = tempdir().unwrap();
    create_season(dir.path());

    renamer(dir.path())
        .arg(dir.path())
        .args(["--name", "Foo", "--auto", "--rollback", "never", "--save-journal"])
        .assert()
        .success();

    assert_renamed(dir.path());

    let journal = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("series-renamer-journal-"))
        })
        .expect("journal file written into the root");

    renamer(dir.path())
        .arg("--revert")
        .arg(&journal)
        .args(["--rollback", "always"])
        .assert()
        .success();

    assert_original(dir.path());
}

#[test]
fn test_revert_with_invalid_journal() {
    let dir = tempdir().unwrap();
    let journal = dir.path().join("broken.json");
    fs::write(&journal, "not json").unwrap();

    renamer(dir.path())
        .arg("--revert")
        .arg(&journal)
        .assert()
        .code(9)
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_revert_refuses_entries_outside_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tv");
    fs::create_dir(&root).unwrap();
    fs::write(dir.path().join("victim.txt"), "keep me").unwrap();

    let journal = dir.path().join("escaping.json");
    fs::write(
        &journal,
        format!(
            r#"{{
            "version": "1.0",
            "executed_at": "2026-01-01T00:00:00Z",
            "outcome": "complete",
            "root": "{}",
            "series": "Foo",
            "tool_version": "1.0.0",
            "entries": [{{"applied": "../victim.txt", "original": "stolen.txt", "kind": "file"}}]
        }}"#,
            root.display()
        ),
    )
    .unwrap();

    renamer(dir.path())
        .arg("--revert")
        .arg(&journal)
        .args(["--rollback", "always"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("not inside the journal root"));

    assert_eq!(fs::read_to_string(dir.path().join("victim.txt")).unwrap(), "keep me");
    assert!(!root.join("stolen.txt").exists());
}
