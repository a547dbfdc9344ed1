//! End-to-end menu flows, driven through the binary with piped stdin
//! against throwaway git repositories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A repo on branch `main` with one empty commit.
fn sample_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "-b", "main"]);
    git(temp.path(), &["config", "user.email", "test@example.com"]);
    git(temp.path(), &["config", "user.name", "Test"]);
    git(temp.path(), &["commit", "--allow-empty", "-m", "initial"]);
    temp
}

fn dotpilot(repo: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dotpilot").unwrap();
    // point --config at a path that does not exist so defaults apply
    cmd.current_dir(repo.path())
        .arg("--config")
        .arg(repo.path().join("nonexistent-config.toml"));
    cmd
}

#[test]
fn update_menu_banner_lists_options_in_order() {
    let repo = sample_repo();

    let assert = dotpilot(&repo)
        .arg("update")
        .write_stdin("q\n")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let fetch = stdout.find("Fetch and prune").unwrap();
    let rebase = stdout.find("Pull with rebase").unwrap();
    let status = stdout.find("Short status").unwrap();
    let quit = stdout.find("Quit/Exit").unwrap();
    assert!(fetch < rebase && rebase < status && status < quit);
}

#[test]
fn update_menu_invalid_code_loops_and_reprompts() {
    let repo = sample_repo();

    let assert = dotpilot(&repo)
        .arg("update")
        .write_stdin("z\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid option."));

    // banner is shown again after the invalid entry
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Quit/Exit").count(), 2);
}

#[test]
fn update_menu_direct_invalid_code_fails() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("update")
        .arg("z")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid option."));
}

#[test]
fn update_menu_direct_code_skips_the_banner() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("update")
        .arg("s")
        .assert()
        .success()
        .stdout(predicate::str::contains("##"))
        .stdout(predicate::str::contains("Quit/Exit").not());
}

#[test]
fn update_menu_closed_stdin_quits_cleanly() {
    let repo = sample_repo();

    dotpilot(&repo).arg("update").write_stdin("").assert().success();
}

#[test]
fn switch_reports_when_there_is_nothing_to_switch_to() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("switch")
        .assert()
        .success()
        .stdout(predicate::str::contains("No other branches to switch to."));
}

#[test]
fn switch_short_circuits_onto_the_only_candidate() {
    let repo = sample_repo();
    git(repo.path(), &["branch", "develop"]);

    dotpilot(&repo)
        .arg("switch")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to develop"));

    assert_eq!(
        git(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"]),
        "develop"
    );
}

#[test]
fn switch_resolves_a_direct_index() {
    let repo = sample_repo();
    git(repo.path(), &["branch", "alpha"]);
    git(repo.path(), &["branch", "beta"]);

    // candidates are listed in ref order: alpha, beta
    dotpilot(&repo).arg("switch").arg("1").assert().success();

    assert_eq!(
        git(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"]),
        "beta"
    );
}

#[test]
fn switch_rejects_an_out_of_range_index() {
    let repo = sample_repo();
    git(repo.path(), &["branch", "alpha"]);
    git(repo.path(), &["branch", "beta"]);

    dotpilot(&repo)
        .arg("switch")
        .arg("9")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid selection."));
}

#[test]
fn delete_reports_when_there_are_no_candidates() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("delete")
        .assert()
        .success()
        .stdout(predicate::str::contains("No branches to delete."));
}

#[test]
fn delete_refuses_the_last_remaining_candidate() {
    let repo = sample_repo();
    git(repo.path(), &["branch", "develop"]);

    dotpilot(&repo)
        .arg("delete")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Refusing to delete the last remaining branch.",
        ));

    // the branch is still there
    let branches = git(repo.path(), &["branch", "--list", "develop"]);
    assert!(branches.contains("develop"));
}

#[test]
fn stash_list_reports_an_empty_stack() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("stash")
        .arg("l")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stashes."));
}

#[test]
fn stash_list_shows_entries() {
    let repo = sample_repo();
    fs::write(repo.path().join("note.txt"), "hello").unwrap();
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["stash", "push", "-m", "wip notes"]);

    dotpilot(&repo)
        .arg("stash")
        .arg("l")
        .assert()
        .success()
        .stdout(predicate::str::contains("wip notes"));
}

#[test]
fn stash_action_skips_an_out_of_range_index() {
    let repo = sample_repo();
    fs::write(repo.path().join("note.txt"), "hello").unwrap();
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["stash", "push", "-m", "wip notes"]);

    dotpilot(&repo)
        .arg("stash")
        .arg("a")
        .arg("9")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection."));

    // nothing was applied
    assert!(!repo.path().join("note.txt").exists());
}

#[test]
fn log_picker_quits_without_a_selection() {
    let repo = sample_repo();
    git(repo.path(), &["commit", "--allow-empty", "-m", "second"]);

    dotpilot(&repo)
        .arg("log")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("initial"))
        .stdout(predicate::str::contains("Quit/Exit"));
}

#[test]
fn log_direct_index_opens_the_commit_menu() {
    let repo = sample_repo();
    git(repo.path(), &["commit", "--allow-empty", "-m", "second"]);

    dotpilot(&repo)
        .arg("log")
        .arg("0")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Show the full commit"))
        .stdout(predicate::str::contains("second"));
}

#[test]
fn repo_url_fails_without_a_remote() {
    let repo = sample_repo();

    dotpilot(&repo)
        .arg("repo")
        .arg("u")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no 'origin' remote configured"));
}

#[test]
fn repo_url_honors_the_remote_override() {
    let repo = sample_repo();
    let config_path = repo.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[github]
remote_override = "https://github.com/acme/dotfiles"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("dotpilot").unwrap();
    cmd.current_dir(repo.path())
        .arg("--config")
        .arg(&config_path)
        .arg("repo")
        .arg("u")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://github.com/acme/dotfiles"));
}

#[test]
fn repo_url_translates_an_scp_like_remote() {
    let repo = sample_repo();
    git(
        repo.path(),
        &["remote", "add", "origin", "git@github.com:acme/dotfiles.git"],
    );

    dotpilot(&repo)
        .arg("repo")
        .arg("u")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://github.com/acme/dotfiles"));
}
