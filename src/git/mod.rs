//! Git plumbing.
//!
//! Every operation shells out to `git` synchronously and runs to completion
//! before control returns to the caller. Repository context is explicit: all
//! operations hang off a [`Repo`] holding the worktree root, never off the
//! ambient working directory.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git executable not found (install git and re-run)")]
    NotFound,

    #[error("not inside a git repository")]
    NotARepository,

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("failed to run git: {0}")]
    Io(#[from] io::Error),
}

/// One line of `git log` output, as shown in the commit pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    pub age: String,
}

impl Commit {
    pub fn display_line(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}",
            self.hash.yellow(),
            self.subject,
            format!("({})", self.age).dimmed()
        )
    }
}

/// One entry of `git stash list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    pub index: usize,
    pub branch: Option<String>,
    pub summary: String,
}

impl StashEntry {
    pub fn reference(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

#[derive(Debug)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Resolve the worktree root enclosing `dir`.
    pub fn discover(dir: &Path) -> Result<Repo, GitError> {
        let output = Command::new("git")
            .current_dir(dir)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(GitError::NotARepository);
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Repo {
            root: PathBuf::from(root),
        })
    }

    /// Open a repository at a known root (the configured dotfiles path).
    /// Fails if the directory is not a worktree.
    pub fn at(root: &Path) -> Result<Repo, GitError> {
        if !root.join(".git").exists() {
            return Err(GitError::NotARepository);
        }
        Ok(Repo {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run git and capture trimmed stdout.
    fn read(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    /// Run git with inherited stdio, for operations that talk to the
    /// terminal themselves (interactive rebase, `git show` through a pager).
    fn passthrough(&self, args: &[&str]) -> Result<(), GitError> {
        let status = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .status()
            .map_err(spawn_error)?;

        if !status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: format!("exit code {:?}", status.code()),
            });
        }
        Ok(())
    }

    pub fn current_branch(&self) -> Result<String, GitError> {
        self.read(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn local_branches(&self) -> Result<Vec<String>, GitError> {
        let out = self.read(&[
            "for-each-ref",
            "refs/heads",
            "--format=%(refname:short)",
        ])?;
        Ok(out.lines().map(str::to_string).collect())
    }

    pub fn recent_commits(&self, limit: usize) -> Result<Vec<Commit>, GitError> {
        let count = format!("-{limit}");
        // a repository without commits is an empty list, not an error
        let out = match self.read(&["log", &count, "--format=%h%x09%s%x09%cr"]) {
            Ok(out) => out,
            Err(GitError::CommandFailed { stderr, .. })
                if stderr.contains("does not have any commits") =>
            {
                String::new()
            }
            Err(err) => return Err(err),
        };
        Ok(out.lines().filter_map(parse_commit_line).collect())
    }

    pub fn stashes(&self) -> Result<Vec<StashEntry>, GitError> {
        let out = self.read(&["stash", "list"])?;
        Ok(out.lines().filter_map(parse_stash_line).collect())
    }

    pub fn switch(&self, branch: &str) -> Result<(), GitError> {
        self.read(&["switch", branch]).map(|_| ())
    }

    pub fn checkout_detached(&self, rev: &str) -> Result<(), GitError> {
        self.read(&["checkout", "--detach", rev]).map(|_| ())
    }

    pub fn delete_branch(&self, branch: &str, force: bool) -> Result<(), GitError> {
        let flag = if force { "-D" } else { "-d" };
        self.read(&["branch", flag, branch]).map(|_| ())
    }

    pub fn stash_apply(&self, reference: &str) -> Result<String, GitError> {
        self.read(&["stash", "apply", reference])
    }

    pub fn stash_pop(&self, reference: &str) -> Result<String, GitError> {
        self.read(&["stash", "pop", reference])
    }

    pub fn stash_drop(&self, reference: &str) -> Result<String, GitError> {
        self.read(&["stash", "drop", reference])
    }

    pub fn stash_show(&self, reference: &str) -> Result<(), GitError> {
        self.passthrough(&["stash", "show", "-p", reference])
    }

    pub fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.read(&["fetch", "--prune", remote]).map(|_| ())
    }

    pub fn pull(&self, remote: &str) -> Result<String, GitError> {
        self.read(&["pull", remote])
    }

    pub fn pull_rebase(&self, remote: &str) -> Result<String, GitError> {
        self.read(&["pull", "--rebase", remote])
    }

    pub fn push(&self, remote: &str) -> Result<(), GitError> {
        self.read(&["push", remote]).map(|_| ())
    }

    pub fn status_short(&self) -> Result<String, GitError> {
        self.read(&["status", "--short", "--branch"])
    }

    pub fn diff_stat(&self) -> Result<String, GitError> {
        self.read(&["diff", "--stat"])
    }

    pub fn has_changes(&self) -> Result<bool, GitError> {
        Ok(!self.read(&["status", "--porcelain"])?.is_empty())
    }

    pub fn stage_all(&self) -> Result<(), GitError> {
        self.read(&["add", "-A"]).map(|_| ())
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        self.read(&["commit", "-m", message]).map(|_| ())
    }

    pub fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.read(&["remote", "get-url", remote])
    }

    pub fn show(&self, rev: &str) -> Result<(), GitError> {
        self.passthrough(&["show", rev])
    }

    pub fn revert(&self, rev: &str) -> Result<(), GitError> {
        self.passthrough(&["revert", rev])
    }

    /// `git rebase -i <rev>^`, with stdio inherited so git can spawn the
    /// sequence editor.
    pub fn rebase_interactive(&self, rev: &str) -> Result<(), GitError> {
        let onto = format!("{rev}^");
        self.passthrough(&["rebase", "-i", &onto])
    }
}

fn spawn_error(err: io::Error) -> GitError {
    if err.kind() == io::ErrorKind::NotFound {
        GitError::NotFound
    } else {
        GitError::Io(err)
    }
}

/// Parse one `%h<TAB>%s<TAB>%cr` log record.
fn parse_commit_line(line: &str) -> Option<Commit> {
    let mut fields = line.splitn(3, '\t');
    let hash = fields.next()?.trim();
    let subject = fields.next()?.trim();
    let age = fields.next().unwrap_or("").trim();
    if hash.is_empty() {
        return None;
    }
    Some(Commit {
        hash: hash.to_string(),
        subject: subject.to_string(),
        age: age.to_string(),
    })
}

/// Parse one `git stash list` line, e.g.
/// `stash@{0}: WIP on main: 1a2b3c4 add aliases` or
/// `stash@{1}: On feature/x: checkpoint`.
fn parse_stash_line(line: &str) -> Option<StashEntry> {
    let rest = line.strip_prefix("stash@{")?;
    let (index, rest) = rest.split_once('}')?;
    let index: usize = index.parse().ok()?;
    let summary = rest.strip_prefix(": ")?.to_string();

    let branch = summary
        .strip_prefix("WIP on ")
        .or_else(|| summary.strip_prefix("On "))
        .and_then(|tail| tail.split_once(':'))
        .map(|(branch, _)| branch.trim().to_string());

    Some(StashEntry {
        index,
        branch,
        summary,
    })
}

/// True when git is reachable on PATH.
pub fn check_git() -> anyhow::Result<()> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| anyhow::anyhow!("git not found on PATH"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_line_parses_tab_separated_fields() {
        let commit = parse_commit_line("1a2b3c4\tadd zsh aliases\t3 days ago").unwrap();
        assert_eq!(commit.hash, "1a2b3c4");
        assert_eq!(commit.subject, "add zsh aliases");
        assert_eq!(commit.age, "3 days ago");
    }

    #[test]
    fn commit_line_keeps_tabs_inside_the_age_field() {
        let commit = parse_commit_line("abc\tsubject\tweird\tage").unwrap();
        assert_eq!(commit.age, "weird\tage");
    }

    #[test]
    fn malformed_commit_lines_are_skipped() {
        assert_eq!(parse_commit_line(""), None);
        assert_eq!(parse_commit_line("only-a-hash"), None);
    }

    #[test]
    fn wip_stash_line_carries_its_branch() {
        let entry = parse_stash_line("stash@{0}: WIP on main: 1a2b3c4 add aliases").unwrap();
        assert_eq!(entry.index, 0);
        assert_eq!(entry.branch.as_deref(), Some("main"));
        assert_eq!(entry.summary, "WIP on main: 1a2b3c4 add aliases");
        assert_eq!(entry.reference(), "stash@{0}");
    }

    #[test]
    fn message_stash_line_carries_its_branch() {
        let entry = parse_stash_line("stash@{12}: On feature/x: checkpoint").unwrap();
        assert_eq!(entry.index, 12);
        assert_eq!(entry.branch.as_deref(), Some("feature/x"));
        assert_eq!(entry.reference(), "stash@{12}");
    }

    #[test]
    fn unrecognized_stash_prefix_keeps_no_branch() {
        let entry = parse_stash_line("stash@{1}: autostash before rebase").unwrap();
        assert_eq!(entry.branch, None);
        assert_eq!(entry.summary, "autostash before rebase");
    }

    #[test]
    fn garbage_stash_lines_are_skipped() {
        assert_eq!(parse_stash_line(""), None);
        assert_eq!(parse_stash_line("stash@{not-a-number}: x"), None);
        assert_eq!(parse_stash_line("random line"), None);
    }

    #[test]
    fn discover_outside_a_worktree_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Repo::discover(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            GitError::NotARepository | GitError::NotFound
        ));
    }

    #[test]
    fn at_requires_an_existing_worktree() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            Repo::at(temp.path()),
            Err(GitError::NotARepository)
        ));
    }
}
