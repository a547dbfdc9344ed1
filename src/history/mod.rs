//! Commit history helpers: the log picker and the rework (interactive
//! rebase) entry point.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

use crate::git::{Commit, Repo};
use crate::menu::{Menu, Outcome};
use crate::pick::{self, OnSingle, PickOpts};
use crate::ui;

/// Pick one of the repository's recent commits, a preset index bypassing
/// the prompt. Shared with the repository menu's commit-page action.
pub fn choose<'t>(
    commits: &'t [Commit],
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<&'t Commit>> {
    match preset {
        Some(raw) => match pick::parse_index(raw, commits.len()) {
            Some(idx) => Ok(Some(&commits[idx])),
            None => {
                writeln!(out, "Invalid selection.")?;
                bail!("no commit at index '{}'", raw.trim());
            }
        },
        None => {
            let opts = PickOpts {
                empty: "No commits yet.",
                single: OnSingle::Choose,
                refusal: "",
            };
            pick::pick(commits, Commit::display_line, &opts, input, out)
        }
    }
}

/// Pick a recent commit, then offer the per-commit actions.
pub fn log(
    repo: &Repo,
    limit: usize,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let commits = repo.recent_commits(limit)?;
    let Some(commit) = choose(&commits, preset, input, out)? else {
        return Ok(());
    };

    writeln!(out, "\n{}", commit.display_line())?;
    let mut menu = Menu::new("Commit")
        .item('s', "Show the full commit", |_, _, _| {
            repo.show(&commit.hash)?;
            Ok(Outcome::Continue)
        })
        .item('c', "Check out (detached)", |_, _, _| {
            repo.checkout_detached(&commit.hash)
                .with_context(|| format!("failed to check out {}", commit.hash))?;
            ui::success(&format!("HEAD is now at {}", commit.hash));
            Ok(Outcome::Quit)
        })
        .item('r', "Revert this commit", |_, _, _| {
            repo.revert(&commit.hash)
                .with_context(|| format!("failed to revert {}", commit.hash))?;
            Ok(Outcome::Quit)
        })
        .item('y', "Print the commit hash", |_, out, _| {
            writeln!(out, "{}", commit.hash)?;
            Ok(Outcome::Continue)
        });
    menu.run(None, None, input, out)
}

/// Pick a recent commit and start `git rebase -i` from its parent.
pub fn rework(
    repo: &Repo,
    limit: usize,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let commits = repo.recent_commits(limit)?;
    let Some(commit) = choose(&commits, preset, input, out)? else {
        return Ok(());
    };

    ui::info(&format!(
        "Rebasing interactively from {} ({})",
        commit.hash, commit.subject
    ));
    repo.rebase_interactive(&commit.hash)
        .with_context(|| format!("interactive rebase from {} failed", commit.hash))
}
