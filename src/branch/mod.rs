//! Branch switch and delete pickers.
//!
//! Both operate on the local branches minus the current one. Switching
//! short-circuits when only one candidate remains; deleting refuses to
//! touch the last remaining candidate.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

use crate::git::{GitError, Repo};
use crate::pick::{self, OnSingle, PickOpts};
use crate::ui;

/// Local branches that are not checked out right now.
fn candidates(all: Vec<String>, current: &str) -> Vec<String> {
    all.into_iter().filter(|b| b != current).collect()
}

fn choose<'t>(
    branches: &'t [String],
    preset: Option<&str>,
    opts: &PickOpts<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<&'t String>> {
    match preset {
        Some(raw) => match pick::parse_index(raw, branches.len()) {
            Some(idx) => Ok(Some(&branches[idx])),
            None => {
                writeln!(out, "Invalid selection.")?;
                bail!("no branch at index '{}'", raw.trim());
            }
        },
        None => pick::pick(branches, |b| b.clone(), opts, input, out),
    }
}

pub fn switch(
    repo: &Repo,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let current = repo.current_branch()?;
    let branches = candidates(repo.local_branches()?, &current);

    let opts = PickOpts {
        empty: "No other branches to switch to.",
        single: OnSingle::Choose,
        refusal: "",
    };
    let Some(branch) = choose(&branches, preset, &opts, input, out)? else {
        return Ok(());
    };

    repo.switch(branch)
        .with_context(|| format!("failed to switch to '{branch}'"))?;
    ui::success(&format!("Switched to {branch}"));
    Ok(())
}

pub fn delete(
    repo: &Repo,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let current = repo.current_branch()?;
    let branches = candidates(repo.local_branches()?, &current);

    let opts = PickOpts {
        empty: "No branches to delete.",
        single: OnSingle::Decline,
        refusal: "Refusing to delete the last remaining branch.",
    };
    let Some(branch) = choose(&branches, preset, &opts, input, out)? else {
        return Ok(());
    };

    if !ui::prompt_confirm(&format!("Delete branch '{branch}'?"), false) {
        ui::info("Aborted.");
        return Ok(());
    }

    match repo.delete_branch(branch, false) {
        Ok(()) => {
            ui::success(&format!("Deleted {branch}"));
            Ok(())
        }
        Err(GitError::CommandFailed { stderr, .. }) if stderr.contains("not fully merged") => {
            ui::warn(&format!("'{branch}' is not fully merged."));
            if ui::prompt_confirm("Force delete?", false) {
                repo.delete_branch(branch, true)
                    .with_context(|| format!("failed to force-delete '{branch}'"))?;
                ui::success(&format!("Deleted {branch}"));
            } else {
                ui::info("Aborted.");
            }
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("failed to delete '{branch}'")),
    }
}
