//! Stash menu: list, apply, pop, show, drop.
//!
//! Actions take an explicit stash index as the secondary argument; without
//! one they fall back to the indexed picker over `git stash list`.

use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

use crate::git::{Repo, StashEntry};
use crate::menu::{Menu, Outcome};
use crate::pick::{self, OnSingle, PickOpts};
use crate::ui;

fn render(entry: &StashEntry) -> String {
    match &entry.branch {
        Some(branch) => format!("[{}] {}", branch.cyan(), entry.summary),
        None => entry.summary.clone(),
    }
}

/// Resolve the target stash from the secondary argument, or prompt.
/// An argument that is not an in-range index is reported and treated as
/// no selection.
fn resolve<'t>(
    stashes: &'t [StashEntry],
    arg: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<&'t StashEntry>> {
    match arg {
        Some(raw) => match pick::parse_index(raw, stashes.len()) {
            Some(idx) => Ok(Some(&stashes[idx])),
            None => {
                writeln!(out, "Invalid selection.")?;
                Ok(None)
            }
        },
        None => {
            let opts = PickOpts {
                empty: "No stashes.",
                single: OnSingle::Choose,
                refusal: "",
            };
            pick::pick(stashes, render, &opts, input, out)
        }
    }
}

pub fn menu(
    repo: &Repo,
    preset: Option<&str>,
    arg: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    Menu::new("Stashes")
        .item('l', "List stashes", |_, out, _| {
            let stashes = repo.stashes()?;
            if stashes.is_empty() {
                writeln!(out, "No stashes.")?;
            }
            for entry in &stashes {
                writeln!(out, "  {}: {}", entry.index, render(entry))?;
            }
            Ok(Outcome::Continue)
        })
        .item('a', "Apply a stash", |input, out, arg| {
            let stashes = repo.stashes()?;
            if let Some(entry) = resolve(&stashes, arg, input, out)? {
                let output = repo.stash_apply(&entry.reference())?;
                println!("{output}");
                ui::success(&format!("Applied {}", entry.reference()));
            }
            Ok(Outcome::Continue)
        })
        .item('p', "Pop a stash", |input, out, arg| {
            let stashes = repo.stashes()?;
            if let Some(entry) = resolve(&stashes, arg, input, out)? {
                let output = repo.stash_pop(&entry.reference())?;
                println!("{output}");
                ui::success(&format!("Popped {}", entry.reference()));
            }
            Ok(Outcome::Continue)
        })
        .item('s', "Show a stash as a patch", |input, out, arg| {
            let stashes = repo.stashes()?;
            if let Some(entry) = resolve(&stashes, arg, input, out)? {
                repo.stash_show(&entry.reference())?;
            }
            Ok(Outcome::Continue)
        })
        .item('d', "Drop a stash", |input, out, arg| {
            let stashes = repo.stashes()?;
            if let Some(entry) = resolve(&stashes, arg, input, out)? {
                if !ui::prompt_confirm(&format!("Drop {}?", entry.reference()), false) {
                    ui::info("Aborted.");
                    return Ok(Outcome::Continue);
                }
                let output = repo.stash_drop(&entry.reference())?;
                println!("{output}");
            }
            Ok(Outcome::Continue)
        })
        .run(preset, arg, input, out)
}
