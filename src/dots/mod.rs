//! Dotfiles-repo menu.
//!
//! Operates on the checkout named by `dotfiles.repo_path`, wherever the
//! command itself was invoked from.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::process::Command;

use crate::cfg::Config;
use crate::git::Repo;
use crate::hub;
use crate::menu::{Menu, Outcome};
use crate::ui;

pub fn menu(
    config: &Config,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let root = config.dotfiles.repo_root();
    let repo = Repo::at(&root).with_context(|| {
        format!(
            "no dotfiles repository at {} (set dotfiles.repo_path in the config)",
            root.display()
        )
    })?;
    let remote = config.general.remote.as_str();

    let mut menu = Menu::new("Dotfiles")
        .item('s', "Short status", |_, out, _| {
            let status = repo.status_short()?;
            writeln!(out, "{status}")?;
            Ok(Outcome::Continue)
        })
        .item('d', "Diff stat", |_, out, _| {
            let stat = repo.diff_stat()?;
            if stat.is_empty() {
                writeln!(out, "No unstaged changes.")?;
            } else {
                writeln!(out, "{stat}")?;
            }
            Ok(Outcome::Continue)
        })
        .item('l', "Pull", |_, _, _| {
            let spinner = ui::spinner(&format!("Pulling from {remote}..."));
            let result = repo.pull(remote);
            spinner.finish_and_clear();
            let output = result.with_context(|| format!("pull from '{remote}' failed"))?;
            println!("{output}");
            Ok(Outcome::Continue)
        })
        .item('u', "Commit and push", |_, _, _| {
            repo.stage_all()?;
            if !repo.has_changes()? {
                ui::info("No changes to commit");
            } else {
                let message = ui::prompt_text("Commit message", Some("Update dotfiles"));
                repo.commit(&message).context("failed to commit changes")?;
                ui::success("Changes committed");
            }

            let spinner = ui::spinner(&format!("Pushing to {remote}..."));
            let result = repo.push(remote);
            spinner.finish_and_clear();
            result.with_context(|| format!("push to '{remote}' failed"))?;
            ui::success("Pushed.");
            Ok(Outcome::Continue)
        })
        .item('e', "Edit in your editor", |_, _, _| {
            let editor = config.dotfiles.editor();
            Command::new(&editor)
                .arg(repo.root())
                .status()
                .with_context(|| format!("failed to launch '{editor}'"))?;
            Ok(Outcome::Continue)
        })
        .item('o', "Open the remote page", |_, _, _| {
            let url = match &config.github.remote_override {
                Some(url) => url.clone(),
                None => {
                    let remote_url = repo
                        .remote_url(remote)
                        .with_context(|| format!("no '{remote}' remote configured"))?;
                    hub::web_url(&remote_url).with_context(|| {
                        format!("cannot derive a web URL from '{remote_url}'")
                    })?
                }
            };
            hub::open_url(&url)?;
            Ok(Outcome::Continue)
        });
    menu.run(preset, None, input, out)
}
