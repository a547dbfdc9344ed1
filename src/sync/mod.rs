//! Update menu: fetch, pull, rebase-pull, push, status against the
//! configured remote.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::cfg::Config;
use crate::git::Repo;
use crate::menu::{Menu, Outcome};
use crate::ui;

pub fn menu(
    repo: &Repo,
    config: &Config,
    preset: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let remote = config.general.remote.as_str();

    let mut menu = Menu::new("Update")
        .item('f', "Fetch and prune", |_, _, _| {
            let spinner = ui::spinner(&format!("Fetching from {remote}..."));
            let result = repo.fetch(remote);
            spinner.finish_and_clear();
            result.with_context(|| format!("fetch from '{remote}' failed"))?;
            ui::success("Fetched.");
            Ok(Outcome::Continue)
        })
        .item('p', "Pull", |_, _, _| {
            let spinner = ui::spinner(&format!("Pulling from {remote}..."));
            let result = repo.pull(remote);
            spinner.finish_and_clear();
            let output = result.with_context(|| format!("pull from '{remote}' failed"))?;
            println!("{output}");
            Ok(Outcome::Continue)
        })
        .item('r', "Pull with rebase", |_, _, _| {
            let spinner = ui::spinner(&format!("Rebasing onto {remote}..."));
            let result = repo.pull_rebase(remote);
            spinner.finish_and_clear();
            let output = result.with_context(|| format!("pull --rebase from '{remote}' failed"))?;
            println!("{output}");
            Ok(Outcome::Continue)
        })
        .item('u', "Push", |_, _, _| {
            let spinner = ui::spinner(&format!("Pushing to {remote}..."));
            let result = repo.push(remote);
            spinner.finish_and_clear();
            result.with_context(|| format!("push to '{remote}' failed"))?;
            ui::success("Pushed.");
            Ok(Outcome::Continue)
        })
        .item('s', "Short status", |_, out, _| {
            writeln!(out, "{}", repo.status_short()?)?;
            Ok(Outcome::Continue)
        });
    menu.run(preset, None, input, out)
}
