//! Repository web pages and the GitHub CLI.
//!
//! Translates whatever URL the `origin` remote carries into a browsable
//! https URL and derives the per-page links from it. Pull request listing
//! goes through `gh` so authentication stays the CLI's problem.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::Command;

use crate::cfg::Config;
use crate::git::Repo;
use crate::history;
use crate::menu::{Menu, Outcome};
use crate::pick::{self, OnSingle, PickOpts};

/// Convert a git remote URL into its web counterpart. Handles https,
/// `ssh://`, scp-like and `git://` forms, with or without a `.git` suffix.
pub fn web_url(remote: &str) -> Option<String> {
    let trimmed = remote.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        return Some(trimmed.to_string());
    }

    if let Some(rest) = trimmed
        .strip_prefix("ssh://")
        .or_else(|| trimmed.strip_prefix("git://"))
    {
        let rest = rest.split_once('@').map(|(_, host)| host).unwrap_or(rest);
        return Some(format!("https://{rest}"));
    }

    // scp-like: git@github.com:owner/repo
    if let Some((user_host, path)) = trimmed.split_once(':') {
        if !path.is_empty() && !user_host.contains('/') {
            let host = user_host
                .split_once('@')
                .map(|(_, host)| host)
                .unwrap_or(user_host);
            return Some(format!("https://{host}/{path}"));
        }
    }

    None
}

/// Page links derived from a repository's web URL.
pub struct RepoPages {
    base: String,
}

impl RepoPages {
    pub fn new(base: String) -> Self {
        RepoPages { base }
    }

    pub fn home(&self) -> String {
        self.base.clone()
    }

    pub fn issues(&self) -> String {
        format!("{}/issues", self.base)
    }

    pub fn pulls(&self) -> String {
        format!("{}/pulls", self.base)
    }

    pub fn actions(&self) -> String {
        format!("{}/actions", self.base)
    }

    pub fn commit(&self, hash: &str) -> String {
        format!("{}/commit/{}", self.base, hash)
    }

    pub fn tree(&self, branch: &str) -> String {
        format!("{}/tree/{}", self.base, branch)
    }

    pub fn pull(&self, number: u64) -> String {
        format!("{}/pull/{}", self.base, number)
    }
}

/// Open a URL in the default browser.
pub fn open_url(url: &str) -> Result<()> {
    open::that(url).with_context(|| {
        format!("failed to open the browser; you can open it manually:\n  {url}")
    })
}

/// One row of `gh pr list --json number,title`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
}

fn parse_pull_requests(bytes: &[u8]) -> Result<Vec<PullRequest>> {
    serde_json::from_slice(bytes).context("could not parse gh pr list output")
}

/// List open pull requests through the GitHub CLI.
pub fn open_pull_requests(repo_root: &Path, limit: usize) -> Result<Vec<PullRequest>> {
    let output = Command::new("gh")
        .current_dir(repo_root)
        .args(["pr", "list", "--json", "number,title", "--limit"])
        .arg(limit.to_string())
        .output()
        .context("GitHub CLI (gh) not found")?;

    if !output.status.success() {
        bail!(
            "gh pr list failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_pull_requests(&output.stdout)
}

/// True when the GitHub CLI is reachable on PATH.
pub fn check_gh() -> Result<()> {
    which::which("gh")
        .map(|_| ())
        .map_err(|_| anyhow::anyhow!("GitHub CLI (gh) not found on PATH"))
}

/// Resolve the browsable base URL for the repository's configured remote.
fn pages_for(repo: &Repo, config: &Config) -> Result<RepoPages> {
    if let Some(url) = &config.github.remote_override {
        return Ok(RepoPages::new(url.trim_end_matches('/').to_string()));
    }
    let remote = config.general.remote.as_str();
    let remote_url = repo
        .remote_url(remote)
        .with_context(|| format!("no '{remote}' remote configured"))?;
    let url = web_url(&remote_url).with_context(|| {
        format!("cannot derive a web URL from '{remote_url}' (set github.remote_override)")
    })?;
    Ok(RepoPages::new(url))
}

/// The repository menu: one key per page, plus the PR and commit pickers.
pub fn menu(
    repo: &Repo,
    config: &Config,
    preset: Option<&str>,
    arg: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let pages = pages_for(repo, config)?;
    let log_limit = config.general.log_limit;

    let mut menu = Menu::new("Repository")
        .item('o', "Open the repository page", |_, _, _| {
            open_url(&pages.home())?;
            Ok(Outcome::Continue)
        })
        .item('i', "Open issues", |_, _, _| {
            open_url(&pages.issues())?;
            Ok(Outcome::Continue)
        })
        .item('p', "Open pull requests", |_, _, _| {
            open_url(&pages.pulls())?;
            Ok(Outcome::Continue)
        })
        .item('a', "Open workflow runs", |_, _, _| {
            open_url(&pages.actions())?;
            Ok(Outcome::Continue)
        })
        .item('b', "Open the current branch", |_, _, _| {
            let branch = repo.current_branch()?;
            open_url(&pages.tree(&branch))?;
            Ok(Outcome::Continue)
        })
        .item('c', "Open a commit page", |input, out, arg| {
            // a supplied hash wins; otherwise pick from recent commits
            if let Some(hash) = arg {
                open_url(&pages.commit(hash.trim()))?;
                return Ok(Outcome::Continue);
            }
            let commits = repo.recent_commits(log_limit)?;
            if let Some(commit) = history::choose(&commits, None, input, out)? {
                open_url(&pages.commit(&commit.hash))?;
            }
            Ok(Outcome::Continue)
        })
        .item('r', "Pick an open pull request", |input, out, _| {
            let prs = open_pull_requests(repo.root(), log_limit)?;
            let opts = PickOpts {
                empty: "No open pull requests.",
                single: OnSingle::Choose,
                refusal: "",
            };
            let chosen = pick::pick(
                &prs,
                |pr| format!("#{} {}", pr.number, pr.title),
                &opts,
                input,
                out,
            )?;
            if let Some(pr) = chosen {
                open_url(&pages.pull(pr.number))?;
            }
            Ok(Outcome::Continue)
        })
        .item('u', "Print the repository URL", |_, out, _| {
            writeln!(out, "{}", pages.home())?;
            Ok(Outcome::Continue)
        });
    menu.run(preset, arg, input, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_remote_passes_through_without_git_suffix() {
        assert_eq!(
            web_url("https://github.com/psyysp/dotpilot.git").as_deref(),
            Some("https://github.com/psyysp/dotpilot")
        );
        assert_eq!(
            web_url("https://github.com/psyysp/dotpilot").as_deref(),
            Some("https://github.com/psyysp/dotpilot")
        );
    }

    #[test]
    fn scp_like_remote_becomes_https() {
        assert_eq!(
            web_url("git@github.com:psyysp/dotpilot.git").as_deref(),
            Some("https://github.com/psyysp/dotpilot")
        );
    }

    #[test]
    fn ssh_scheme_remote_drops_the_user() {
        assert_eq!(
            web_url("ssh://git@github.com/psyysp/dotpilot.git").as_deref(),
            Some("https://github.com/psyysp/dotpilot")
        );
        assert_eq!(
            web_url("git://github.com/psyysp/dotpilot").as_deref(),
            Some("https://github.com/psyysp/dotpilot")
        );
    }

    #[test]
    fn self_hosted_remotes_keep_their_host() {
        assert_eq!(
            web_url("git@git.example.org:infra/dotfiles.git").as_deref(),
            Some("https://git.example.org/infra/dotfiles")
        );
    }

    #[test]
    fn local_paths_are_not_browsable() {
        assert_eq!(web_url("/srv/git/dotfiles.git"), None);
        assert_eq!(web_url("../dotfiles"), None);
    }

    #[test]
    fn page_links_hang_off_the_base_url() {
        let pages = RepoPages::new("https://github.com/psyysp/dotpilot".to_string());
        assert_eq!(pages.issues(), "https://github.com/psyysp/dotpilot/issues");
        assert_eq!(pages.pulls(), "https://github.com/psyysp/dotpilot/pulls");
        assert_eq!(pages.actions(), "https://github.com/psyysp/dotpilot/actions");
        assert_eq!(
            pages.commit("1a2b3c4"),
            "https://github.com/psyysp/dotpilot/commit/1a2b3c4"
        );
        assert_eq!(
            pages.tree("feature/x"),
            "https://github.com/psyysp/dotpilot/tree/feature/x"
        );
        assert_eq!(pages.pull(42), "https://github.com/psyysp/dotpilot/pull/42");
    }

    #[test]
    fn pull_request_listing_parses_gh_json() {
        let json = br#"[{"number": 7, "title": "Add stash menu"}, {"number": 12, "title": "Fix picker padding"}]"#;
        let prs = parse_pull_requests(json).unwrap();
        assert_eq!(
            prs,
            vec![
                PullRequest {
                    number: 7,
                    title: "Add stash menu".to_string()
                },
                PullRequest {
                    number: 12,
                    title: "Fix picker padding".to_string()
                },
            ]
        );
    }

    #[test]
    fn malformed_gh_json_is_an_error() {
        assert!(parse_pull_requests(b"not json").is_err());
    }
}
