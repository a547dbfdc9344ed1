mod branch;
mod cfg;
mod dots;
mod git;
mod history;
mod hub;
mod menu;
mod pick;
mod stash;
mod sync;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::git::Repo;

/// Dotpilot - interactive single-letter menus for git, GitHub and your dotfiles repo
#[derive(Parser)]
#[command(name = "dotpilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.dotpilot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repository menu: open pages, pick pull requests, print the URL
    Repo {
        /// Option code to run directly (skips the prompt)
        code: Option<String>,

        /// Commit hash for the commit-page option
        arg: Option<String>,
    },

    /// Dotfiles-repo menu: status, pull, commit & push, edit
    Dotfiles {
        /// Option code to run directly (skips the prompt)
        code: Option<String>,
    },

    /// Update menu: fetch, pull, rebase-pull, push, status
    Update {
        /// Option code to run directly (skips the prompt)
        code: Option<String>,
    },

    /// Stash menu: list, apply, pop, show, drop
    Stash {
        /// Option code to run directly (skips the prompt)
        code: Option<String>,

        /// Stash index for the apply/pop/show/drop options
        index: Option<String>,
    },

    /// Switch to another local branch (numeric picker)
    Switch {
        /// Branch index to use directly (skips the prompt)
        index: Option<String>,
    },

    /// Delete a local branch (numeric picker, confirmed)
    Delete {
        /// Branch index to use directly (skips the prompt)
        index: Option<String>,
    },

    /// Pick a recent commit and act on it
    Log {
        /// Commit index to use directly (skips the prompt)
        index: Option<String>,
    },

    /// Pick a recent commit and rebase interactively from its parent
    Rework {
        /// Commit index to use directly (skips the prompt)
        index: Option<String>,
    },

    /// Write the default configuration
    Init {
        /// Force initialization even if config exists
        #[arg(short, long)]
        force: bool,
    },

    /// Edit or view configuration
    Config {
        /// Open config in editor
        #[arg(long)]
        edit: bool,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },

    /// Run diagnostics and check required tools
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging/verbosity
    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    ui::init();

    let config_path = cli.config.unwrap_or_else(cfg::default_path);

    let result = match cli.command {
        Commands::Repo { code, arg } => cmd_repo(config_path, code, arg).await,
        Commands::Dotfiles { code } => cmd_dotfiles(config_path, code).await,
        Commands::Update { code } => cmd_update(config_path, code).await,
        Commands::Stash { code, index } => cmd_stash(config_path, code, index).await,
        Commands::Switch { index } => cmd_switch(config_path, index).await,
        Commands::Delete { index } => cmd_delete(config_path, index).await,
        Commands::Log { index } => cmd_log(config_path, index).await,
        Commands::Rework { index } => cmd_rework(config_path, index).await,
        Commands::Init { force } => cmd_init(config_path, force).await,
        Commands::Config { edit, show } => cmd_config(config_path, edit, show).await,
        Commands::Doctor => cmd_doctor(config_path).await,
    };

    if let Err(e) = result {
        ui::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Resolve the repository enclosing the invocation directory. The working
/// context is passed down explicitly from here; nothing below reads the
/// ambient current directory.
fn working_repo() -> Result<Repo> {
    let cwd = std::env::current_dir().context("could not determine the working directory")?;
    Ok(Repo::discover(&cwd)?)
}

fn with_stdio<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut dyn BufRead, &mut dyn Write) -> Result<()>,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    f(&mut input, &mut out)
}

async fn cmd_repo(
    config_path: PathBuf,
    code: Option<String>,
    arg: Option<String>,
) -> Result<()> {
    let config = cfg::load_or_default(&config_path)?;
    let repo = working_repo()?;
    with_stdio(|input, out| {
        hub::menu(
            &repo,
            &config,
            code.as_deref(),
            arg.as_deref(),
            input,
            out,
        )
    })
}

async fn cmd_dotfiles(config_path: PathBuf, code: Option<String>) -> Result<()> {
    let config = cfg::load_or_default(&config_path)?;
    with_stdio(|input, out| dots::menu(&config, code.as_deref(), input, out))
}

async fn cmd_update(config_path: PathBuf, code: Option<String>) -> Result<()> {
    let config = cfg::load_or_default(&config_path)?;
    let repo = working_repo()?;
    with_stdio(|input, out| sync::menu(&repo, &config, code.as_deref(), input, out))
}

async fn cmd_stash(
    _config_path: PathBuf,
    code: Option<String>,
    index: Option<String>,
) -> Result<()> {
    let repo = working_repo()?;
    with_stdio(|input, out| {
        stash::menu(&repo, code.as_deref(), index.as_deref(), input, out)
    })
}

async fn cmd_switch(_config_path: PathBuf, index: Option<String>) -> Result<()> {
    let repo = working_repo()?;
    with_stdio(|input, out| branch::switch(&repo, index.as_deref(), input, out))
}

async fn cmd_delete(_config_path: PathBuf, index: Option<String>) -> Result<()> {
    let repo = working_repo()?;
    with_stdio(|input, out| branch::delete(&repo, index.as_deref(), input, out))
}

async fn cmd_log(config_path: PathBuf, index: Option<String>) -> Result<()> {
    let config = cfg::load_or_default(&config_path)?;
    let repo = working_repo()?;
    with_stdio(|input, out| {
        history::log(&repo, config.general.log_limit, index.as_deref(), input, out)
    })
}

async fn cmd_rework(config_path: PathBuf, index: Option<String>) -> Result<()> {
    let config = cfg::load_or_default(&config_path)?;
    let repo = working_repo()?;
    with_stdio(|input, out| {
        history::rework(&repo, config.general.log_limit, index.as_deref(), input, out)
    })
}

async fn cmd_init(config_path: PathBuf, force: bool) -> Result<()> {
    ui::info("Initializing dotpilot...");
    cfg::init(&config_path, force)?;
    ui::success("Dotpilot initialized successfully!");
    ui::hint("Edit the config to point dotfiles.repo_path at your checkout");
    Ok(())
}

async fn cmd_config(config_path: PathBuf, edit: bool, show: bool) -> Result<()> {
    if edit {
        cfg::edit(&config_path)?;
        ui::success("Configuration edited");
    } else if show {
        let config = cfg::load_or_default(&config_path)?;
        println!("{}", toml::to_string_pretty(&config)?);
    } else {
        ui::hint("Use --edit to modify or --show to view the configuration");
    }

    Ok(())
}

async fn cmd_doctor(config_path: PathBuf) -> Result<()> {
    ui::info("Running diagnostics...");
    let config = cfg::load_or_default(&config_path)?;

    let dotfiles_root = config.dotfiles.repo_root();
    let checks = vec![
        ("Git installed", git::check_git()),
        ("GitHub CLI installed", hub::check_gh()),
        ("Config file exists", cfg::check_exists(&config_path)),
        (
            "Inside a git repository",
            working_repo().map(|_| ()),
        ),
        (
            "Dotfiles repository present",
            Repo::at(&dotfiles_root)
                .map(|_| ())
                .map_err(anyhow::Error::from),
        ),
    ];

    let mut has_issues = false;
    for (check, result) in checks {
        match result {
            Ok(_) => ui::success(&format!("✓ {}", check)),
            Err(e) => {
                has_issues = true;
                ui::error(&format!("✗ {}: {}", check, e));
            }
        }
    }

    if !has_issues {
        ui::success("All checks passed!");
    } else {
        ui::hint("Install missing tools:");
        ui::hint("  macOS: brew install git gh");
        ui::hint("  Linux: apt install git gh (or equivalent)");
    }

    Ok(())
}
