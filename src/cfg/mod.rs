use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub dotfiles: DotfilesConfig,

    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Remote the sync and repository menus talk to.
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// How many commits the log/rework pickers show.
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotfilesConfig {
    /// Checkout of the dotfiles repository, tilde-expanded at use.
    #[serde(default = "default_repo_path")]
    pub repo_path: String,

    /// Editor for the dotfiles tree; falls back to $EDITOR, then vi.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GithubConfig {
    /// Explicit web URL for remotes the URL translation cannot handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_override: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            remote: default_remote(),
            main_branch: default_main_branch(),
            log_limit: default_log_limit(),
        }
    }
}

impl Default for DotfilesConfig {
    fn default() -> Self {
        DotfilesConfig {
            repo_path: default_repo_path(),
            editor: None,
        }
    }
}

impl DotfilesConfig {
    pub fn repo_root(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.repo_path).to_string())
    }

    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| "vi".to_string())
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_log_limit() -> usize {
    20
}

fn default_repo_path() -> String {
    "~/.dotfiles".to_string()
}

pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .expect("Could not find home directory")
        .join(".dotpilot")
        .join("config.toml")
}

pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    save(config_path, &Config::default())?;

    Ok(())
}

/// Load the config, or run on built-in defaults when the file is absent.
/// `init` is a convenience, not a prerequisite.
pub fn load_or_default(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
    let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

    Ok(config)
}

pub fn save(config_path: &Path, config: &Config) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(config_path, toml_string).context("Failed to write config file")?;
    Ok(())
}

pub fn edit(config_path: &Path) -> Result<()> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    Ok(())
}

pub fn check_exists(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        Ok(())
    } else {
        anyhow::bail!("Config file not found (defaults are in effect)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.general.remote, "origin");
        assert_eq!(parsed.general.main_branch, "main");
        assert_eq!(parsed.general.log_limit, 20);
        assert_eq!(parsed.dotfiles.repo_path, "~/.dotfiles");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = load_or_default(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config.general.remote, "origin");
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(
            r#"
[general]
remote = "upstream"
"#,
        )
        .unwrap();
        assert_eq!(config.general.remote, "upstream");
        assert_eq!(config.general.main_branch, "main");
        assert_eq!(config.dotfiles.repo_path, "~/.dotfiles");
    }

    #[test]
    fn repo_root_expands_the_tilde() {
        let dotfiles = DotfilesConfig::default();
        let root = dotfiles.repo_root();
        assert!(!root.to_string_lossy().starts_with('~'));
        assert!(root.ends_with(".dotfiles"));
    }

    #[test]
    fn configured_editor_wins_over_environment() {
        let dotfiles = DotfilesConfig {
            repo_path: default_repo_path(),
            editor: Some("hx".to_string()),
        };
        assert_eq!(dotfiles.editor(), "hx");
    }
}
