//! Dotpilot - interactive single-letter menus for git, GitHub and your
//! dotfiles repository.
//!
//! This library provides the building blocks for the dotpilot binary:
//! - The menu dispatcher and the indexed list selector
//! - Git plumbing with an explicit repository context
//! - Repository web pages and GitHub CLI integration
//! - The concrete branch/stash/history/sync/dotfiles menus
//! - Configuration management

pub mod branch;
pub mod cfg;
pub mod dots;
pub mod git;
pub mod history;
pub mod hub;
pub mod menu;
pub mod pick;
pub mod stash;
pub mod sync;
pub mod ui;
