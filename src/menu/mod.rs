//! Single-letter option menus.
//!
//! Every interactive command in dotpilot is an ordered set of
//! `(code, label, action)` bindings. Invoked with no argument the menu
//! renders a banner and loops on stdin; invoked with a code argument it
//! dispatches once without rendering anything.

use anyhow::{anyhow, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

/// What the dispatch loop should do after an action returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Re-render the banner and prompt again.
    Continue,
    /// Leave the menu without error.
    Quit,
}

/// Actions receive the menu's reader/writer (for nested pickers) and the
/// optional secondary argument from the command line.
type Action<'a> =
    Box<dyn FnMut(&mut dyn BufRead, &mut dyn Write, Option<&str>) -> Result<Outcome> + 'a>;

struct MenuItem<'a> {
    code: char,
    label: &'static str,
    action: Action<'a>,
}

/// An ordered option set. Declaration order is banner order; the reserved
/// `q: Quit/Exit` entry is always rendered last.
pub struct Menu<'a> {
    title: &'static str,
    items: Vec<MenuItem<'a>>,
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit")
}

impl<'a> Menu<'a> {
    pub fn new(title: &'static str) -> Self {
        Menu {
            title,
            items: Vec::new(),
        }
    }

    /// Append an option binding. Codes must be unique within the set.
    pub fn item(
        mut self,
        code: char,
        label: &'static str,
        action: impl FnMut(&mut dyn BufRead, &mut dyn Write, Option<&str>) -> Result<Outcome> + 'a,
    ) -> Self {
        debug_assert!(
            !self.items.iter().any(|i| i.code == code),
            "duplicate menu code {code:?}"
        );
        self.items.push(MenuItem {
            code,
            label,
            action: Box::new(action),
        });
        self
    }

    fn banner(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.title.bold())?;
        for item in &self.items {
            writeln!(out, "  {}: {}", item.code.to_string().cyan(), item.label)?;
        }
        writeln!(out, "  {}: Quit/Exit", "q".cyan())?;
        Ok(())
    }

    fn dispatch(
        &mut self,
        code: &str,
        arg: Option<&str>,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Option<Result<Outcome>> {
        let mut chars = code.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.items
            .iter_mut()
            .find(|i| i.code == c)
            .map(|i| (i.action)(input, out, arg))
    }

    /// Drive the menu. With a preset code the bound action runs exactly once
    /// and an unrecognized code is an error; without one the banner/prompt
    /// loop runs until `q`, a quitting action, or end of input.
    pub fn run(
        &mut self,
        preset: Option<&str>,
        arg: Option<&str>,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<()> {
        if let Some(code) = preset {
            let code = code.trim();
            if is_quit(code) {
                return Ok(());
            }
            return match self.dispatch(code, arg, input, out) {
                Some(result) => result.map(|_| ()),
                None => {
                    writeln!(out, "Invalid option.")?;
                    Err(anyhow!("unrecognized option code '{}'", code))
                }
            };
        }

        loop {
            self.banner(out)?;
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // closed stdin quits, same as `q`
                return Ok(());
            }
            let choice = line.trim().to_string();
            if choice.is_empty() {
                continue;
            }
            if is_quit(&choice) {
                return Ok(());
            }
            match self.dispatch(&choice, arg, input, out) {
                Some(result) => {
                    if result? == Outcome::Quit {
                        return Ok(());
                    }
                }
                None => writeln!(out, "Invalid option.")?,
            }
        }
    }
}
