//! Numeric selection over an ordered list (branches, stashes, commits).
//!
//! Anything that is not an in-range index counts as "no selection"; the
//! pending action is abandoned without further output.

use anyhow::Result;
use regex::Regex;
use std::io::{BufRead, Write};

/// What to do when exactly one candidate remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnSingle {
    /// Skip the prompt and act on the sole item (branch switch).
    Choose,
    /// Refuse without prompting (branch delete keeps the last candidate).
    Decline,
}

pub struct PickOpts<'a> {
    /// Line printed when there is nothing to choose from.
    pub empty: &'a str,
    pub single: OnSingle,
    /// Line printed when `Decline` fires on a one-item list.
    pub refusal: &'a str,
}

/// Validate one line of picker input against a list of `len` items.
/// Accepts at most two digits; everything else is no selection.
pub fn parse_index(input: &str, len: usize) -> Option<usize> {
    let pattern = Regex::new(r"^[0-9]{1,2}$").expect("index pattern compiles");
    let trimmed = input.trim();
    if !pattern.is_match(trimmed) {
        return None;
    }
    let value: usize = trimmed.parse().ok()?;
    (value < len).then_some(value)
}

/// Render `items` with zero-based indices and resolve one line of input to
/// the chosen item. Returns `None` for quit, typos, out-of-range indices,
/// closed stdin, and the empty/single edge cases described on [`PickOpts`].
pub fn pick<'t, T>(
    items: &'t [T],
    render: impl Fn(&T) -> String,
    opts: &PickOpts<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<&'t T>> {
    match items.len() {
        0 => {
            writeln!(out, "{}", opts.empty)?;
            return Ok(None);
        }
        1 => {
            return match opts.single {
                OnSingle::Choose => Ok(Some(&items[0])),
                OnSingle::Decline => {
                    writeln!(out, "{}", opts.refusal)?;
                    Ok(None)
                }
            };
        }
        _ => {}
    }

    let width = (items.len() - 1).to_string().len();
    for (idx, item) in items.iter().enumerate() {
        writeln!(out, "  {idx:>width$}: {}", render(item))?;
    }
    writeln!(out, "  {:>width$}: Quit/Exit", "q")?;
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(parse_index(&line, items.len()).map(|idx| &items[idx]))
}
