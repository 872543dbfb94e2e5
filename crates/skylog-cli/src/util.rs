//! Utility functions for CLI operations.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, theme::ColorfulTheme};
use skylog_store::Store;
use skylog_types::DateRange;
use time::macros::format_description;
use time::{Date, Duration};

use crate::cli::RangeArgs;

/// Open the journal, with a readable error on failure.
pub fn open_store(path: &Path) -> Result<Store> {
    match Store::open_path(path) {
        Ok(store) => Ok(store),
        Err(e) if e.is_fatal() => Err(e).with_context(|| {
            format!(
                "The weather journal at {} is not a valid snapshot. \
                 Move it aside or pass --database to start a new one",
                path.display()
            )
        }),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to open weather journal at {}", path.display()))
        }
    }
}

/// Ask before a destructive action.
///
/// `yes` skips the prompt. Without an interactive terminal the action is
/// refused unless `yes` was given.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        bail!("Refusing to continue without confirmation. Pass --yes to confirm.");
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Work out the date range for a lookup.
///
/// No flags gives `today ..= today + range_days`. A start alone ends
/// `range_days` after it; an end alone starts today.
pub fn resolve_range(args: &RangeArgs, today: Date, range_days: u32) -> Result<Option<DateRange>> {
    if args.no_range {
        return Ok(None);
    }

    let start = match args.start.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => today.to_string(),
    };
    let end = match args.end.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => Date::parse(&start, format_description!("[year]-[month]-[day]"))
            .unwrap_or(today)
            .checked_add(Duration::days(i64::from(range_days)))
            .context("Date range end is out of range")?
            .to_string(),
    };

    Ok(Some(DateRange::new(start, end)))
}

/// Pick the file an export is written to.
///
/// `None` means stdout.
pub fn export_target(output: Option<PathBuf>, default_name: &str) -> Option<PathBuf> {
    match output {
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => Some(path),
        None => Some(PathBuf::from(default_name)),
    }
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
