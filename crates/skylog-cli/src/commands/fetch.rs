//! Fetch command implementation.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use skylog_store::{SaveOutcome, Session};
use skylog_types::{DateRange, WeatherSnapshot};

use super::AppContext;
use crate::cli::OutputFormat;
use crate::format::format_snapshot_text;
use crate::style;
use crate::util::write_output;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub location: String,
    pub range: Option<DateRange>,
    pub save: bool,
    pub timeout: Option<u64>,
    pub format: OutputFormat,
}

pub async fn cmd_fetch(ctx: &AppContext, args: FetchArgs) -> Result<()> {
    let FetchArgs {
        location,
        range,
        save,
        timeout,
        format,
    } = args;

    let snapshot = lookup(ctx, &location, range, timeout).await?;

    let content = match format {
        OutputFormat::Json => ctx.opts.as_json(&snapshot)?,
        OutputFormat::Text => format_snapshot_text(&snapshot, &ctx.opts),
    };
    write_output(None, &content)?;

    if save {
        let store = ctx.open_store()?;
        let mut session = Session::new();
        session.set_fetched(snapshot);
        let outcome = session.save(&store).context("Failed to save weather data")?;
        ctx.notify(&saved_message(outcome, ctx.opts.no_color));
    }

    Ok(())
}

/// Fetch one lookup, showing a spinner on interactive terminals.
pub(crate) async fn lookup(
    ctx: &AppContext,
    location: &str,
    range: Option<DateRange>,
    timeout: Option<u64>,
) -> Result<WeatherSnapshot> {
    let client = ctx.weather_client(timeout)?;

    let spinner = (!ctx.quiet && io::stderr().is_terminal()).then(|| style::fetching_spinner(location));
    let result = client.fetch(location, range).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    result.with_context(|| format!("Failed to fetch weather for '{}'", location.trim()))
}

/// Status line after a save.
pub(crate) fn saved_message(outcome: SaveOutcome, no_color: bool) -> String {
    match outcome {
        SaveOutcome::Inserted(id) => style::format_success(&format!("Saved as record {}", id), no_color),
        SaveOutcome::Updated(id) => style::format_success(&format!("Updated record {}", id), no_color),
    }
}
