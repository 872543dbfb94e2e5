//! List, show and search commands.

use anyhow::{Context, Result, bail};
use skylog_store::{RecordQuery, Store, WeatherRecord};

use super::AppContext;
use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_record_text, format_records_text};
use crate::util::write_output;

pub fn cmd_list(
    ctx: &AppContext,
    limit: Option<u32>,
    oldest_first: bool,
    format: OutputFormat,
) -> Result<()> {
    let store = ctx.open_store()?;
    let content = render_list(&store, limit, oldest_first, format, &ctx.opts)?;
    write_output(None, &content)
}

pub fn cmd_show(ctx: &AppContext, id: i64, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let content = render_show(&store, id, format, &ctx.opts)?;
    write_output(None, &content)
}

pub fn cmd_search(ctx: &AppContext, term: &str, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let content = render_search(&store, term, format, &ctx.opts)?;
    write_output(None, &content)
}

pub(crate) fn render_list(
    store: &Store,
    limit: Option<u32>,
    oldest_first: bool,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let mut query = RecordQuery::new();
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    if oldest_first {
        query = query.oldest_first();
    }

    let records = store.list_records(&query).context("Failed to load records")?;
    render_many(&records, format, opts)
}

pub(crate) fn render_show(
    store: &Store,
    id: i64,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let Some(record) = store.get_record(id).context("Failed to load record")? else {
        bail!("Record {} not found", id);
    };

    match format {
        OutputFormat::Json => opts.as_json(&record),
        OutputFormat::Text => Ok(format_record_text(&record, opts)),
    }
}

pub(crate) fn render_search(
    store: &Store,
    term: &str,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let records = store.search_records(term).context("Search failed")?;

    if records.is_empty() && !term.trim().is_empty() && format == OutputFormat::Text {
        return Ok(format!("No records match '{}'.\n", term.trim()));
    }
    render_many(&records, format, opts)
}

fn render_many(records: &[WeatherRecord], format: OutputFormat, opts: &FormatOptions) -> Result<String> {
    match format {
        OutputFormat::Json => opts.as_json(&records),
        OutputFormat::Text => Ok(format_records_text(records, opts)),
    }
}
