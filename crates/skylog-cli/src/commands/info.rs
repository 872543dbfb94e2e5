//! Info command implementation.

use anyhow::Result;
use skylog_store::Store;

use super::AppContext;
use crate::config::Config;
use crate::format::format_time;
use crate::style;
use crate::util::write_output;

pub fn cmd_info(ctx: &AppContext) -> Result<()> {
    let store = ctx.open_store()?;
    write_output(None, &render_info(ctx, &store)?)
}

fn render_info(ctx: &AppContext, store: &Store) -> Result<String> {
    let count = store.record_count()?;
    let newest = store
        .list_records(&skylog_store::RecordQuery::new().limit(1))?
        .into_iter()
        .next();

    let mut output = style::format_title("Weather Journal", ctx.opts.no_color);
    output.push('\n');
    output.push_str(&format!(
        "  Database:    {}\n",
        store
            .location()
            .unwrap_or_else(|| ctx.database.display().to_string())
    ));
    output.push_str(&format!("  Image size:  {} bytes\n", store.image_size()?));
    output.push_str(&format!("  Records:     {}\n", count));
    if let Some(record) = newest {
        output.push_str(&format!(
            "  Last saved:  {} ({})\n",
            format_time(record.saved_at),
            record.location
        ));
    }
    output.push_str(&format!("  Config:      {}\n", Config::path().display()));
    output.push_str(&format!(
        "  API key:     {}\n",
        if ctx.api_key.is_some() { "configured" } else { "not set" }
    ));
    output.push_str(&format!("  Icon style:  {}\n", ctx.config.icon_style));
    Ok(output)
}
