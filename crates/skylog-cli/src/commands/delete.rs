//! Delete and clear commands.

use anyhow::{Result, bail};

use super::AppContext;
use crate::style;
use crate::util::confirm;

pub fn cmd_delete(ctx: &AppContext, id: i64, yes: bool) -> Result<()> {
    let store = ctx.open_store()?;

    let Some(record) = store.get_record(id)? else {
        bail!("Record {} not found", id);
    };

    if !confirm(&format!("Delete record {} ({})?", id, record.location), yes)? {
        ctx.notify("Cancelled.");
        return Ok(());
    }

    store.delete_record(id)?;
    ctx.notify(&style::format_success(&format!("Deleted record {}", id), ctx.opts.no_color));
    Ok(())
}

pub fn cmd_clear(ctx: &AppContext, yes: bool) -> Result<()> {
    let store = ctx.open_store()?;

    let count = store.record_count()?;
    if count == 0 {
        ctx.notify(&style::format_info("The journal is already empty.", ctx.opts.no_color));
        return Ok(());
    }

    let prompt = format!(
        "Delete ALL {} saved records? This cannot be undone.",
        count
    );
    if !confirm(&prompt, yes)? {
        ctx.notify("Cancelled.");
        return Ok(());
    }

    let removed = store.delete_all_records()?;
    ctx.notify(&style::format_success(
        &format!("Deleted {} records", removed),
        ctx.opts.no_color,
    ));
    Ok(())
}
