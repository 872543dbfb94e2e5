//! Export command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use skylog_store::{Error as StoreError, ExportFormat, Store};
use time::OffsetDateTime;

use super::{AppContext, today};
use crate::style;
use crate::util::{export_target, write_output};

pub fn cmd_export(ctx: &AppContext, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let store = ctx.open_store()?;
    let target = export_records(&store, format, output)?;

    if let Some(path) = target {
        ctx.notify(&style::format_success(
            &format!("Exported {} to {}", format, path.display()),
            ctx.opts.no_color,
        ));
    }
    Ok(())
}

/// Write every record in `format`. Returns the file written, or `None` for
/// stdout.
pub(crate) fn export_records(
    store: &Store,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let content = match store.export(format, OffsetDateTime::now_utc()) {
        Ok(content) => content,
        Err(StoreError::NothingToExport) => bail!("No data to export!"),
        Err(e) => return Err(e).context("Export failed"),
    };

    let target = export_target(output, &format.file_name(today()));
    write_output(target.as_ref(), &content)?;
    Ok(target)
}
