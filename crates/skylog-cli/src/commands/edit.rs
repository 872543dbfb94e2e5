//! Edit command implementation.

use anyhow::{Context, Result, bail};
use skylog_store::{RecordEdit, Session, Store, WeatherRecord};
use skylog_types::DateRange;

use super::AppContext;
use crate::cli::EditArgs;
use crate::format::format_record_text;
use crate::style;
use crate::util::write_output;

pub fn cmd_edit(ctx: &AppContext, id: i64, fields: &EditArgs) -> Result<()> {
    let edit = record_edit(fields)?;
    let store = ctx.open_store()?;

    let record = apply_edit(&store, id, &edit)?;
    ctx.notify(&style::format_success(&format!("Updated record {}", id), ctx.opts.no_color));
    write_output(None, &format_record_text(&record, &ctx.opts))
}

/// Edit one record through a short-lived session.
fn apply_edit(store: &Store, id: i64, edit: &RecordEdit) -> Result<WeatherRecord> {
    let mut session = Session::new();
    session.begin_edit(store, id)?;
    session
        .commit_edit(store, edit)
        .with_context(|| format!("Failed to update record {}", id))
}

/// Turn edit flags into a [`RecordEdit`].
pub fn record_edit(fields: &EditArgs) -> Result<RecordEdit> {
    let date_range = if fields.clear_range {
        Some(None)
    } else {
        match DateRange::from_parts(fields.start.as_deref(), fields.end.as_deref())? {
            Some(range) => Some(Some(range)),
            None => None,
        }
    };

    let edit = RecordEdit {
        location: fields.location.clone(),
        temperature: fields.temperature,
        description: fields.description.clone(),
        humidity: fields.humidity,
        wind_speed: fields.wind_speed,
        pressure: fields.pressure,
        date_range,
    };

    if edit.is_empty() {
        bail!("Nothing to change. Pass at least one field, e.g. --temperature 21");
    }
    Ok(edit)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::snapshot;
    use super::*;

    #[test]
    fn test_record_edit_requires_a_field() {
        assert!(record_edit(&EditArgs::default()).is_err());
    }

    #[test]
    fn test_record_edit_ranges() {
        let fields = EditArgs {
            clear_range: true,
            ..Default::default()
        };
        assert_eq!(record_edit(&fields).unwrap().date_range, Some(None));

        let fields = EditArgs {
            start: Some("2024-06-01".to_string()),
            end: Some("2024-06-03".to_string()),
            ..Default::default()
        };
        assert_eq!(
            record_edit(&fields).unwrap().date_range,
            Some(Some(DateRange::new("2024-06-01", "2024-06-03")))
        );

        let fields = EditArgs {
            start: Some("2024-06-01".to_string()),
            ..Default::default()
        };
        assert!(record_edit(&fields).is_err());
    }

    #[test]
    fn test_apply_edit() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();

        let fields = EditArgs {
            description: Some("drizzle".to_string()),
            wind_speed: Some(9.5),
            ..Default::default()
        };
        let record = apply_edit(&store, id, &record_edit(&fields).unwrap()).unwrap();

        assert_eq!(record.description, "drizzle");
        assert_eq!(record.wind_speed, 9.5);
        assert_eq!(record.location, "Paris, FR");
    }

    #[test]
    fn test_apply_edit_missing_record() {
        let store = Store::open_in_memory().unwrap();
        let edit = RecordEdit {
            temperature: Some(1.0),
            ..Default::default()
        };
        assert!(apply_edit(&store, 42, &edit).is_err());
    }
}
