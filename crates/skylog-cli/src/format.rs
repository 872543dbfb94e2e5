//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use skylog_store::WeatherRecord;
use skylog_types::{ForecastDay, WeatherSnapshot};
use tabled::builder::Builder;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
        }
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn label(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }
}

/// Format an instant for display, e.g. `2024-05-01 09:30 UTC`.
#[must_use]
pub fn format_time(t: OffsetDateTime) -> String {
    t.to_offset(time::UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
        .unwrap_or_else(|_| "Unknown".to_string())
}

// ============================================================================
// Lookup formatting
// ============================================================================

/// Render a fetched lookup.
#[must_use]
pub fn format_snapshot_text(snapshot: &WeatherSnapshot, opts: &FormatOptions) -> String {
    let mut output = style::format_title(&format!("Weather for {}", snapshot.location), opts.no_color);
    output.push_str("\n\n");
    output.push_str(&conditions_block(snapshot, opts));
    output.push_str(&forecast_block(&snapshot.forecast, opts));
    output
}

fn conditions_block(snapshot: &WeatherSnapshot, opts: &FormatOptions) -> String {
    let current = &snapshot.current;
    let mut output = format!(
        "  {} {}  {}\n\n",
        current.icon,
        current.description,
        style::format_temp_colored(current.temperature, opts.no_color)
    );

    output.push_str(&format!(
        "  {:<14} {}\n",
        opts.label("Humidity:"),
        style::format_humidity_colored(current.humidity, opts.no_color)
    ));
    output.push_str(&format!("  {:<14} {} m/s\n", opts.label("Wind Speed:"), current.wind_speed));
    output.push_str(&format!("  {:<14} {} hPa\n", opts.label("Pressure:"), current.pressure));
    output.push_str(&format!(
        "  {:<14} {}\n",
        opts.label("Location Type:"),
        snapshot.location_type
    ));
    if let Some(ref range) = snapshot.date_range {
        output.push_str(&format!("  {:<14} {}\n", opts.label("Date Range:"), range));
    }
    output
}

fn forecast_block(forecast: &[ForecastDay], opts: &FormatOptions) -> String {
    if forecast.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(["Day", "Date", "", "High", "Low"]);
    for day in forecast {
        builder.push_record([
            day.day.clone(),
            day.date.clone(),
            day.icon.clone(),
            format!("{}°", day.high),
            format!("{}°", day.low),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.no_color);
    format!("\n{}-Day Forecast\n{}\n", forecast.len(), table)
}

// ============================================================================
// Record formatting
// ============================================================================

/// Render one stored record in full.
#[must_use]
pub fn format_record_text(record: &WeatherRecord, opts: &FormatOptions) -> String {
    let snapshot = record.to_snapshot();
    let title = format!("#{} {}", record.id, record.location);
    let mut output = style::format_title(&title, opts.no_color);
    output.push_str("\n\n");
    output.push_str(&conditions_block(&snapshot, opts));
    output.push_str(&format!("  {:<14} {}\n", opts.label("Fetched:"), format_time(record.timestamp)));
    output.push_str(&format!("  {:<14} {}\n", opts.label("Saved:"), format_time(record.saved_at)));
    if record.saved_at != record.created_at {
        output.push_str(&format!(
            "  {:<14} {}\n",
            opts.label("Created:"),
            format_time(record.created_at)
        ));
    }
    output.push_str(&forecast_block(&record.forecast, opts));
    output
}

/// Render a list of stored records as a table.
#[must_use]
pub fn format_records_text(records: &[WeatherRecord], opts: &FormatOptions) -> String {
    if records.is_empty() {
        return "No saved weather records.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Location", "Temp", "Condition", "Humidity", "Date Range", "Saved"]);
    for record in records {
        builder.push_record([
            record.id.to_string(),
            record.location.clone(),
            style::format_temp_colored(record.temperature, opts.no_color),
            format!("{} {}", record.icon, record.description),
            style::format_humidity_colored(record.humidity, opts.no_color),
            record
                .date_range
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
            format_time(record.saved_at),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.no_color);

    let noun = if records.len() == 1 { "record" } else { "records" };
    format!("{} {}:\n{}\n", records.len(), noun, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylog_types::{Condition, CurrentConditions, DateRange, LocationType};
    use time::macros::datetime;

    fn test_opts() -> FormatOptions {
        FormatOptions::new(true)
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Paris, FR".to_string(),
            location_type: LocationType::City,
            current: CurrentConditions {
                temperature: 17.0,
                condition: Condition::Rain,
                description: "light rain".to_string(),
                humidity: 81,
                wind_speed: 5.7,
                pressure: 1009.0,
                icon: "10d".to_string(),
            },
            forecast: vec![ForecastDay {
                date: "2024-05-02".to_string(),
                day: "Thu".to_string(),
                condition: Condition::Rain,
                high: 18.0,
                low: 11.0,
                icon: "10d".to_string(),
            }],
            date_range: Some(DateRange::new("2024-05-01", "2024-05-06")),
            timestamp: datetime!(2024-05-01 09:30:00 UTC),
        }
    }

    fn record(id: i64) -> WeatherRecord {
        let snapshot = snapshot();
        WeatherRecord {
            id,
            location: snapshot.location,
            location_type: snapshot.location_type,
            temperature: snapshot.current.temperature,
            condition: snapshot.current.condition,
            description: snapshot.current.description,
            humidity: snapshot.current.humidity,
            wind_speed: snapshot.current.wind_speed,
            pressure: snapshot.current.pressure,
            icon: snapshot.current.icon,
            forecast: snapshot.forecast,
            date_range: snapshot.date_range,
            timestamp: snapshot.timestamp,
            saved_at: datetime!(2024-05-01 09:31:00 UTC),
            created_at: datetime!(2024-05-01 09:31:00 UTC),
        }
    }

    #[test]
    fn test_format_snapshot_text() {
        let text = format_snapshot_text(&snapshot(), &test_opts());
        assert!(text.starts_with("Weather for Paris, FR\n"));
        assert!(text.contains("light rain"));
        assert!(text.contains("17°C"));
        assert!(text.contains("81%"));
        assert!(text.contains("2024-05-01 to 2024-05-06"));
        assert!(text.contains("1-Day Forecast"));
        assert!(text.contains("Thu"));
    }

    #[test]
    fn test_format_record_text() {
        let text = format_record_text(&record(7), &test_opts());
        assert!(text.starts_with("#7 Paris, FR"));
        assert!(text.contains("Saved:"));
        assert!(text.contains("2024-05-01 09:31 UTC"));
        assert!(!text.contains("Created:"));
    }

    #[test]
    fn test_format_records_text() {
        let text = format_records_text(&[record(2), record(1)], &test_opts());
        assert!(text.starts_with("2 records:"));
        assert!(text.contains("Paris, FR"));
        assert!(text.contains("Date Range"));

        assert_eq!(
            format_records_text(&[], &test_opts()),
            "No saved weather records.\n"
        );
    }

    #[test]
    fn test_as_json_compact() {
        let opts = test_opts().with_compact(true);
        let json = opts.as_json(&record(3)).unwrap();
        assert!(json.starts_with("{\"id\":3,"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_format_time_is_utc() {
        assert_eq!(
            format_time(datetime!(2024-05-01 11:30:00 +02:00)),
            "2024-05-01 09:30 UTC"
        );
    }
}
