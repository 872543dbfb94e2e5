//! Export stored records to files.
//!
//! Exports are read-only views over [`Store::all_records`]: newest first,
//! rendered as JSON, CSV, XML or Markdown.

use core::fmt;
use core::str::FromStr;
use std::fmt::Write as _;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::info;

use skylog_types::ParseError;

use crate::error::{Error, Result};
use crate::models::WeatherRecord;
use crate::store::Store;
use crate::timestamps;

/// Column header of CSV exports.
pub const CSV_HEADER: [&str; 10] = [
    "ID",
    "Location",
    "Temperature",
    "Condition",
    "Humidity",
    "Wind Speed",
    "Pressure",
    "Date Range Start",
    "Date Range End",
    "Saved At",
];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Xml,
        ExportFormat::Markdown,
    ];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Markdown => "md",
        }
    }

    /// Default file name for an export made on `date`, e.g.
    /// `weather_data_2024-05-01.csv`.
    pub fn file_name(&self, date: Date) -> String {
        format!("weather_data_{}.{}", date, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(ParseError::InvalidValue(format!(
                "unknown export format '{other}' (expected json, csv, xml or markdown)"
            ))),
        }
    }
}

/// Render `records` in `format`.
///
/// `generated_at` is only used by formats that print a generation time.
pub fn export_records(
    records: &[WeatherRecord],
    format: ExportFormat,
    generated_at: OffsetDateTime,
) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Xml => to_xml(records),
        ExportFormat::Markdown => to_markdown(records, generated_at),
    }
}

fn to_csv(records: &[WeatherRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let (start, end) = range_columns(record);
        wtr.write_record([
            record.id.to_string(),
            record.location.clone(),
            record.temperature.to_string(),
            record.description.clone(),
            record.humidity.to_string(),
            record.wind_speed.to_string(),
            record.pressure.to_string(),
            start.to_string(),
            end.to_string(),
            timestamps::format_stamp(record.saved_at)?,
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}

fn to_xml(records: &[WeatherRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("weather_records")))?;

    for record in records {
        let id = record.id.to_string();
        writer.write_event(Event::Start(
            BytesStart::new("record").with_attributes([("id", id.as_str())]),
        ))?;
        text_element(&mut writer, "location", &record.location)?;
        text_element(&mut writer, "temperature", &record.temperature.to_string())?;
        text_element(&mut writer, "condition", &record.description)?;
        text_element(&mut writer, "humidity", &record.humidity.to_string())?;
        text_element(&mut writer, "wind_speed", &record.wind_speed.to_string())?;
        text_element(&mut writer, "pressure", &record.pressure.to_string())?;
        if let Some(ref range) = record.date_range {
            writer.write_event(Event::Start(BytesStart::new("date_range")))?;
            text_element(&mut writer, "start", &range.start)?;
            text_element(&mut writer, "end", &range.end)?;
            writer.write_event(Event::End(BytesEnd::new("date_range")))?;
        }
        text_element(&mut writer, "saved_at", &timestamps::format_stamp(record.saved_at)?)?;
        writer.write_event(Event::End(BytesEnd::new("record")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("weather_records")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Write `<name>text</name>` with `text` escaped.
fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn to_markdown(records: &[WeatherRecord], generated_at: OffsetDateTime) -> Result<String> {
    let mut out = String::from("# Weather Data Export\n\n");
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Generated on: {}\n", human_time(generated_at)?);

    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(out, "## Record {}: {}\n", index + 1, record.location);
        let _ = writeln!(out, "- **Temperature:** {}°C", record.temperature);
        let _ = writeln!(out, "- **Condition:** {}", record.description);
        let _ = writeln!(out, "- **Humidity:** {}%", record.humidity);
        let _ = writeln!(out, "- **Wind Speed:** {} m/s", record.wind_speed);
        let _ = writeln!(out, "- **Pressure:** {} hPa", record.pressure);
        if let Some(ref range) = record.date_range {
            let _ = writeln!(out, "- **Date Range:** {range}");
        }
        let _ = writeln!(out, "- **Saved At:** {}\n", human_time(record.saved_at)?);
    }

    Ok(out)
}

fn range_columns(record: &WeatherRecord) -> (&str, &str) {
    record
        .date_range
        .as_ref()
        .map_or(("", ""), |r| (r.start.as_str(), r.end.as_str()))
}

fn human_time(t: OffsetDateTime) -> Result<String> {
    t.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
    ))
    .map_err(|e| Error::InvalidTimestamp(e.to_string()))
}

impl Store {
    /// Export every record, newest first.
    ///
    /// Refuses with [`Error::NothingToExport`] when the store is empty.
    pub fn export(&self, format: ExportFormat, generated_at: OffsetDateTime) -> Result<String> {
        let records = self.all_records()?;
        if records.is_empty() {
            return Err(Error::NothingToExport);
        }

        let content = export_records(&records, format, generated_at)?;
        info!("Exported {} records as {}", records.len(), format);
        Ok(content)
    }
}
