//! Database schema.

use rusqlite::Connection;

use crate::error::Result;

/// Name of the only table in the store.
pub const RECORDS_TABLE: &str = "weather_records";

/// Apply the schema. Safe to call on every open.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS weather_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            location TEXT NOT NULL,
            location_type TEXT,
            temperature REAL,
            condition TEXT,
            description TEXT,
            humidity INTEGER,
            wind_speed REAL,
            pressure REAL,
            icon TEXT,
            forecast_data TEXT, -- JSON array of forecast days
            date_range_start TEXT,
            date_range_end TEXT,
            timestamp TEXT,
            saved_at TEXT,
            created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        CREATE INDEX IF NOT EXISTS idx_weather_records_created
            ON weather_records(created_at);
        "#,
    )?;

    Ok(())
}

/// Check that the records table can be read.
///
/// A deserialized image that is not a valid database only fails once a page
/// is touched, so this is run right after loading a snapshot.
pub fn verify(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    conn.query_row("SELECT COUNT(*) FROM weather_records", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}
