//! Record operations: create, read, update, delete and search.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use skylog_types::{Condition, DateRange, ForecastDay, LocationType, WeatherSnapshot};

use crate::error::{Error, Result};
use crate::models::WeatherRecord;
use crate::queries::{RECORD_COLUMNS, RecordQuery};
use crate::store::Store;
use crate::timestamps;

/// A row as SQLite returns it, before any decoding that can fail.
struct RawRecord {
    id: i64,
    location: String,
    location_type: Option<String>,
    temperature: Option<f64>,
    condition: Option<String>,
    description: Option<String>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    pressure: Option<f64>,
    icon: Option<String>,
    forecast_data: Option<String>,
    date_range_start: Option<String>,
    date_range_end: Option<String>,
    timestamp: Option<String>,
    saved_at: Option<String>,
    created_at: Option<String>,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            location: row.get(1)?,
            location_type: row.get(2)?,
            temperature: row.get(3)?,
            condition: row.get(4)?,
            description: row.get(5)?,
            humidity: row.get(6)?,
            wind_speed: row.get(7)?,
            pressure: row.get(8)?,
            icon: row.get(9)?,
            forecast_data: row.get(10)?,
            date_range_start: row.get(11)?,
            date_range_end: row.get(12)?,
            timestamp: row.get(13)?,
            saved_at: row.get(14)?,
            created_at: row.get(15)?,
        })
    }

    fn into_record(self) -> Result<WeatherRecord> {
        let created_at = match self.created_at.as_deref() {
            Some(s) => timestamps::parse(s)?,
            None => {
                return Err(Error::InvalidTimestamp(format!(
                    "record {} has no created_at",
                    self.id
                )));
            }
        };
        let saved_at = parse_or(self.saved_at.as_deref(), created_at)?;
        let timestamp = parse_or(self.timestamp.as_deref(), created_at)?;

        let location_type = match self.location_type.as_deref() {
            Some(label) => label.parse().unwrap_or_else(|_| {
                warn!("Record {} has unknown location type {:?}", self.id, label);
                LocationType::City
            }),
            None => LocationType::City,
        };

        let forecast: Vec<ForecastDay> = match self.forecast_data.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
            _ => Vec::new(),
        };

        let date_range = match DateRange::from_parts(
            self.date_range_start.as_deref(),
            self.date_range_end.as_deref(),
        ) {
            Ok(range) => range,
            Err(e) => {
                warn!("Record {} has a half-open date range, ignoring it: {}", self.id, e);
                None
            }
        };

        Ok(WeatherRecord {
            id: self.id,
            location: self.location,
            location_type,
            temperature: self.temperature.unwrap_or_default(),
            condition: self
                .condition
                .as_deref()
                .map(Condition::parse)
                .unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            humidity: self.humidity.map(|h| h.round().clamp(0.0, 100.0) as u8).unwrap_or(0),
            wind_speed: self.wind_speed.unwrap_or_default(),
            pressure: self.pressure.unwrap_or_default(),
            icon: self.icon.unwrap_or_default(),
            forecast,
            date_range,
            timestamp,
            saved_at,
            created_at,
        })
    }
}

fn parse_or(value: Option<&str>, fallback: OffsetDateTime) -> Result<OffsetDateTime> {
    value.map_or(Ok(fallback), timestamps::parse)
}

fn range_parts(range: &Option<DateRange>) -> (Option<&str>, Option<&str>) {
    match range {
        Some(range) => (Some(range.start.as_str()), Some(range.end.as_str())),
        None => (None, None),
    }
}

// Write operations
impl Store {
    /// Run `write` in a transaction and persist before committing.
    ///
    /// `write` returns its value and whether it changed anything. A failed
    /// persist drops the transaction, so the in-memory database stays in step
    /// with the snapshot.
    fn persisted_write<T>(&self, write: impl FnOnce(&Connection) -> Result<(T, bool)>) -> Result<T> {
        let tx = self.conn().unchecked_transaction()?;
        let (value, changed) = write(&tx)?;
        if changed {
            self.persist()?;
        }
        tx.commit()?;
        Ok(value)
    }

    /// Save a fetched snapshot as a new record.
    ///
    /// The store assigns the id; `saved_at` and `created_at` are both set to
    /// now. Returns the new record's id.
    pub fn insert_record(&self, snapshot: &WeatherSnapshot) -> Result<i64> {
        snapshot.validate()?;

        let now = timestamps::format_stamp(timestamps::now_millis())?;
        let captured = timestamps::format_rfc3339(snapshot.timestamp)?;
        let forecast = serde_json::to_string(&snapshot.forecast)?;
        let (start, end) = range_parts(&snapshot.date_range);

        let id = self.persisted_write(|conn| {
            conn.execute(
                "INSERT INTO weather_records (location, location_type, temperature, condition,
                 description, humidity, wind_speed, pressure, icon, forecast_data,
                 date_range_start, date_range_end, timestamp, saved_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
                rusqlite::params![
                    snapshot.location.trim(),
                    snapshot.location_type.as_str(),
                    snapshot.current.temperature,
                    snapshot.current.condition.as_str(),
                    snapshot.current.description,
                    snapshot.current.humidity,
                    snapshot.current.wind_speed,
                    snapshot.current.pressure,
                    snapshot.current.icon,
                    forecast,
                    start,
                    end,
                    captured,
                    now,
                ],
            )
            .map_err(Error::from_write)?;
            Ok((conn.last_insert_rowid(), true))
        })?;

        info!("Saved weather record {} for {}", id, snapshot.location.trim());
        Ok(id)
    }

    /// Overwrite every column of record `id` with `snapshot`.
    ///
    /// `saved_at` moves strictly forward; `created_at` is untouched. Returns
    /// the number of rows changed, which is `0` when `id` does not exist.
    pub fn update_record(&self, id: i64, snapshot: &WeatherSnapshot) -> Result<usize> {
        snapshot.validate()?;
        let forecast = serde_json::to_string(&snapshot.forecast)?;
        let captured = timestamps::format_rfc3339(snapshot.timestamp)?;
        let (start, end) = range_parts(&snapshot.date_range);

        let changed = self.persisted_write(|conn| {
            let previous: Option<(Option<String>, Option<String>)> = conn
                .query_row(
                    "SELECT saved_at, created_at FROM weather_records WHERE id = ?",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let Some((saved_at, created_at)) = previous else {
                debug!("Update of record {} matched nothing", id);
                return Ok((0, false));
            };

            let floor = [saved_at, created_at]
                .iter()
                .flatten()
                .filter_map(|s| timestamps::parse(s).ok())
                .max();
            let stamp = timestamps::format_stamp(timestamps::next_stamp(floor))?;

            let changed = conn
                .execute(
                    "UPDATE weather_records SET
                        location = ?1,
                        location_type = ?2,
                        temperature = ?3,
                        condition = ?4,
                        description = ?5,
                        humidity = ?6,
                        wind_speed = ?7,
                        pressure = ?8,
                        icon = ?9,
                        forecast_data = ?10,
                        date_range_start = ?11,
                        date_range_end = ?12,
                        timestamp = ?13,
                        saved_at = ?14
                     WHERE id = ?15",
                    rusqlite::params![
                        snapshot.location.trim(),
                        snapshot.location_type.as_str(),
                        snapshot.current.temperature,
                        snapshot.current.condition.as_str(),
                        snapshot.current.description,
                        snapshot.current.humidity,
                        snapshot.current.wind_speed,
                        snapshot.current.pressure,
                        snapshot.current.icon,
                        forecast,
                        start,
                        end,
                        captured,
                        stamp,
                        id,
                    ],
                )
                .map_err(Error::from_write)?;
            Ok((changed, changed > 0))
        })?;

        if changed > 0 {
            info!("Updated weather record {}", id);
        }
        Ok(changed)
    }

    /// Delete one record. Returns whether a record was removed.
    ///
    /// Callers are responsible for asking for confirmation first.
    pub fn delete_record(&self, id: i64) -> Result<bool> {
        let changed = self.persisted_write(|conn| {
            let changed = conn
                .execute("DELETE FROM weather_records WHERE id = ?", [id])
                .map_err(Error::from_write)?;
            Ok((changed, changed > 0))
        })?;

        if changed == 0 {
            debug!("Delete of record {} matched nothing", id);
            return Ok(false);
        }

        info!("Deleted weather record {}", id);
        Ok(true)
    }

    /// Delete every record. Returns how many were removed.
    ///
    /// Callers are responsible for asking for confirmation first.
    pub fn delete_all_records(&self) -> Result<usize> {
        let changed = self.persisted_write(|conn| {
            let changed = conn
                .execute("DELETE FROM weather_records", [])
                .map_err(Error::from_write)?;
            Ok((changed, changed > 0))
        })?;

        info!("Deleted {} weather records", changed);
        Ok(changed)
    }
}

// Read operations
impl Store {
    /// Get one record, or `None` if `id` does not exist.
    pub fn get_record(&self, id: i64) -> Result<Option<WeatherRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM weather_records WHERE id = ?");
        let raw = self
            .conn()
            .query_row(&sql, [id], RawRecord::from_row)
            .optional()?;

        raw.map(RawRecord::into_record).transpose()
    }

    /// Query records with a [`RecordQuery`].
    pub fn list_records(&self, query: &RecordQuery) -> Result<Vec<WeatherRecord>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), RawRecord::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRecord::into_record).collect()
    }

    /// All records, most recently created first.
    pub fn all_records(&self) -> Result<Vec<WeatherRecord>> {
        self.list_records(&RecordQuery::new())
    }

    /// Records whose location, description or date range contains `term`,
    /// ignoring case. A blank term returns every record.
    pub fn search_records(&self, term: &str) -> Result<Vec<WeatherRecord>> {
        self.list_records(&RecordQuery::new().search(term))
    }

    /// Count stored records.
    pub fn record_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM weather_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{FlakySnapshot, MemorySnapshot};
    use skylog_types::CurrentConditions;
    use time::macros::datetime;

    fn snapshot(location: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location: location.to_string(),
            location_type: LocationType::City,
            current: CurrentConditions {
                temperature: 17.0,
                condition: Condition::Rain,
                description: "light rain".to_string(),
                humidity: 81,
                wind_speed: 5.7,
                pressure: 1009.0,
                icon: Condition::Rain.glyph().to_string(),
            },
            forecast: vec![
                ForecastDay {
                    date: "2024-05-02".to_string(),
                    day: "Thu".to_string(),
                    condition: Condition::Rain,
                    high: 18.0,
                    low: 11.0,
                    icon: "10d".to_string(),
                },
                ForecastDay {
                    date: "2024-05-03".to_string(),
                    day: "Fri".to_string(),
                    condition: Condition::Clear,
                    high: 22.0,
                    low: 12.0,
                    icon: "01d".to_string(),
                },
                ForecastDay {
                    date: "2024-05-04".to_string(),
                    day: "Sat".to_string(),
                    condition: Condition::Clouds,
                    high: 20.0,
                    low: 13.0,
                    icon: "03d".to_string(),
                },
            ],
            date_range: Some(DateRange::new("2024-05-01", "2024-05-06")),
            timestamp: datetime!(2024-05-01 09:30:00.123 +02:00),
        }
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let store = Store::open_in_memory().unwrap();
        let original = snapshot("Paris, FR");

        let id = store.insert_record(&original).unwrap();
        let record = store.get_record(id).unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.to_snapshot(), original);
        let days: Vec<_> = record.forecast.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, ["Thu", "Fri", "Sat"]);
        assert_eq!(record.saved_at, record.created_at);
    }

    #[test]
    fn test_get_missing_record_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_record(42).unwrap().is_none());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = Store::open_in_memory().unwrap();
        let first = store.insert_record(&snapshot("A")).unwrap();
        let second = store.insert_record(&snapshot("B")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_insert_rejects_blank_location() {
        let store = Store::open_in_memory().unwrap();
        let err = store.insert_record(&snapshot("  ")).unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn test_update_keeps_created_at_and_advances_saved_at() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();
        let inserted = store.get_record(id).unwrap().unwrap();

        let mut changed = snapshot("Paris, FR");
        changed.current.temperature = 19.0;
        assert_eq!(store.update_record(id, &changed).unwrap(), 1);
        let first = store.get_record(id).unwrap().unwrap();

        changed.current.temperature = 21.0;
        assert_eq!(store.update_record(id, &changed).unwrap(), 1);
        let second = store.get_record(id).unwrap().unwrap();

        assert_eq!(first.created_at, inserted.created_at);
        assert_eq!(second.created_at, inserted.created_at);
        assert!(first.saved_at > inserted.saved_at);
        assert!(second.saved_at > first.saved_at);
        assert_eq!(second.temperature, 21.0);
    }

    #[test]
    fn test_update_missing_record_is_noop() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.update_record(99, &snapshot("Nowhere")).unwrap(), 0);
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn test_update_can_clear_date_range() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();

        let mut changed = snapshot("Paris, FR");
        changed.date_range = None;
        store.update_record(id, &changed).unwrap();

        assert!(store.get_record(id).unwrap().unwrap().date_range.is_none());
    }

    #[test]
    fn test_delete_record() {
        let store = Store::open_in_memory().unwrap();
        let keep = store.insert_record(&snapshot("Keep")).unwrap();
        let drop = store.insert_record(&snapshot("Drop")).unwrap();

        assert!(store.delete_record(drop).unwrap());
        assert!(!store.delete_record(drop).unwrap());

        let remaining: Vec<_> = store.all_records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(remaining, [keep]);
    }

    #[test]
    fn test_delete_all_then_list_is_empty() {
        let store = Store::open_in_memory().unwrap();
        store.insert_record(&snapshot("A")).unwrap();
        store.insert_record(&snapshot("B")).unwrap();

        assert_eq!(store.delete_all_records().unwrap(), 2);
        assert!(store.all_records().unwrap().is_empty());
        assert_eq!(store.delete_all_records().unwrap(), 0);
    }

    #[test]
    fn test_all_records_newest_first() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_record(&snapshot("First")).unwrap();
        let b = store.insert_record(&snapshot("Second")).unwrap();
        let c = store.insert_record(&snapshot("Third")).unwrap();

        let ids: Vec<_> = store.all_records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, [c, b, a]);

        let oldest: Vec<_> = store
            .list_records(&RecordQuery::new().oldest_first())
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(oldest, [a, b, c]);
    }

    #[test]
    fn test_same_instant_ties_break_by_id() {
        let store = Store::open_in_memory().unwrap();
        for location in ["A", "B", "C"] {
            store
                .conn()
                .execute(
                    "INSERT INTO weather_records (location, created_at) VALUES (?, '2024-05-01T00:00:00.000Z')",
                    [location],
                )
                .unwrap();
        }

        let names: Vec<_> = store
            .all_records()
            .unwrap()
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(names, ["C", "B", "A"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();
        store.insert_record(&snapshot("Berlin, DE")).unwrap();

        for term in ["paris", "PARIS", "Paris, fr"] {
            let found: Vec<_> = store.search_records(term).unwrap().iter().map(|r| r.id).collect();
            assert_eq!(found, [id], "term {term:?}");
        }
    }

    #[test]
    fn test_search_matches_description_and_dates() {
        let store = Store::open_in_memory().unwrap();
        let mut sunny = snapshot("Madrid, ES");
        sunny.current.description = "Clear Sky".to_string();
        sunny.date_range = Some(DateRange::new("2023-07-10", "2023-07-15"));
        let madrid = store.insert_record(&sunny).unwrap();
        let paris = store.insert_record(&snapshot("Paris, FR")).unwrap();

        let ids = |term: &str| -> Vec<i64> {
            store.search_records(term).unwrap().iter().map(|r| r.id).collect()
        };

        assert_eq!(ids("clear sky"), [madrid]);
        assert_eq!(ids("2023-07"), [madrid]);
        assert_eq!(ids("07-15"), [madrid]);
        assert_eq!(ids("2024-05-06"), [paris]);
        assert!(ids("tokyo").is_empty());
    }

    #[test]
    fn test_search_skips_capture_timestamp() {
        let store = Store::open_in_memory().unwrap();
        store.insert_record(&snapshot("Paris, FR")).unwrap();

        assert!(store.search_records("09:30").unwrap().is_empty());
        assert!(store.search_records("07:30").unwrap().is_empty());
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let store = Store::open_in_memory().unwrap();
        store.insert_record(&snapshot("Paris, FR")).unwrap();
        assert!(store.search_records("%").unwrap().is_empty());
        assert!(store.search_records("_aris").unwrap().is_empty());
    }

    #[test]
    fn test_search_unicode_case_folding() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_record(&snapshot("SÃO PAULO, BR")).unwrap();
        let found: Vec<_> = store.search_records("são").unwrap().iter().map(|r| r.id).collect();
        assert_eq!(found, [id]);
    }

    #[test]
    fn test_blank_search_equals_all_records() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.search_records("").unwrap(), store.all_records().unwrap());

        store.insert_record(&snapshot("A")).unwrap();
        store.insert_record(&snapshot("B")).unwrap();

        assert_eq!(store.search_records("").unwrap(), store.all_records().unwrap());
        assert_eq!(store.search_records("   ").unwrap(), store.all_records().unwrap());
    }

    #[test]
    fn test_list_records_pagination() {
        let store = Store::open_in_memory().unwrap();
        let ids: Vec<_> = (0..5)
            .map(|i| store.insert_record(&snapshot(&format!("City {i}"))).unwrap())
            .collect();

        let page: Vec<_> = store
            .list_records(&RecordQuery::new().limit(2).offset(1))
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(page, [ids[3], ids[2]]);
    }

    #[test]
    fn test_legacy_rows_are_normalized() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO weather_records (location, location_type, humidity, forecast_data,
                 date_range_start, created_at)
                 VALUES ('Legacy', 'Coordinates', 64, NULL, '2024-01-01', '2024-01-01 12:00:00')",
                [],
            )
            .unwrap();

        let record = store.all_records().unwrap().remove(0);
        assert_eq!(record.location_type, LocationType::Coordinates);
        assert_eq!(record.humidity, 64);
        assert!(record.forecast.is_empty());
        assert!(record.date_range.is_none());
        assert_eq!(record.created_at, datetime!(2024-01-01 12:00:00 UTC));
        assert_eq!(record.saved_at, record.created_at);
    }

    #[test]
    fn test_corrupt_forecast_blob_is_an_error() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO weather_records (location, forecast_data) VALUES ('Broken', '[{')",
                [],
            )
            .unwrap();

        assert!(matches!(
            store.all_records().unwrap_err(),
            Error::Serialization(_)
        ));
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let backend = MemorySnapshot::new();
        let store = Store::open(backend.clone()).unwrap();

        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();
        assert_eq!(Store::open(backend.clone()).unwrap().record_count().unwrap(), 1);

        let mut changed = snapshot("Paris, FR");
        changed.location = "Lyon, FR".to_string();
        store.update_record(id, &changed).unwrap();
        let reopened = Store::open(backend.clone()).unwrap();
        assert_eq!(reopened.get_record(id).unwrap().unwrap().location, "Lyon, FR");

        store.delete_record(id).unwrap();
        assert_eq!(Store::open(backend.clone()).unwrap().record_count().unwrap(), 0);

        store.insert_record(&snapshot("A")).unwrap();
        store.delete_all_records().unwrap();
        assert_eq!(Store::open(backend).unwrap().record_count().unwrap(), 0);
    }

    #[test]
    fn test_half_open_range_is_rejected_on_write() {
        let store = Store::open_in_memory().unwrap();
        let mut half_open = snapshot("Paris, FR");
        half_open.date_range = Some(DateRange::new("2024-05-01", ""));

        assert!(matches!(
            store.insert_record(&half_open).unwrap_err(),
            Error::Constraint(_)
        ));
        assert_eq!(store.record_count().unwrap(), 0);

        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();
        half_open.date_range = Some(DateRange::new("", "2024-05-06"));
        assert!(matches!(
            store.update_record(id, &half_open).unwrap_err(),
            Error::Constraint(_)
        ));
        assert_eq!(
            store.get_record(id).unwrap().unwrap().date_range,
            Some(DateRange::new("2024-05-01", "2024-05-06"))
        );
    }

    #[test]
    fn test_failed_persist_rolls_back_insert() {
        let backend = FlakySnapshot::default();
        let store = Store::open(backend.clone()).unwrap();
        store.insert_record(&snapshot("Paris, FR")).unwrap();

        backend.set_failing(true);
        assert!(matches!(
            store.insert_record(&snapshot("Rome, IT")).unwrap_err(),
            Error::Io(_)
        ));
        assert_eq!(store.record_count().unwrap(), 1);

        // The next good write must not carry the failed row along.
        backend.set_failing(false);
        store.insert_record(&snapshot("Oslo, NO")).unwrap();
        let reopened = Store::open(MemorySnapshot::with_contents(backend.contents().unwrap())).unwrap();
        let locations: Vec<_> = reopened
            .all_records()
            .unwrap()
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(locations, ["Oslo, NO", "Paris, FR"]);
    }

    #[test]
    fn test_failed_persist_rolls_back_update_and_deletes() {
        let backend = FlakySnapshot::default();
        let store = Store::open(backend.clone()).unwrap();
        let id = store.insert_record(&snapshot("Paris, FR")).unwrap();
        let before = store.get_record(id).unwrap().unwrap();

        backend.set_failing(true);
        let mut changed = snapshot("Paris, FR");
        changed.location = "Lyon, FR".to_string();
        assert!(store.update_record(id, &changed).is_err());
        assert_eq!(store.get_record(id).unwrap().unwrap(), before);

        assert!(store.delete_record(id).is_err());
        assert!(store.delete_all_records().is_err());
        assert_eq!(store.record_count().unwrap(), 1);

        // Writes that change nothing never touch the snapshot.
        assert_eq!(store.update_record(id + 1, &changed).unwrap(), 0);
        assert!(!store.delete_record(id + 1).unwrap());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather-database.json");

        let id = {
            let store = Store::open_path(&path).unwrap();
            store.insert_record(&snapshot("Paris, FR")).unwrap()
        };

        let store = Store::open_path(&path).unwrap();
        let record = store.get_record(id).unwrap().unwrap();
        assert_eq!(record.to_snapshot(), snapshot("Paris, FR"));

        let next = store.insert_record(&snapshot("Nice, FR")).unwrap();
        assert!(next > id);
    }
}
