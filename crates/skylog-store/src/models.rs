//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use skylog_types::{
    Condition, CurrentConditions, DateRange, ForecastDay, LocationType, WeatherSnapshot,
};

/// A weather record stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Database row ID.
    pub id: i64,
    /// Display location, e.g. `"Paris, FR"`.
    pub location: String,
    /// How the location was entered.
    pub location_type: LocationType,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Normalized condition token.
    pub condition: Condition,
    /// Human-readable description.
    pub description: String,
    /// Humidity percentage.
    pub humidity: u8,
    /// Wind speed.
    pub wind_speed: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// Glyph or provider icon code.
    pub icon: String,
    /// Daily forecast, in stored order.
    pub forecast: Vec<ForecastDay>,
    /// Optional user date range.
    pub date_range: Option<DateRange>,
    /// When the source lookup was fetched.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Last write time.
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    /// First insert time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl WeatherRecord {
    /// Convert back into the snapshot shape accepted by the store.
    pub fn to_snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            location: self.location.clone(),
            location_type: self.location_type,
            current: CurrentConditions {
                temperature: self.temperature,
                condition: self.condition.clone(),
                description: self.description.clone(),
                humidity: self.humidity,
                wind_speed: self.wind_speed,
                pressure: self.pressure,
                icon: self.icon.clone(),
            },
            forecast: self.forecast.clone(),
            date_range: self.date_range.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Field changes made through the edit flow.
///
/// Unset fields keep their stored value. Forecast, icon, condition and
/// capture timestamp are never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordEdit {
    pub location: Option<String>,
    pub temperature: Option<f64>,
    /// New description (the "condition" field of the edit form).
    pub description: Option<String>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    /// `Some(None)` clears the range; `None` leaves it untouched.
    pub date_range: Option<Option<DateRange>>,
}

impl RecordEdit {
    /// Whether no field is being changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply these changes on top of a stored record.
    pub fn apply(&self, record: &WeatherRecord) -> WeatherSnapshot {
        let mut snapshot = record.to_snapshot();

        if let Some(ref location) = self.location {
            snapshot.location = location.trim().to_string();
        }
        if let Some(temperature) = self.temperature {
            snapshot.current.temperature = temperature;
        }
        if let Some(ref description) = self.description {
            snapshot.current.description = description.trim().to_string();
        }
        if let Some(humidity) = self.humidity {
            snapshot.current.humidity = humidity;
        }
        if let Some(wind_speed) = self.wind_speed {
            snapshot.current.wind_speed = wind_speed;
        }
        if let Some(pressure) = self.pressure {
            snapshot.current.pressure = pressure;
        }
        if let Some(ref date_range) = self.date_range {
            snapshot.date_range = date_range.clone();
        }

        snapshot
    }
}

/// What [`Session::save`](crate::Session::save) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was created with this id.
    Inserted(i64),
    /// The record under edit was overwritten.
    Updated(i64),
}

impl SaveOutcome {
    /// The id of the record that was written.
    pub fn id(&self) -> i64 {
        match self {
            SaveOutcome::Inserted(id) | SaveOutcome::Updated(id) => *id,
        }
    }
}
