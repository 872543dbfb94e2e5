//! Platform-agnostic types for the skylog weather journal.
//!
//! This crate provides the values shared by the store and the command-line
//! front end: the fetched [`WeatherSnapshot`], its [`CurrentConditions`] and
//! [`ForecastDay`] entries, and the small enums that classify them.
//!
//! # Features
//!
//! - Location classification (`City` vs `Coordinates`)
//! - Normalized weather [`Condition`] tokens with glyph lookup
//! - Icon representation choice via [`IconStyle`]
//! - Both-or-neither [`DateRange`]
//!
//! # Example
//!
//! ```
//! use skylog_types::{Condition, DateRange, LocationType};
//!
//! assert_eq!(LocationType::detect("51.5,-0.12"), LocationType::Coordinates);
//! assert_eq!(Condition::parse("Clouds"), Condition::Clouds);
//! assert!(DateRange::from_parts(Some("2024-05-01"), None).is_err());
//! ```

pub mod error;
pub mod icons;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    Condition, CurrentConditions, DateRange, ForecastDay, IconStyle, LocationType,
    MAX_FORECAST_DAYS, WeatherSnapshot, parse_coordinates,
};
