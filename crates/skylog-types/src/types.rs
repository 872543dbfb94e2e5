//! Core types for weather lookups and journal records.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseError;
use crate::icons;

/// How a location was entered by the user.
///
/// Derived from the raw input at capture time: a `lat,lon` pair is
/// [`LocationType::Coordinates`], anything else is a [`LocationType::City`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocationType {
    /// Free-form place name such as `"Paris, FR"`.
    #[default]
    City,
    /// Decimal `lat,lon` pair such as `"48.85,2.35"`.
    Coordinates,
}

impl LocationType {
    /// Classify raw location input.
    ///
    /// ```
    /// use skylog_types::LocationType;
    ///
    /// assert_eq!(LocationType::detect("48.85,2.35"), LocationType::Coordinates);
    /// assert_eq!(LocationType::detect("-33,151.2"), LocationType::Coordinates);
    /// assert_eq!(LocationType::detect("Paris, FR"), LocationType::City);
    /// assert_eq!(LocationType::detect("48.85, 2.35"), LocationType::City);
    /// ```
    #[must_use]
    pub fn detect(input: &str) -> Self {
        if parse_coordinates(input).is_some() {
            LocationType::Coordinates
        } else {
            LocationType::City
        }
    }

    /// Stable label used in storage and exports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::City => "City",
            LocationType::Coordinates => "Coordinates",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "City" => Ok(LocationType::City),
            "Coordinates" => Ok(LocationType::Coordinates),
            other => Err(ParseError::UnknownLocationType(other.to_string())),
        }
    }
}

/// Split `lat,lon` input into its two numbers.
///
/// Accepts exactly `-?digits(.digits)?,-?digits(.digits)?` with no
/// surrounding whitespace. Returns `None` for anything else.
#[must_use]
pub fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let (lat, lon) = input.split_once(',')?;
    if !is_plain_decimal(lat) || !is_plain_decimal(lon) {
        return None;
    }
    Some((lat.parse().ok()?, lon.parse().ok()?))
}

fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}

/// Normalized weather category.
///
/// Parsed case-insensitively from the provider's main category and always
/// displayed (and serialized) as a lowercase token. Categories without a
/// dedicated variant are kept verbatim in [`Condition::Other`].
///
/// ```
/// use skylog_types::Condition;
///
/// assert_eq!(Condition::parse("Rain"), Condition::Rain);
/// assert_eq!(Condition::parse("Haze").to_string(), "haze");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
    /// Any other lowercase category token (e.g. `haze`, `smoke`).
    Other(String),
}

impl Condition {
    /// Parse a provider category into a normalized condition.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim().to_lowercase();
        match token.as_str() {
            "clear" => Condition::Clear,
            "clouds" => Condition::Clouds,
            "rain" => Condition::Rain,
            "snow" => Condition::Snow,
            "thunderstorm" => Condition::Thunderstorm,
            "drizzle" => Condition::Drizzle,
            "mist" => Condition::Mist,
            "fog" => Condition::Fog,
            _ => Condition::Other(token),
        }
    }

    /// The lowercase category token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "clear",
            Condition::Clouds => "clouds",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Thunderstorm => "thunderstorm",
            Condition::Drizzle => "drizzle",
            Condition::Mist => "mist",
            Condition::Fog => "fog",
            Condition::Other(token) => token,
        }
    }

    /// Symbolic glyph for this condition, falling back to the default glyph.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        icons::glyph_for(self.as_str())
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Other(String::new())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::parse(&value)
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Condition::parse(value)
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.as_str().to_string()
    }
}

/// How weather icons are represented in captured payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IconStyle {
    /// Symbolic glyph chosen from the condition.
    #[default]
    Glyph,
    /// The provider's own icon code (e.g. `10d`).
    ProviderCode,
}

impl IconStyle {
    /// Pick the icon for a condition according to this style.
    ///
    /// ```
    /// use skylog_types::{Condition, IconStyle};
    ///
    /// assert_eq!(IconStyle::ProviderCode.icon_for(&Condition::Rain, "10d"), "10d");
    /// assert_eq!(IconStyle::Glyph.icon_for(&Condition::Rain, "10d"), Condition::Rain.glyph());
    /// ```
    #[must_use]
    pub fn icon_for(&self, condition: &Condition, provider_code: &str) -> String {
        match self {
            IconStyle::Glyph => condition.glyph().to_string(),
            IconStyle::ProviderCode => provider_code.to_string(),
        }
    }
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconStyle::Glyph => write!(f, "glyph"),
            IconStyle::ProviderCode => write!(f, "provider-code"),
        }
    }
}

impl FromStr for IconStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glyph" => Ok(IconStyle::Glyph),
            "provider-code" | "provider_code" | "code" => Ok(IconStyle::ProviderCode),
            other => Err(ParseError::UnknownIconStyle(other.to_string())),
        }
    }
}

/// User-chosen date range attached to a lookup.
///
/// Both ends are kept as the raw date strings the user entered; they are
/// never parsed, and search matches them as plain text. A range always has
/// both ends, so "start without end" is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Create a range from two date strings.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Build an optional range from optional parts.
    ///
    /// Blank strings count as absent. Two absent parts yield `Ok(None)`;
    /// a single present part is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::HalfOpenRange`] when exactly one part is present.
    ///
    /// ```
    /// use skylog_types::DateRange;
    ///
    /// assert_eq!(DateRange::from_parts(None, Some("  ")), Ok(None));
    /// assert!(DateRange::from_parts(Some("2024-05-01"), None).is_err());
    /// let range = DateRange::from_parts(Some("2024-05-01"), Some("2024-05-06")).unwrap();
    /// assert_eq!(range.unwrap().end, "2024-05-06");
    /// ```
    pub fn from_parts(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, ParseError> {
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        match (present(start), present(end)) {
            (Some(start), Some(end)) => Ok(Some(Self::new(start, end))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ParseError::HalfOpenRange { present: "start" }),
            (None, Some(_)) => Err(ParseError::HalfOpenRange { present: "end" }),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One daily summary in a forecast.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastDay {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Short weekday label (`Mon`, `Tue`, ...).
    pub day: String,
    pub condition: Condition,
    /// High temperature in degrees Celsius.
    pub high: f64,
    /// Low temperature in degrees Celsius.
    pub low: f64,
    pub icon: String,
}

/// Current conditions at capture time.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentConditions {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    pub condition: Condition,
    /// Human-readable description from the provider.
    pub description: String,
    /// Relative humidity percentage (0-100).
    pub humidity: u8,
    pub wind_speed: f64,
    /// Atmospheric pressure in hPa.
    pub pressure: f64,
    pub icon: String,
}

/// A fetched, not-yet-saved weather lookup.
///
/// This is the value handed to the store when a record is created or
/// overwritten.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeatherSnapshot {
    /// Display location, e.g. `"Paris, FR"`.
    pub location: String,
    pub location_type: LocationType,
    pub current: CurrentConditions,
    /// Up to five daily summaries, in date order.
    pub forecast: Vec<ForecastDay>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub date_range: Option<DateRange>,
    /// When the lookup was fetched.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
}

/// Maximum number of forecast days kept in a snapshot.
pub const MAX_FORECAST_DAYS: usize = 5;

impl WeatherSnapshot {
    /// Check the invariants a snapshot must hold before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] for a blank location, a humidity
    /// above 100, or more than [`MAX_FORECAST_DAYS`] forecast entries, and
    /// [`ParseError::HalfOpenRange`] for a date range with a blank end.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.location.trim().is_empty() {
            return Err(ParseError::InvalidValue("location must not be empty".into()));
        }
        if self.current.humidity > 100 {
            return Err(ParseError::InvalidValue(format!(
                "humidity {} exceeds 100%",
                self.current.humidity
            )));
        }
        if self.forecast.len() > MAX_FORECAST_DAYS {
            return Err(ParseError::InvalidValue(format!(
                "forecast has {} days, at most {} allowed",
                self.forecast.len(),
                MAX_FORECAST_DAYS
            )));
        }
        if let Some(ref range) = self.date_range
            && DateRange::from_parts(Some(&range.start), Some(&range.end))?.is_none()
        {
            return Err(ParseError::InvalidValue("date range must not be blank".into()));
        }
        Ok(())
    }
}
