//! OpenWeather forecast client.
//!
//! One request per lookup: the 5 day / 3 hour forecast endpoint. The first
//! entry is treated as the current reading and every eighth entry (one per
//! day) becomes a forecast day.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use serde::Deserialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::debug;

use skylog_types::{
    Condition, CurrentConditions, DateRange, ForecastDay, IconStyle, LocationType,
    MAX_FORECAST_DAYS, WeatherSnapshot, parse_coordinates,
};

const FORECAST_API: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Forecast entries are three hours apart, so eight of them make a day.
const ENTRIES_PER_DAY: usize = 8;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    /// `"200"` on success; errors may send a number instead.
    cod: serde_json::Value,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    list: Vec<ForecastEntry>,
    #[serde(default)]
    city: Option<City>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    main: MainReading,
    #[serde(default)]
    weather: Vec<WeatherTag>,
    #[serde(default)]
    wind: Option<Wind>,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherTag {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct City {
    name: String,
    #[serde(default)]
    country: String,
}

impl ForecastResponse {
    fn is_ok(&self) -> bool {
        match &self.cod {
            serde_json::Value::String(code) => code == "200",
            serde_json::Value::Number(code) => code.as_u64() == Some(200),
            _ => false,
        }
    }

    fn error_message(&self) -> String {
        match &self.message {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => format!("provider returned code {}", self.cod),
        }
    }
}

/// Client for the OpenWeather forecast API.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    icon_style: IconStyle,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration, icon_style: IconStyle) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            icon_style,
        })
    }

    /// Look up the weather for a city name or `lat,lon` pair.
    pub async fn fetch(&self, location: &str, date_range: Option<DateRange>) -> Result<WeatherSnapshot> {
        let location = location.trim();
        if location.is_empty() {
            bail!("Please enter a location.");
        }

        let url = forecast_url(location, &self.api_key);
        debug!("Requesting forecast for {}", location);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Weather request failed")?;
        let status = response.status();
        let body = response.text().await.context("Failed to read weather response")?;

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                anyhow!("Unexpected weather response: {}", e)
            } else {
                anyhow!("Weather API error: {} - {}", status, body)
            }
        })?;

        reduce(
            parsed,
            location,
            self.icon_style,
            date_range,
            OffsetDateTime::now_utc(),
        )
    }
}

/// Build the request URL for raw location input.
pub fn forecast_url(location: &str, api_key: &str) -> String {
    let place = match parse_coordinates(location).and(location.split_once(',')) {
        Some((lat, lon)) => format!("lat={}&lon={}", lat, lon),
        None => format!("q={}", urlencoding::encode(location)),
    };
    format!(
        "{}?{}&appid={}&units=metric",
        FORECAST_API,
        place,
        urlencoding::encode(api_key)
    )
}

/// Reduce a provider response to a snapshot.
fn reduce(
    response: ForecastResponse,
    input: &str,
    icon_style: IconStyle,
    date_range: Option<DateRange>,
    fetched_at: OffsetDateTime,
) -> Result<WeatherSnapshot> {
    if !response.is_ok() {
        bail!("{}", response.error_message());
    }

    let first = response
        .list
        .first()
        .ok_or_else(|| anyhow!("Weather response contained no readings"))?;
    let tag = first.weather.first();
    let condition = Condition::parse(tag.map_or("", |t| t.main.as_str()));

    let current = CurrentConditions {
        temperature: round_half_up(first.main.temp),
        icon: icon_style.icon_for(&condition, tag.map_or("", |t| t.icon.as_str())),
        condition,
        description: tag.map(|t| t.description.clone()).unwrap_or_default(),
        humidity: first.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_speed: first.wind.as_ref().map_or(0.0, |w| w.speed),
        pressure: first.main.pressure,
    };

    let forecast = response
        .list
        .iter()
        .step_by(ENTRIES_PER_DAY)
        .take(MAX_FORECAST_DAYS)
        .map(|entry| forecast_day(entry, icon_style))
        .collect::<Result<Vec<_>>>()?;

    let location = match response.city {
        Some(city) if city.country.is_empty() => city.name,
        Some(city) => format!("{}, {}", city.name, city.country),
        None => input.to_string(),
    };

    Ok(WeatherSnapshot {
        location,
        location_type: LocationType::detect(input),
        current,
        forecast,
        date_range,
        timestamp: fetched_at,
    })
}

fn forecast_day(entry: &ForecastEntry, icon_style: IconStyle) -> Result<ForecastDay> {
    let date_text = entry.dt_txt.split(' ').next().unwrap_or_default();
    let date = Date::parse(date_text, format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("Invalid forecast date '{}'", entry.dt_txt))?;
    let tag = entry.weather.first();
    let condition = Condition::parse(tag.map_or("", |t| t.main.as_str()));

    Ok(ForecastDay {
        date: date_text.to_string(),
        day: weekday_label(date),
        icon: icon_style.icon_for(&condition, tag.map_or("", |t| t.icon.as_str())),
        condition,
        high: round_half_up(entry.main.temp_max),
        low: round_half_up(entry.main.temp_min),
    })
}

/// Short weekday label such as `Mon`.
fn weekday_label(date: Date) -> String {
    date.weekday().to_string().chars().take(3).collect()
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn entry(dt_txt: &str, main: &str, temp: f64, icon: &str) -> serde_json::Value {
        serde_json::json!({
            "dt_txt": dt_txt,
            "main": {
                "temp": temp,
                "temp_min": temp - 3.2,
                "temp_max": temp + 2.5,
                "humidity": 71,
                "pressure": 1011
            },
            "weather": [{ "main": main, "description": format!("some {}", main.to_lowercase()), "icon": icon }],
            "wind": { "speed": 4.6 }
        })
    }

    fn response(entries: usize) -> ForecastResponse {
        let list: Vec<_> = (0..entries)
            .map(|i| {
                let day = 1 + i / 8;
                let hour = (i % 8) * 3;
                let main = if i % 8 == 0 { "Rain" } else { "Clear" };
                entry(
                    &format!("2024-05-{:02} {:02}:00:00", day, hour),
                    main,
                    14.5 + i as f64,
                    "10d",
                )
            })
            .collect();
        serde_json::from_value(serde_json::json!({
            "cod": "200",
            "list": list,
            "city": { "name": "Paris", "country": "FR" }
        }))
        .unwrap()
    }

    fn fetched_at() -> OffsetDateTime {
        datetime!(2024-05-01 07:00:00 UTC)
    }

    #[test]
    fn test_reduce_current_reading() {
        let snapshot = reduce(response(40), "Paris", IconStyle::Glyph, None, fetched_at()).unwrap();

        assert_eq!(snapshot.location, "Paris, FR");
        assert_eq!(snapshot.location_type, LocationType::City);
        assert_eq!(snapshot.current.temperature, 15.0);
        assert_eq!(snapshot.current.condition, Condition::Rain);
        assert_eq!(snapshot.current.description, "some rain");
        assert_eq!(snapshot.current.humidity, 71);
        assert_eq!(snapshot.current.wind_speed, 4.6);
        assert_eq!(snapshot.current.pressure, 1011.0);
        assert_eq!(snapshot.current.icon, Condition::Rain.glyph());
        assert_eq!(snapshot.timestamp, fetched_at());
    }

    #[test]
    fn test_reduce_takes_every_eighth_entry() {
        let snapshot = reduce(response(40), "Paris", IconStyle::Glyph, None, fetched_at()).unwrap();

        let dates: Vec<_> = snapshot.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05"]
        );
        let days: Vec<_> = snapshot.forecast.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, ["Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert!(snapshot.forecast.iter().all(|d| d.condition == Condition::Rain));
        assert_eq!(snapshot.forecast[1].high, 25.0);
        assert_eq!(snapshot.forecast[1].low, 19.0);
    }

    #[test]
    fn test_reduce_caps_forecast_and_handles_short_lists() {
        let long = reduce(response(48), "Paris", IconStyle::Glyph, None, fetched_at()).unwrap();
        assert_eq!(long.forecast.len(), MAX_FORECAST_DAYS);

        let short = reduce(response(9), "Paris", IconStyle::Glyph, None, fetched_at()).unwrap();
        assert_eq!(short.forecast.len(), 2);
    }

    #[test]
    fn test_reduce_provider_icons() {
        let snapshot = reduce(
            response(8),
            "48.85,2.35",
            IconStyle::ProviderCode,
            Some(DateRange::new("2024-05-01", "2024-05-06")),
            fetched_at(),
        )
        .unwrap();

        assert_eq!(snapshot.location_type, LocationType::Coordinates);
        assert_eq!(snapshot.current.icon, "10d");
        assert_eq!(snapshot.forecast[0].icon, "10d");
        assert_eq!(snapshot.date_range, Some(DateRange::new("2024-05-01", "2024-05-06")));
    }

    #[test]
    fn test_reduce_provider_error() {
        let response: ForecastResponse =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        let err = reduce(response, "Atlantis", IconStyle::Glyph, None, fetched_at()).unwrap_err();
        assert_eq!(err.to_string(), "city not found");

        let response: ForecastResponse =
            serde_json::from_str(r#"{"cod":401,"message":"Invalid API key"}"#).unwrap();
        let err = reduce(response, "Paris", IconStyle::Glyph, None, fetched_at()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn test_reduce_empty_list_is_error() {
        let response: ForecastResponse =
            serde_json::from_str(r#"{"cod":"200","list":[]}"#).unwrap();
        assert!(reduce(response, "Paris", IconStyle::Glyph, None, fetched_at()).is_err());
    }

    #[test]
    fn test_forecast_url() {
        let url = forecast_url("São Paulo, BR", "k3y");
        assert!(url.starts_with(FORECAST_API));
        assert!(url.contains("q=S%C3%A3o%20Paulo%2C%20BR"));
        assert!(url.ends_with("&appid=k3y&units=metric"));

        let url = forecast_url("-33.86,151.2", "k3y");
        assert!(url.contains("?lat=-33.86&lon=151.2&"));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(14.5), 15.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }
}
