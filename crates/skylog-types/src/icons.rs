//! Glyph table for weather conditions.
//!
//! Keys are lowercase condition tokens as produced by
//! [`Condition::as_str`](crate::Condition::as_str).

// --- Condition glyphs ---

/// Glyph for clear skies.
pub const CLEAR: &str = "🌞";

/// Glyph for cloud cover.
pub const CLOUDS: &str = "☁️";

/// Glyph for rain.
pub const RAIN: &str = "🌧️";

/// Glyph for snow.
pub const SNOW: &str = "❄️";

/// Glyph for thunderstorms.
pub const THUNDERSTORM: &str = "⛈️";

/// Glyph for drizzle.
pub const DRIZZLE: &str = "🌦️";

/// Glyph for mist and fog.
pub const MIST: &str = "🌫️";

/// Glyph used when a condition has no dedicated entry.
pub const DEFAULT: &str = "🌤️";

/// Look up the glyph for a lowercase condition token.
#[must_use]
pub fn glyph_for(token: &str) -> &'static str {
    match token {
        "clear" => CLEAR,
        "clouds" => CLOUDS,
        "rain" => RAIN,
        "snow" => SNOW,
        "thunderstorm" => THUNDERSTORM,
        "drizzle" => DRIZZLE,
        "mist" | "fog" => MIST,
        _ => DEFAULT,
    }
}
