//! Error types for value parsing in skylog-types.

use thiserror::Error;

/// Errors that can occur when building or parsing skylog values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Only one side of a date range was supplied.
    #[error("Date range needs both a start and an end (got only the {present} date)")]
    HalfOpenRange {
        /// Which side was present: `"start"` or `"end"`.
        present: &'static str,
    },

    /// Unknown location type label.
    #[error("Unknown location type: {0}")]
    UnknownLocationType(String),

    /// Unknown icon style label.
    #[error("Unknown icon style: {0}")]
    UnknownIconStyle(String),

    /// A field held a value outside its valid domain.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using skylog-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
