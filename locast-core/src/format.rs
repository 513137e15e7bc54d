//! Pure helpers that turn raw forecast numbers into display values.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use chrono_tz::Tz;

/// Sixteen-point compass, clockwise from north.
pub const DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Round half away from zero at `precision` decimal digits.
///
/// `round(2.345, 2) == 2.35`, `round(-2.345, 2) == -2.35`.
pub fn round(value: f64, precision: i32) -> f64 {
    let pow = 10f64.powi(precision);
    let scaled = value * pow;
    let frac = scaled.fract().abs();

    let rounded = if frac >= 0.5 {
        if scaled >= 0.0 { scaled.ceil() } else { scaled.floor() }
    } else {
        scaled.trunc()
    };

    rounded / pow
}

/// Compass label for a wind direction in degrees.
///
/// Returns an empty string when the computed index falls outside the table,
/// which happens for sufficiently negative or non-finite input.
pub fn bearing_from_degrees(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return "";
    }

    let index = ((degrees + 11.25) / 22.5) as i64 % 16;

    usize::try_from(index)
        .ok()
        .and_then(|i| DIRECTIONS.get(i))
        .copied()
        .unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochFormat {
    /// `April 25 at 1:15pm EDT`
    Full,
    /// `April 25`
    Date,
    /// `1:15pm EDT`
    Time,
}

impl EpochFormat {
    fn pattern(&self) -> &'static str {
        match self {
            EpochFormat::Full => "%B %-d at %-I:%M%P %Z",
            EpochFormat::Date => "%B %-d",
            EpochFormat::Time => "%-I:%M%P %Z",
        }
    }
}

/// Format Unix epoch seconds in the given timezone.
///
/// Out-of-range timestamps render as an empty string.
pub fn format_epoch<T>(seconds: i64, format: EpochFormat, tz: &T) -> String
where
    T: TimeZone,
    T::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(seconds, 0) {
        Some(utc) => utc.with_timezone(tz).format(format.pattern()).to_string(),
        None => String::new(),
    }
}

/// Format Unix epoch seconds in the machine's local timezone.
pub fn format_epoch_local(seconds: i64, format: EpochFormat) -> String {
    format_epoch(seconds, format, &Local)
}

/// The timezone a forecast is reported in.
///
/// Named zones give proper abbreviations; the fixed offset is the fallback
/// when the name is missing or unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ForecastZone {
    pub fn new(name: &str, offset_seconds: i32) -> Self {
        if let Ok(tz) = name.parse::<Tz>() {
            return ForecastZone::Named(tz);
        }

        if !name.is_empty() {
            tracing::warn!(timezone = name, "unknown timezone name, using fixed offset");
        }

        FixedOffset::east_opt(offset_seconds)
            .or_else(|| FixedOffset::east_opt(0))
            .map(ForecastZone::Fixed)
            .unwrap_or(ForecastZone::Named(Tz::UTC))
    }

    pub fn format(&self, seconds: i64, format: EpochFormat) -> String {
        match self {
            ForecastZone::Named(tz) => format_epoch(seconds, format, tz),
            ForecastZone::Fixed(offset) => format_epoch(seconds, format, offset),
        }
    }
}
