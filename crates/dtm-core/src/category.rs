//! Span category enum as the single source of truth for category tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag attached to every recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpanCategory {
    Date,
    Time,
    DatePeriod,
    Duration,
    DateTime,
    TimePeriod,
    DateTimePeriod,
    /// Recurring expressions ("every monday").
    Set,
    Holiday,
    TimeZone,
    DateTimeAlt,
}

/// Detector categories in merge priority order.
///
/// Later categories may subsume spans of earlier ones, so this order is
/// load-bearing for arbitration.
pub const DETECTION_ORDER: [SpanCategory; 9] = [
    SpanCategory::Date,
    SpanCategory::Time,
    SpanCategory::DatePeriod,
    SpanCategory::Duration,
    SpanCategory::DateTime,
    SpanCategory::TimePeriod,
    SpanCategory::DateTimePeriod,
    SpanCategory::Set,
    SpanCategory::Holiday,
];

impl SpanCategory {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DatePeriod => "daterange",
            Self::Duration => "duration",
            Self::DateTime => "datetime",
            Self::TimePeriod => "timerange",
            Self::DateTimePeriod => "datetimerange",
            Self::Set => "set",
            Self::Holiday => "holiday",
            Self::TimeZone => "timezone",
            Self::DateTimeAlt => "datetimealt",
        }
    }

    /// Whether trailing bare numbers after a span of this category may be
    /// absorbed as new time entities.
    #[must_use]
    pub const fn is_time_like(&self) -> bool {
        matches!(self, Self::Time | Self::DateTime)
    }
}

impl fmt::Display for SpanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpanCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "daterange" | "dateperiod" => Ok(Self::DatePeriod),
            "duration" => Ok(Self::Duration),
            "datetime" => Ok(Self::DateTime),
            "timerange" | "timeperiod" => Ok(Self::TimePeriod),
            "datetimerange" | "datetimeperiod" => Ok(Self::DateTimePeriod),
            "set" => Ok(Self::Set),
            "holiday" => Ok(Self::Holiday),
            "timezone" => Ok(Self::TimeZone),
            "datetimealt" => Ok(Self::DateTimeAlt),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

impl Serialize for SpanCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SpanCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown span category: {0}")]
pub struct UnknownCategory(String);
