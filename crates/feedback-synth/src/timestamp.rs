//! Recency-biased timestamp sampling over a fixed window.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rand::Rng;

use crate::error::ConfigError;

/// A half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Builds a window from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyWindow`] unless `start` precedes `end` by
    /// at least one microsecond.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigError> {
        let window = Self { start, end };
        if window.span_micros() <= 0 {
            return Err(ConfigError::EmptyWindow {
                start: format_timestamp(start),
                end: format_timestamp(end),
            });
        }
        Ok(window)
    }

    /// Builds the window covering the `days` days before `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyWindow`] when `days` is zero and
    /// [`ConfigError::WindowOutOfRange`] when the start is not representable.
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Result<Self, ConfigError> {
        let start = TimeDelta::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(ConfigError::WindowOutOfRange { days })?;
        Self::new(start, end)
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` when `instant` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Draws a timestamp skewed toward the end of the window.
    ///
    /// A uniform draw `r` is turned into an age `(1 - r)²` measured back from
    /// `end`. Squaring concentrates ages near zero, so most samples land close
    /// to `end`; the median age is a quarter of the window.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DateTime<Utc> {
        let draw: f64 = rng.random();
        self.at_fraction(recency_fraction(draw))
    }

    /// Places a point at `fraction` of the way from `start` to `end`.
    fn at_fraction(&self, fraction: f64) -> DateTime<Utc> {
        let span = self.span_micros();
        let offset = micros_at(span, fraction).clamp(0, span - 1);
        self.start + TimeDelta::microseconds(offset)
    }

    fn span_micros(&self) -> i64 {
        (self.end - self.start).num_microseconds().unwrap_or(i64::MAX)
    }
}

/// Maps a uniform draw in `[0, 1)` to a window fraction in `[0, 1)`.
#[expect(clippy::float_arithmetic, reason = "the recency bias is a float transform")]
fn recency_fraction(draw: f64) -> f64 {
    let age = (1.0 - draw).powi(2);
    1.0 - age
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "window spans stay far below 2^53 microseconds and the result is clamped"
)]
fn micros_at(span: i64, fraction: f64) -> i64 {
    (span as f64 * fraction) as i64
}

/// Renders a timestamp as RFC 3339 with microseconds and a literal `Z`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use feedback_synth::format_timestamp;
///
/// let instant = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).single().expect("valid");
/// assert_eq!(format_timestamp(instant), "2026-03-01T09:30:00.000000Z");
/// ```
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serde adapter rendering `DateTime<Utc>` with [`format_timestamp`].
pub(crate) mod iso_utc {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*instant))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
