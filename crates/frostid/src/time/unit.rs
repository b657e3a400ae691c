use chrono::{DateTime, Utc};

/// The unit of a generator's time buckets, epoch, and timestamp field.
///
/// Must match the [`TimestampSource`] in use: [`MicrosecondTimestamp`] pairs
/// with `Microseconds`, [`MillisecondTimestamp`] with `Milliseconds`.
///
/// [`TimestampSource`]: crate::TimestampSource
/// [`MicrosecondTimestamp`]: crate::MicrosecondTimestamp
/// [`MillisecondTimestamp`]: crate::MillisecondTimestamp
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    #[default]
    Microseconds,
    Milliseconds,
}

impl TimeUnit {
    pub const fn ticks_per_second(self) -> i64 {
        match self {
            Self::Microseconds => 1_000_000,
            Self::Milliseconds => 1_000,
        }
    }

    /// Microseconds in one tick.
    pub const fn micros_per_tick(self) -> i64 {
        1_000_000 / self.ticks_per_second()
    }

    /// Converts microseconds into this unit, rounding toward negative
    /// infinity.
    pub const fn from_micros(self, micros: i64) -> i64 {
        micros.div_euclid(self.micros_per_tick())
    }

    /// Converts a count of this unit into microseconds, saturating at the
    /// `i64` bounds.
    pub const fn to_micros(self, ticks: i64) -> i64 {
        ticks.saturating_mul(self.micros_per_tick())
    }

    /// Converts ticks since the Unix epoch into a UTC datetime truncated to
    /// whole seconds. Returns `None` outside the range `chrono` can
    /// represent.
    ///
    /// ```
    /// use frostid::TimeUnit;
    ///
    /// let micros = TimeUnit::Microseconds.to_datetime(1_738_450_629_999_999).unwrap();
    /// let millis = TimeUnit::Milliseconds.to_datetime(1_738_450_629_999).unwrap();
    /// assert_eq!(micros, millis);
    /// assert_eq!(micros.timestamp(), 1_738_450_629);
    /// ```
    pub fn to_datetime(self, ticks: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(ticks.div_euclid(self.ticks_per_second()), 0)
    }
}
