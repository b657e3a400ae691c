use super::MonotonicClock;

/// A source of time-bucket values for identifiers.
///
/// The unit is whatever the identifiers should carry (microseconds by
/// default). The generator uses the returned value both as the sequence
/// counter's bucket key and, minus the configured epoch, as the elapsed-time
/// field of the identifier, so the epoch must be expressed in the same unit.
///
/// Closures returning an `i64` implement this trait, which makes it easy to
/// plug in a fixed or scripted clock:
///
/// ```
/// use frostid::TimestampSource;
///
/// let mut fixed = || 1_234_i64;
/// assert_eq!(fixed.timestamp(), 1_234);
/// ```
pub trait TimestampSource {
    /// Returns the current time bucket.
    fn timestamp(&mut self) -> i64;
}

impl<F> TimestampSource for F
where
    F: FnMut() -> i64,
{
    fn timestamp(&mut self) -> i64 {
        self()
    }
}

/// Microseconds since the Unix epoch, read from the process-wide
/// [`MonotonicClock`]. This is the default timestamp source.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicrosecondTimestamp;

impl TimestampSource for MicrosecondTimestamp {
    fn timestamp(&mut self) -> i64 {
        (MonotonicClock::now() / 1_000) as i64
    }
}

/// Milliseconds since the Unix epoch, read from the process-wide
/// [`MonotonicClock`].
///
/// Pair it with a configuration in [`TimeUnit::Milliseconds`] and, for a
/// file-backed counter, a garbage-collection window of `1_000`.
///
/// ```
/// use frostid::{Config, MillisecondTimestamp, Snowflake, TimeUnit};
///
/// let config = Config::default().with_unit(TimeUnit::Milliseconds);
/// let mut generator = Snowflake::new(config).with_timestamp_source(MillisecondTimestamp);
/// let id = generator.generate(None).unwrap();
/// assert!(generator.parse(id).unwrap().datetime.timestamp() > 1_612_224_000);
/// ```
///
/// [`TimeUnit::Milliseconds`]: crate::TimeUnit::Milliseconds
#[derive(Clone, Copy, Debug, Default)]
pub struct MillisecondTimestamp;

impl TimestampSource for MillisecondTimestamp {
    fn timestamp(&mut self) -> i64 {
        (MonotonicClock::now() / 1_000_000) as i64
    }
}
