use core::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{Error, Result};

/// Default epoch: Tuesday, February 2, 2021 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_secs(1_612_224_000);

/// [`DEFAULT_EPOCH`] in the textual form accepted by [`parse_epoch`].
pub const DEFAULT_EPOCH_START: &str = "2021-02-02 00:00:00";

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parses a wall-clock timestamp into microseconds since the Unix epoch.
///
/// Accepted forms are `YYYY-MM-DD HH:MM:SS` (optionally with fractional
/// seconds or a `T` separator), `YYYY-MM-DD HH:MM`, `YYYY-MM-DD`, and RFC 3339
/// with an explicit offset. Values without an offset are read as UTC.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when none of the forms match.
///
/// # Example
///
/// ```
/// use frostid::parse_epoch;
///
/// assert_eq!(parse_epoch("2021-02-02 00:00:00").unwrap(), 1_612_224_000_000_000);
/// assert_eq!(parse_epoch("2021-02-02").unwrap(), 1_612_224_000_000_000);
/// assert!(parse_epoch("yesterday-ish").is_err());
/// ```
pub fn parse_epoch(input: &str) -> Result<i64> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp_micros());
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| Error::Configuration(format!("unparsable epoch {input:?}")))?;

    Ok(naive.and_utc().timestamp_micros())
}
