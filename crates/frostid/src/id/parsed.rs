use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// A decoded identifier.
///
/// Produced by [`Snowflake::parse`](crate::Snowflake::parse).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parsed {
    /// Elapsed time units since `epoch`, as stored in the identifier.
    pub timestamp: i64,
    pub sequence: i64,
    pub worker: u32,
    pub cluster: u32,
    /// The epoch the identifier was decoded against, in the same unit as
    /// `timestamp`.
    pub epoch: i64,
    /// `epoch + timestamp` as wall-clock time, truncated to whole seconds.
    pub datetime: DateTime<Utc>,
}

impl Parsed {
    /// `datetime` in `YYYY-MM-DD HH:MM:SS` form.
    pub fn datetime_string(&self) -> String {
        self.datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Values accepted by `parse`: raw integers or their decimal rendering.
pub trait IntoRawId {
    /// Converts into the raw signed identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] when a string is not a decimal `i64`.
    fn into_raw_id(self) -> Result<i64>;
}

impl IntoRawId for i64 {
    fn into_raw_id(self) -> Result<i64> {
        Ok(self)
    }
}

impl IntoRawId for &str {
    fn into_raw_id(self) -> Result<i64> {
        self.trim()
            .parse()
            .map_err(|_| Error::InvalidId(self.to_owned()))
    }
}

impl IntoRawId for String {
    fn into_raw_id(self) -> Result<i64> {
        self.as_str().into_raw_id()
    }
}

impl IntoRawId for &String {
    fn into_raw_id(self) -> Result<i64> {
        self.as_str().into_raw_id()
    }
}
