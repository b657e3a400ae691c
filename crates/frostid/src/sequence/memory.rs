#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Result, SequenceCounter};

/// An in-process sequence counter.
///
/// The first call for a bucket returns `0`, each further call for the same
/// bucket returns one more than the previous, with no upper bound.
///
/// The state lives in this value only, so two counters (or two processes)
/// never coordinate. Sharing one counter across threads requires an outer
/// lock such as [`SharedSnowflake`].
///
/// ## Recommended When
/// - A single producer owns its (cluster, worker) pair
/// - You want the fastest counter
///
/// # Example
///
/// ```
/// use frostid::{MemorySequence, SequenceCounter};
///
/// let mut counter = MemorySequence::new();
/// assert_eq!(counter.sequence(10).unwrap(), 0);
/// assert_eq!(counter.sequence(10).unwrap(), 1);
/// assert_eq!(counter.sequence(11).unwrap(), 0);
/// ```
///
/// [`SharedSnowflake`]: crate::SharedSnowflake
#[derive(Clone, Debug, Default)]
pub struct MemorySequence {
    last_time: Option<i64>,
    sequence: i64,
}

impl MemorySequence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceCounter for MemorySequence {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn sequence(&mut self, current_time: i64) -> Result<i64> {
        if self.last_time == Some(current_time) {
            self.sequence += 1;
        } else {
            self.last_time = Some(current_time);
            self.sequence = 0;
        }
        Ok(self.sequence)
    }
}
