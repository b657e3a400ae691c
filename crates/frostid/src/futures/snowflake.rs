use super::SleepProvider;
use crate::{Poll, RETRY_BACKOFF, Result, SharedSnowflake, Snowflake};

impl Snowflake {
    /// Async counterpart of [`Snowflake::generate`].
    ///
    /// Exhausted buckets are waited out with `S::sleep_for(RETRY_BACKOFF)`,
    /// so the task yields instead of blocking its worker thread. The sequence
    /// counter itself still runs synchronously; with [`FileSequence`] that
    /// includes waiting for the store lock.
    ///
    /// # Errors
    ///
    /// Propagates sequence-counter failures.
    ///
    /// [`FileSequence`]: crate::FileSequence
    pub async fn next_id_async<S>(&mut self, group: Option<&str>) -> Result<i64>
    where
        S: SleepProvider,
    {
        loop {
            match self.try_poll_id(group)? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { .. } => S::sleep_for(RETRY_BACKOFF).await,
            }
        }
    }
}

impl SharedSnowflake {
    /// Async counterpart of [`SharedSnowflake::generate`].
    ///
    /// The lock is only held for a single attempt and never across an
    /// `.await`, so the returned future is `Send`.
    ///
    /// # Errors
    ///
    /// Sequence-counter failures, or a poisoned lock.
    pub async fn next_id_async<S>(&self, group: Option<&str>) -> Result<i64>
    where
        S: SleepProvider,
    {
        loop {
            let poll = self.try_poll_id(group)?;
            match poll {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { .. } => S::sleep_for(RETRY_BACKOFF).await,
            }
        }
    }
}
