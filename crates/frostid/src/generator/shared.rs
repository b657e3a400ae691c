use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BoxedIdentifierEncoder, BoxedSequenceCounter, BoxedTimestampSource, Config, IntoRawId,
    Parsed, Poll, RETRY_BACKOFF, Result, Snowflake,
    generator::{Mutex, MutexGuard},
};

/// A lock-based wrapper that lets several threads share one [`Snowflake`].
///
/// The whole read-clock, count, and encode step runs under one mutex, so even
/// the unsynchronised [`MemorySequence`] never hands out a duplicate. While a
/// bucket is exhausted the lock is released before backing off, letting other
/// threads make progress.
///
/// Cloning is cheap and yields a handle to the same generator.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Works with every sequence counter
///
/// # Example
///
/// ```
/// use frostid::SharedSnowflake;
///
/// let generator = SharedSnowflake::default();
/// let ids: Vec<i64> = std::thread::scope(|s| {
///     let handles: Vec<_> = (0..4)
///         .map(|_| {
///             let generator = generator.clone();
///             s.spawn(move || generator.generate(None).unwrap())
///         })
///         .collect();
///     handles.into_iter().map(|h| h.join().unwrap()).collect()
/// });
/// assert_eq!(ids.len(), 4);
/// ```
///
/// [`MemorySequence`]: crate::MemorySequence
#[derive(Clone, Debug)]
pub struct SharedSnowflake {
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<Snowflake>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<Snowflake>>,
}

impl Default for SharedSnowflake {
    fn default() -> Self {
        Self::new(Snowflake::default())
    }
}

impl From<Snowflake> for SharedSnowflake {
    fn from(generator: Snowflake) -> Self {
        Self::new(generator)
    }
}

impl SharedSnowflake {
    pub fn new(generator: Snowflake) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(generator))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(generator)),
        }
    }

    /// Locks the generator for direct access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if another thread panicked while
    /// holding the lock (never with the `parking-lot` feature).
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    pub fn lock(&self) -> Result<MutexGuard<'_, Snowflake>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// See [`Snowflake::configure`].
    ///
    /// # Errors
    ///
    /// Configuration errors, or a poisoned lock.
    pub fn configure(&self, epoch_start: &str, cluster: u32, worker: u32) -> Result<()> {
        self.lock()?.configure(epoch_start, cluster, worker)
    }

    /// Returns a copy of the active configuration.
    ///
    /// # Errors
    ///
    /// A poisoned lock.
    pub fn config(&self) -> Result<Config> {
        Ok(*self.lock()?.config())
    }

    /// See [`Snowflake::set_config`].
    ///
    /// # Errors
    ///
    /// A poisoned lock.
    pub fn set_config(&self, config: Config) -> Result<()> {
        self.lock()?.set_config(config);
        Ok(())
    }

    /// See [`Snowflake::set_timestamp_source`].
    ///
    /// # Errors
    ///
    /// A poisoned lock.
    pub fn set_timestamp_source(&self, source: Option<BoxedTimestampSource>) -> Result<()> {
        self.lock()?.set_timestamp_source(source);
        Ok(())
    }

    /// See [`Snowflake::set_sequence_counter`].
    ///
    /// # Errors
    ///
    /// A poisoned lock.
    pub fn set_sequence_counter(&self, counter: Option<BoxedSequenceCounter>) -> Result<()> {
        self.lock()?.set_sequence_counter(counter);
        Ok(())
    }

    /// See [`Snowflake::set_identifier_encoder`].
    ///
    /// # Errors
    ///
    /// A poisoned lock.
    pub fn set_identifier_encoder(&self, encoder: Option<BoxedIdentifierEncoder>) -> Result<()> {
        self.lock()?.set_identifier_encoder(encoder);
        Ok(())
    }

    /// See [`Snowflake::id`].
    ///
    /// # Errors
    ///
    /// Sequence-counter failures, or a poisoned lock.
    pub fn id(&self, group: Option<&str>) -> Result<String> {
        self.generate(group).map(|id| id.to_string())
    }

    /// See [`Snowflake::generate`]. The lock is not held while backing off.
    ///
    /// # Errors
    ///
    /// Sequence-counter failures, or a poisoned lock.
    pub fn generate(&self, group: Option<&str>) -> Result<i64> {
        self.try_next_id(group, |_| std::thread::sleep(RETRY_BACKOFF))
    }

    /// See [`Snowflake::try_next_id`]. The lock is not held while `backoff`
    /// runs.
    ///
    /// # Errors
    ///
    /// Sequence-counter failures, or a poisoned lock.
    pub fn try_next_id(&self, group: Option<&str>, mut backoff: impl FnMut(i64)) -> Result<i64> {
        loop {
            match self.try_poll_id(group)? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { bucket } => backoff(bucket),
            }
        }
    }

    /// See [`Snowflake::try_poll_id`].
    ///
    /// # Errors
    ///
    /// Sequence-counter failures, or a poisoned lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self, group: Option<&str>) -> Result<Poll> {
        self.lock()?.try_poll_id(group)
    }

    /// See [`Snowflake::parse`].
    ///
    /// # Errors
    ///
    /// An invalid identifier, or a poisoned lock.
    pub fn parse(&self, id: impl IntoRawId) -> Result<Parsed> {
        self.lock()?.parse(id)
    }
}
