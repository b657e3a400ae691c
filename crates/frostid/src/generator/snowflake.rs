use core::{fmt, time::Duration};

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

use crate::{
    Components, Config, Error, IdentifierEncoder, IntoRawId, MemorySequence, MicrosecondTimestamp,
    Parsed, Poll, Result, SequenceCounter, SnowflakeEncoder, TimestampSource,
};

/// Pause between attempts when a time bucket has run out of sequence
/// numbers.
pub const RETRY_BACKOFF: Duration = Duration::from_micros(1);

/// Boxed timestamp source, swappable at runtime.
pub type BoxedTimestampSource = Box<dyn TimestampSource + Send>;

/// Boxed sequence counter, swappable at runtime.
pub type BoxedSequenceCounter = Box<dyn SequenceCounter + Send>;

/// Boxed identifier encoder, swappable at runtime.
pub type BoxedIdentifierEncoder = Box<dyn IdentifierEncoder + Send>;

/// A Snowflake identifier generator.
///
/// Ties a [`Config`] to three swappable roles:
///
/// - a [`TimestampSource`] (default [`MicrosecondTimestamp`]),
/// - a [`SequenceCounter`] (default [`MemorySequence`]),
/// - an [`IdentifierEncoder`] (default [`SnowflakeEncoder`]).
///
/// Each attempt reads the clock, asks the counter for a sequence number in
/// that bucket and, if the number exceeds the layout's maximum, retries with a
/// fresh timestamp. Otherwise the epoch is subtracted and the parts encoded.
/// Exhaustion is never an error; sustained saturation only adds latency.
///
/// Methods take `&mut self`; wrap the generator in a [`SharedSnowflake`] to
/// issue identifiers from several threads.
///
/// ## Features
/// - ❌ Not thread-safe on its own
/// - ✅ Pluggable clock, counter, and encoder
///
/// # Example
///
/// ```
/// use frostid::Snowflake;
///
/// let mut generator = Snowflake::default();
/// generator.configure("2024-01-01 00:00:00", 2, 3).unwrap();
///
/// let id = generator.id(None).unwrap();
/// let parsed = generator.parse(id.as_str()).unwrap();
/// assert_eq!(parsed.cluster, 2);
/// assert_eq!(parsed.worker, 3);
/// ```
///
/// [`SharedSnowflake`]: crate::SharedSnowflake
pub struct Snowflake {
    config: Config,
    timestamp: BoxedTimestampSource,
    sequence: BoxedSequenceCounter,
    identifier: BoxedIdentifierEncoder,
}

impl Default for Snowflake {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Snowflake {
    /// Creates a generator with the default roles.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            timestamp: default_timestamp_source(),
            sequence: default_sequence_counter(),
            identifier: default_identifier_encoder(),
        }
    }

    /// Replaces the epoch, cluster, and worker, keeping the bit layout and
    /// time unit.
    ///
    /// Takes effect for the next identifier. Previously issued identifiers
    /// keep their bits; only their reconstructed `datetime` moves with the
    /// epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the epoch cannot be parsed or the
    /// ids do not fit the layout. The current configuration is left as is.
    ///
    /// [`Error::Configuration`]: crate::Error::Configuration
    pub fn configure(&mut self, epoch_start: &str, cluster: u32, worker: u32) -> Result<()> {
        let config = Config::new(epoch_start, cluster, worker)?
            .with_unit(self.config.unit())
            .with_layout(*self.config.layout())?;
        #[cfg(feature = "tracing")]
        debug!(
            epoch = config.epoch(),
            cluster, worker, "configured snowflake generator"
        );
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Installs a timestamp source; `None` restores [`MicrosecondTimestamp`].
    pub fn set_timestamp_source(&mut self, source: Option<BoxedTimestampSource>) {
        self.timestamp = source.unwrap_or_else(default_timestamp_source);
    }

    /// Installs a sequence counter; `None` restores a fresh
    /// [`MemorySequence`].
    pub fn set_sequence_counter(&mut self, counter: Option<BoxedSequenceCounter>) {
        self.sequence = counter.unwrap_or_else(default_sequence_counter);
    }

    /// Installs an identifier encoder; `None` restores [`SnowflakeEncoder`].
    pub fn set_identifier_encoder(&mut self, encoder: Option<BoxedIdentifierEncoder>) {
        self.identifier = encoder.unwrap_or_else(default_identifier_encoder);
    }

    /// Builder form of [`Self::set_timestamp_source`].
    pub fn with_timestamp_source(mut self, source: impl TimestampSource + Send + 'static) -> Self {
        self.timestamp = Box::new(source);
        self
    }

    /// Builder form of [`Self::set_sequence_counter`].
    pub fn with_sequence_counter(mut self, counter: impl SequenceCounter + Send + 'static) -> Self {
        self.sequence = Box::new(counter);
        self
    }

    /// Builder form of [`Self::set_identifier_encoder`].
    pub fn with_identifier_encoder(
        mut self,
        encoder: impl IdentifierEncoder + Send + 'static,
    ) -> Self {
        self.identifier = Box::new(encoder);
        self
    }

    /// Returns the next identifier as a decimal string.
    ///
    /// Strings survive consumers that store numbers as 64-bit floats.
    /// `group` is forwarded to the encoder; the default one ignores it.
    ///
    /// # Errors
    ///
    /// Propagates sequence-counter failures such as
    /// [`Error::LockTimeout`](crate::Error::LockTimeout).
    pub fn id(&mut self, group: Option<&str>) -> Result<String> {
        self.generate(group).map(|id| id.to_string())
    }

    /// Returns the next identifier, sleeping [`RETRY_BACKOFF`] whenever the
    /// current bucket is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates sequence-counter failures.
    pub fn generate(&mut self, group: Option<&str>) -> Result<i64> {
        self.try_next_id(group, |_| std::thread::sleep(RETRY_BACKOFF))
    }

    /// Returns the next identifier, calling `backoff` with the exhausted
    /// bucket between attempts.
    ///
    /// The loop is unbounded: it ends once a bucket with spare sequence
    /// capacity is found or the counter fails.
    ///
    /// # Errors
    ///
    /// Propagates sequence-counter failures.
    pub fn try_next_id(&mut self, group: Option<&str>, mut backoff: impl FnMut(i64)) -> Result<i64> {
        loop {
            match self.try_poll_id(group)? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { bucket } => backoff(bucket),
            }
        }
    }

    /// Makes a single generation attempt.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new identifier
    /// - `Ok(Poll::Pending { bucket })`: `bucket` is out of sequence numbers
    /// - `Err(e)`: the sequence counter failed
    ///
    /// # Errors
    ///
    /// Propagates sequence-counter failures, and returns
    /// [`Error::InvalidSequence`] if the counter hands out a negative value.
    ///
    /// [`Error::InvalidSequence`]: crate::Error::InvalidSequence
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&mut self, group: Option<&str>) -> Result<Poll> {
        let now = self.timestamp.timestamp();
        let sequence = self.sequence.sequence(now)?;
        if sequence < 0 {
            return Err(Error::InvalidSequence(sequence));
        }

        let layout = self.config.layout();
        if sequence > layout.max_sequence() {
            return Ok(Poll::Pending { bucket: now });
        }

        let parts = Components {
            timestamp: now.wrapping_sub(self.config.epoch()),
            cluster: self.config.cluster(),
            worker: self.config.worker(),
            sequence,
        };
        Ok(Poll::Ready {
            id: self.identifier.identifier(layout, parts, group),
        })
    }

    /// Decodes an identifier against this generator's epoch and layout.
    ///
    /// Accepts an `i64` or its decimal string form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if a string is not a decimal `i64` or the
    /// decoded time cannot be represented as a calendar date.
    ///
    /// [`Error::InvalidId`]: crate::Error::InvalidId
    pub fn parse(&self, id: impl IntoRawId) -> Result<Parsed> {
        parse_with(&self.config, id.into_raw_id()?)
    }
}

fn parse_with(config: &Config, id: i64) -> Result<Parsed> {
    let parts = config.layout().unpack(id);
    let epoch = config.epoch();
    let datetime = config
        .unit()
        .to_datetime(parts.timestamp.wrapping_add(epoch))
        .ok_or_else(|| Error::InvalidId(id.to_string()))?;
    Ok(Parsed {
        timestamp: parts.timestamp,
        sequence: parts.sequence,
        worker: parts.worker,
        cluster: parts.cluster,
        epoch,
        datetime,
    })
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn default_timestamp_source() -> BoxedTimestampSource {
    Box::new(MicrosecondTimestamp)
}

fn default_sequence_counter() -> BoxedSequenceCounter {
    Box::new(MemorySequence::new())
}

fn default_identifier_encoder() -> BoxedIdentifierEncoder {
    Box::new(SnowflakeEncoder)
}
