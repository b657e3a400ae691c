//! A process-wide default generator.
//!
//! These free functions forward to one lazily created [`SharedSnowflake`]
//! with the default configuration (epoch `2021-02-02 00:00:00` UTC, cluster
//! `1`, worker `1`, in-memory counter). Reconfiguring it while other threads
//! generate is allowed; which identifiers see the new settings is
//! unspecified.
//!
//! ```
//! frostid::configure("2024-01-01", 4, 2).unwrap();
//!
//! let id = frostid::id(None).unwrap();
//! let parsed = frostid::parse(id.as_str()).unwrap();
//! assert_eq!((parsed.cluster, parsed.worker), (4, 2));
//! ```

use std::sync::LazyLock;

use crate::{
    BoxedIdentifierEncoder, BoxedSequenceCounter, BoxedTimestampSource, Config, IntoRawId,
    Parsed, Result, SharedSnowflake,
};

static GLOBAL: LazyLock<SharedSnowflake> = LazyLock::new(SharedSnowflake::default);

/// Returns a handle to the process-wide generator.
pub fn global() -> &'static SharedSnowflake {
    &GLOBAL
}

/// Sets the epoch, cluster, and worker of the process-wide generator. The
/// last call wins.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the epoch cannot be parsed or the ids
/// do not fit the layout.
///
/// [`Error::Configuration`]: crate::Error::Configuration
pub fn configure(epoch_start: &str, cluster: u32, worker: u32) -> Result<()> {
    GLOBAL.configure(epoch_start, cluster, worker)
}

/// Next identifier from the process-wide generator, as a decimal string.
///
/// # Errors
///
/// Propagates sequence-counter failures.
pub fn id(group: Option<&str>) -> Result<String> {
    GLOBAL.id(group)
}

/// Next identifier from the process-wide generator.
///
/// # Errors
///
/// Propagates sequence-counter failures.
pub fn generate(group: Option<&str>) -> Result<i64> {
    GLOBAL.generate(group)
}

/// Decodes an identifier against the process-wide configuration.
///
/// # Errors
///
/// Returns [`Error::InvalidId`](crate::Error::InvalidId) for malformed input.
pub fn parse(id: impl IntoRawId) -> Result<Parsed> {
    GLOBAL.parse(id)
}

/// Swaps the clock of the process-wide generator; `None` restores the
/// default.
///
/// # Errors
///
/// A poisoned lock.
pub fn set_timestamp_source(source: Option<BoxedTimestampSource>) -> Result<()> {
    GLOBAL.set_timestamp_source(source)
}

/// Swaps the sequence counter of the process-wide generator; `None` restores
/// a fresh in-memory counter.
///
/// # Errors
///
/// A poisoned lock.
pub fn set_sequence_counter(counter: Option<BoxedSequenceCounter>) -> Result<()> {
    GLOBAL.set_sequence_counter(counter)
}

/// Swaps the encoder of the process-wide generator; `None` restores the
/// default.
///
/// # Errors
///
/// A poisoned lock.
pub fn set_identifier_encoder(encoder: Option<BoxedIdentifierEncoder>) -> Result<()> {
    GLOBAL.set_identifier_encoder(encoder)
}

/// Restores the default configuration and roles of the process-wide
/// generator.
///
/// # Errors
///
/// A poisoned lock.
pub fn reset() -> Result<()> {
    let mut generator = GLOBAL.lock()?;
    generator.set_config(Config::default());
    generator.set_timestamp_source(None);
    generator.set_sequence_counter(None);
    generator.set_identifier_encoder(None);
    Ok(())
}
