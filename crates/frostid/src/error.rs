use std::{io, path::PathBuf, time::Duration};

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `frostid` can produce.
///
/// Sequence exhaustion is never reported here: the generator absorbs it by
/// retrying against a fresh time bucket. Corrupt sequence-store content is
/// also absorbed (the store is treated as empty).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The file-backed sequence counter could not acquire its exclusive lock
    /// before the retry window elapsed.
    ///
    /// The store was not touched. Callers usually retry the whole operation.
    #[error("timed out after {waited:?} waiting for the lock on {}", path.display())]
    LockTimeout {
        /// Backing file of the counter.
        path: PathBuf,
        /// How long the counter polled for the lock.
        waited: Duration,
    },

    /// The backing file of a sequence counter could not be opened, created,
    /// read, or written.
    #[error("cannot access sequence store {}: {source}", path.display())]
    StoreAccess {
        /// Backing file of the counter.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration: an unparsable epoch, an out-of-range cluster or
    /// worker id, or a bit layout that does not fit in 63 bits.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A sequence counter returned a negative number. Built-in counters never
    /// do.
    #[error("sequence counter returned negative value {0}")]
    InvalidSequence(i64),

    /// The value handed to `parse` is not a decimal 64-bit integer.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// A mutex guarding a shared generator was poisoned.
    ///
    /// This happens when another thread panicked while holding the lock. When
    /// the `parking-lot` feature is enabled, mutexes do **not** poison, so
    /// this variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_timeout_mentions_path() {
        let err = Error::LockTimeout {
            path: PathBuf::from("/tmp/seq.json"),
            waited: Duration::from_millis(1500),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/seq.json"));
        assert!(msg.contains("1.5s"));
    }

    #[test]
    fn store_access_keeps_source() {
        use std::error::Error as _;

        let err = Error::StoreAccess {
            path: PathBuf::from("/nope/seq.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(err.to_string().contains("cannot access sequence store"));
        assert!(err.source().is_some());
    }
}
