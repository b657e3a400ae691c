use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

#[cfg(feature = "tracing")]
use tracing::{instrument, warn};

use crate::{Result, SequenceCounter, sequence::lock::StoreLock};

/// How long [`FileSequence`] polls for the store lock before failing.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(1_500);

/// Pause between lock attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_micros(10);

/// Buckets older than `current - DEFAULT_GC_WINDOW` are dropped: one second
/// when buckets are microseconds.
pub const DEFAULT_GC_WINDOW: i64 = 1_000_000;

/// A sequence counter shared by every process on the host that points at the
/// same file.
///
/// Each call opens the store, takes an exclusive OS lock, and performs one
/// read-modify-write of the bucket map:
///
/// 1. buckets older than `current_time - gc_window` are dropped,
/// 2. `current_time` is incremented (inserted at `0` first if absent),
/// 3. the whole map is written back and the lock released.
///
/// The first issuance for a bucket therefore returns `1`, unlike
/// [`MemorySequence`] which starts at `0`.
///
/// The store is a JSON object mapping decimal bucket keys to the last issued
/// sequence, e.g. `{"1738450629796380011":3}`. Empty or corrupt content is
/// treated as `{}` and negative entries are dropped; either way the store is
/// overwritten on the next call.
///
/// ## Features
/// - ✅ Safe across threads and processes on one host
/// - ❌ One file round trip per call
///
/// # Example
///
/// ```
/// use frostid::{FileSequence, SequenceCounter};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut a = FileSequence::new(dir.path().join("seq.json"));
/// let mut b = FileSequence::new(dir.path().join("seq.json"));
///
/// assert_eq!(a.sequence(10).unwrap(), 1);
/// assert_eq!(b.sequence(10).unwrap(), 2);
/// assert_eq!(a.sequence(11).unwrap(), 1);
/// ```
///
/// [`MemorySequence`]: crate::MemorySequence
#[derive(Clone, Debug)]
pub struct FileSequence {
    path: PathBuf,
    lock_timeout: Duration,
    retry_interval: Duration,
    gc_window: i64,
}

impl FileSequence {
    /// Creates a counter backed by `path`. The file is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            gc_window: DEFAULT_GC_WINDOW,
        }
    }

    /// Sets how long to poll for the store lock before failing with
    /// [`Error::LockTimeout`](crate::Error::LockTimeout).
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the pause between lock attempts.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Sets how far behind the current bucket entries survive garbage
    /// collection, in bucket units. Use `1_000` with millisecond buckets.
    pub fn with_gc_window(mut self, window: i64) -> Self {
        self.gc_window = window;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gc_window(&self) -> i64 {
        self.gc_window
    }
}

impl SequenceCounter for FileSequence {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(path = %self.path.display()))
    )]
    fn sequence(&mut self, current_time: i64) -> Result<i64> {
        let mut store = StoreLock::acquire(&self.path, self.lock_timeout, self.retry_interval)?;

        let mut buckets = decode(&store.read_contents()?);
        collect_garbage(&mut buckets, current_time.saturating_sub(self.gc_window));

        let sequence = {
            let entry = buckets.entry(current_time).or_insert(0);
            // A saturated bucket stays exhausted until the clock moves on.
            *entry = entry.saturating_add(1);
            *entry
        };

        store.replace_contents(&encode(&buckets))?;
        Ok(sequence)
    }
}

type Buckets = BTreeMap<i64, i64>;

fn decode(content: &str) -> Buckets {
    let content = content.trim();
    if content.is_empty() {
        return Buckets::new();
    }
    match serde_json::from_str::<Buckets>(content) {
        Ok(mut buckets) => {
            let before = buckets.len();
            buckets.retain(|_, sequence| *sequence >= 0);
            if buckets.len() < before {
                #[cfg(feature = "tracing")]
                warn!(
                    dropped = before - buckets.len(),
                    "discarding negative sequence store entries"
                );
            }
            buckets
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "discarding unreadable sequence store content");
            Buckets::new()
        }
    }
}

fn encode(buckets: &Buckets) -> Vec<u8> {
    // Integer keys always serialize as JSON strings, which cannot fail.
    serde_json::to_vec(buckets).unwrap_or_else(|_| b"{}".to_vec())
}

/// Drops every bucket older than `oldest`. Keys are ordered, so this is a
/// prefix trim.
fn collect_garbage(buckets: &mut Buckets, oldest: i64) {
    *buckets = buckets.split_off(&oldest);
}
