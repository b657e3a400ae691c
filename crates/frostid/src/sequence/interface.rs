use crate::Result;

/// Hands out sequence numbers within a time bucket.
///
/// Implementations return a value that increases on every call for the same
/// `current_time` and restarts when the bucket changes. They do not enforce
/// an upper bound: the generator compares the result against the layout's
/// maximum and retries with a fresh bucket when it is exceeded.
///
/// Closures `FnMut(i64) -> i64` implement this trait and never fail.
pub trait SequenceCounter {
    /// Returns the next sequence number for the `current_time` bucket.
    ///
    /// # Errors
    ///
    /// Backends with external state (e.g., [`FileSequence`]) report access or
    /// locking failures.
    ///
    /// [`FileSequence`]: crate::FileSequence
    fn sequence(&mut self, current_time: i64) -> Result<i64>;
}

impl<F> SequenceCounter for F
where
    F: FnMut(i64) -> i64,
{
    fn sequence(&mut self, current_time: i64) -> Result<i64> {
        Ok(self(current_time))
    }
}
