/// The outcome of a single generation attempt.
///
/// Returned by [`Snowflake::try_poll_id`]:
///
/// - [`Poll::Ready`] carries the encoded identifier.
/// - [`Poll::Pending`] means the sequence counter handed out a value past the
///   layout's maximum for `bucket`; retry once the clock has moved on.
///
/// This allows custom backoff strategies around the retry loop.
///
/// # Example
///
/// ```
/// use frostid::{Poll, Snowflake};
///
/// let mut generator = Snowflake::default();
/// let id = loop {
///     match generator.try_poll_id(None).unwrap() {
///         Poll::Ready { id } => break id,
///         Poll::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert!(id > 0);
/// ```
///
/// [`Snowflake::try_poll_id`]: crate::Snowflake::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique identifier was generated.
    Ready {
        /// The encoded identifier.
        id: i64,
    },
    /// The sequence for `bucket` is exhausted.
    Pending {
        /// The time bucket that ran out of sequence numbers.
        bucket: i64,
    },
}
