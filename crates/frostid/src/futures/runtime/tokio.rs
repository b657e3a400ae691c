use core::time::Duration;

use crate::futures::SleepProvider;

/// [`SleepProvider`] backed by Tokio's timer.
///
/// Tokio timers have millisecond granularity, so each backoff lasts at least
/// a millisecond.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// [`SleepProvider`] that yields to the Tokio scheduler instead of sleeping.
///
/// Microsecond buckets roll over quickly, so yielding is usually enough for a
/// fresh bucket to arrive. Under heavy contention the tighter polling loop
/// costs more CPU than [`TokioSleep`].
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: Duration) {
        tokio::task::yield_now().await;
    }
}
