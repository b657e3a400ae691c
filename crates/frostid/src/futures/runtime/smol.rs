use core::time::Duration;

use smol::Timer;

use crate::futures::SleepProvider;

/// [`SleepProvider`] backed by Smol's timer.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    async fn sleep_for(dur: Duration) {
        Timer::after(dur).await;
    }
}

/// [`SleepProvider`] that yields to the Smol executor instead of sleeping.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    async fn sleep_for(_dur: Duration) {
        smol::future::yield_now().await;
    }
}
