use core::{future::Future, time::Duration};

/// Abstracts over how an async retry loop waits between attempts.
///
/// Lets the generator stay generic over runtimes like `Tokio` or `Smol`.
pub trait SleepProvider {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
