use std::{
    sync::OnceLock,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Reference point captured on first use.
#[derive(Debug)]
struct Anchor {
    instant: Instant,
    wall_nanos: u128,
}

static ANCHOR: OnceLock<Anchor> = OnceLock::new();

/// A process-wide monotonic clock aligned to the Unix epoch.
///
/// The first call anywhere in the process captures the wall clock
/// (`SystemTime::now()`) together with a monotonic `Instant`. Every later
/// reading is the captured wall time plus the monotonic time elapsed since,
/// so readings stay meaningful across restarts yet never go backward when the
/// system clock is adjusted (e.g., NTP steps or manual changes).
///
/// # Example
///
/// ```
/// use frostid::MonotonicClock;
///
/// let a = MonotonicClock::now();
/// let b = MonotonicClock::now();
/// assert!(b >= a);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    /// Returns nanoseconds since the Unix epoch.
    ///
    /// A wall clock set before 1970 anchors at zero.
    pub fn now() -> u128 {
        let anchor = ANCHOR.get_or_init(|| Anchor {
            instant: Instant::now(),
            wall_nanos: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default(),
        });
        anchor.wall_nanos + anchor.instant.elapsed().as_nanos()
    }
}
