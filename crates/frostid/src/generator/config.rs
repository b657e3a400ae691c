use core::time::Duration;

use crate::{BitLayout, DEFAULT_EPOCH, Error, Result, TimeUnit, parse_epoch};

/// Cluster id used until one is configured.
pub const DEFAULT_CLUSTER_ID: u32 = 1;

/// Worker id used until one is configured.
pub const DEFAULT_WORKER_ID: u32 = 1;

/// Epoch, address, and bit layout shared by every identifier a generator
/// issues.
///
/// The epoch is stored in the configuration's [`TimeUnit`], which must match
/// the active timestamp source (microseconds by default). Cluster and worker
/// ids are checked against the layout when the configuration is built, so a
/// `Config` never holds values that would bleed into neighbouring fields.
///
/// # Example
///
/// ```
/// use frostid::{Config, TimeUnit};
///
/// let config = Config::new("2024-01-01 00:00:00", 2, 3).unwrap();
/// assert_eq!(config.epoch(), 1_704_067_200_000_000);
/// assert_eq!(config.cluster(), 2);
/// assert_eq!(config.worker(), 3);
///
/// assert!(Config::new("2024-01-01", 32, 0).is_err());
///
/// let millis = config.with_unit(TimeUnit::Milliseconds);
/// assert_eq!(millis.epoch(), 1_704_067_200_000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    epoch: i64,
    cluster: u32,
    worker: u32,
    layout: BitLayout,
    unit: TimeUnit,
}

impl Default for Config {
    /// `2021-02-02 00:00:00` UTC epoch in microseconds, cluster `1`, worker
    /// `1`, [`BitLayout::DEFAULT`].
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH.as_micros() as i64,
            cluster: DEFAULT_CLUSTER_ID,
            worker: DEFAULT_WORKER_ID,
            layout: BitLayout::DEFAULT,
            unit: TimeUnit::Microseconds,
        }
    }
}

impl Config {
    /// Builds a configuration from a wall-clock epoch string, using
    /// microsecond units and the default layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the epoch cannot be parsed or the
    /// cluster/worker ids do not fit the layout.
    pub fn new(epoch_start: &str, cluster: u32, worker: u32) -> Result<Self> {
        Self::from_epoch(parse_epoch(epoch_start)?, cluster, worker)
    }

    /// Builds a configuration from an epoch in microseconds since the Unix
    /// epoch. Use [`Self::with_unit`] to switch units afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the cluster/worker ids do not fit
    /// the default layout.
    pub fn from_epoch(epoch: i64, cluster: u32, worker: u32) -> Result<Self> {
        Self {
            epoch,
            cluster,
            worker,
            layout: BitLayout::DEFAULT,
            unit: TimeUnit::Microseconds,
        }
        .validated()
    }

    /// Builds a configuration from a [`Duration`] since the Unix epoch (e.g.
    /// [`TWITTER_EPOCH`]), in microseconds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_epoch`].
    ///
    /// [`TWITTER_EPOCH`]: crate::TWITTER_EPOCH
    pub fn with_epoch(epoch: Duration, cluster: u32, worker: u32) -> Result<Self> {
        Self::from_epoch(epoch.as_micros() as i64, cluster, worker)
    }

    /// Replaces the bit layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the current cluster/worker ids do
    /// not fit the new layout.
    pub fn with_layout(self, layout: BitLayout) -> Result<Self> {
        Self { layout, ..self }.validated()
    }

    /// Switches the time unit, rescaling the epoch into it.
    ///
    /// Converting to a coarser unit rounds the epoch down.
    pub const fn with_unit(self, unit: TimeUnit) -> Self {
        let micros = self.unit.to_micros(self.epoch);
        Self {
            epoch: unit.from_micros(micros),
            unit,
            ..self
        }
    }

    /// The epoch, in [`Self::unit`].
    pub const fn epoch(&self) -> i64 {
        self.epoch
    }

    pub const fn cluster(&self) -> u32 {
        self.cluster
    }

    pub const fn worker(&self) -> u32 {
        self.worker
    }

    pub const fn layout(&self) -> &BitLayout {
        &self.layout
    }

    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    fn validated(self) -> Result<Self> {
        if self.cluster > self.layout.max_cluster() {
            return Err(Error::Configuration(format!(
                "cluster id {} exceeds {}",
                self.cluster,
                self.layout.max_cluster()
            )));
        }
        if self.worker > self.layout.max_worker() {
            return Err(Error::Configuration(format!(
                "worker id {} exceeds {}",
                self.worker,
                self.layout.max_worker()
            )));
        }
        Ok(self)
    }
}
