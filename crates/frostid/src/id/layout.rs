use core::fmt;

use crate::{Components, Error, Result};

/// Field widths of a 64-bit signed identifier.
///
/// Fields are packed from the least significant bit upward: sequence, worker,
/// cluster, then timestamp. The default layout uses all 63 usable bits:
///
/// ```text
///  Bit Index:  63           63 62             13 12           8 7           3 2            0
///              +--------------+-----------------+--------------+-------------+--------------+
///  Field:      | sign (1)     | timestamp (50)  | cluster (5)  | worker (5)  | sequence (3) |
///              +--------------+-----------------+--------------+-------------+--------------+
///              |<------------ MSB ------------ 64 bits ------------ LSB ------------------->|
/// ```
///
/// The timestamp is shifted with plain `i64` arithmetic. Once the elapsed time
/// outgrows its field (roughly 35.7 years of microseconds for the default
/// layout) the value spills into the sign bit and identifiers turn negative.
/// That wrap-around is kept bit-exact rather than checked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBitLayout"))]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BitLayout {
    timestamp_bits: u8,
    cluster_bits: u8,
    worker_bits: u8,
    sequence_bits: u8,
}

impl Default for BitLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitLayout {
    /// Usable bits in the signed container.
    pub const ID_BITS: u32 = 63;

    /// 50 timestamp bits, 5 cluster bits, 5 worker bits, 3 sequence bits.
    pub const DEFAULT: Self = Self {
        timestamp_bits: 50,
        cluster_bits: 5,
        worker_bits: 5,
        sequence_bits: 3,
    };

    /// Builds a layout from explicit field widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the widths add up to more than
    /// [`Self::ID_BITS`].
    ///
    /// # Example
    ///
    /// ```
    /// use frostid::BitLayout;
    ///
    /// let layout = BitLayout::new(41, 5, 5, 12).unwrap();
    /// assert_eq!(layout.max_sequence(), 4095);
    /// assert_eq!(layout.timestamp_shift(), 22);
    ///
    /// assert!(BitLayout::new(52, 5, 5, 3).is_err());
    /// ```
    pub fn new(timestamp_bits: u8, cluster_bits: u8, worker_bits: u8, sequence_bits: u8) -> Result<Self> {
        let total = u32::from(timestamp_bits)
            + u32::from(cluster_bits)
            + u32::from(worker_bits)
            + u32::from(sequence_bits);
        if total > Self::ID_BITS {
            return Err(Error::Configuration(format!(
                "bit layout needs {total} bits, only {} are usable",
                Self::ID_BITS
            )));
        }
        Ok(Self {
            timestamp_bits,
            cluster_bits,
            worker_bits,
            sequence_bits,
        })
    }

    pub const fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits as u32
    }

    pub const fn cluster_bits(&self) -> u32 {
        self.cluster_bits as u32
    }

    pub const fn worker_bits(&self) -> u32 {
        self.worker_bits as u32
    }

    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits as u32
    }

    /// Shift of the worker field (just above the sequence).
    pub const fn worker_shift(&self) -> u32 {
        self.sequence_bits()
    }

    /// Shift of the cluster field.
    pub const fn cluster_shift(&self) -> u32 {
        self.worker_shift() + self.worker_bits()
    }

    /// Shift of the timestamp field.
    pub const fn timestamp_shift(&self) -> u32 {
        self.cluster_shift() + self.cluster_bits()
    }

    /// Highest sequence value that fits; the generator retries past it.
    pub const fn max_sequence(&self) -> i64 {
        mask(self.sequence_bits()) as i64
    }

    pub const fn max_worker(&self) -> u32 {
        mask(self.worker_bits()) as u32
    }

    pub const fn max_cluster(&self) -> u32 {
        mask(self.cluster_bits()) as u32
    }

    pub const fn max_timestamp(&self) -> i64 {
        mask(self.timestamp_bits()) as i64
    }

    /// Packs the components into an identifier.
    ///
    /// Fields are OR-ed in without masking, in every build profile. Values
    /// wider than their field, or negative ones, bleed into the neighbouring
    /// fields instead of panicking. [`Config`] keeps cluster and worker in
    /// range and the generator never encodes a sequence above
    /// [`Self::max_sequence`]; custom encoders own that check.
    ///
    /// [`Config`]: crate::Config
    pub const fn pack(&self, parts: Components) -> i64 {
        (parts.timestamp << self.timestamp_shift())
            | ((parts.cluster as i64) << self.cluster_shift())
            | ((parts.worker as i64) << self.worker_shift())
            | parts.sequence
    }

    /// Splits an identifier back into its components.
    ///
    /// The value is read as its 64-bit two's-complement pattern; everything
    /// above the cluster field is the timestamp, so identifiers that wrapped
    /// negative still decode to their original elapsed time.
    pub const fn unpack(&self, id: i64) -> Components {
        let raw = id as u64;
        Components {
            timestamp: (raw >> self.timestamp_shift()) as i64,
            cluster: ((raw >> self.cluster_shift()) & mask(self.cluster_bits())) as u32,
            worker: ((raw >> self.worker_shift()) & mask(self.worker_bits())) as u32,
            sequence: (raw & mask(self.sequence_bits())) as i64,
        }
    }
}

impl fmt::Debug for BitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BitLayout {{ timestamp: {}@{}, cluster: {}@{}, worker: {}@{}, sequence: {}@0 }}",
            self.timestamp_bits,
            self.timestamp_shift(),
            self.cluster_bits,
            self.cluster_shift(),
            self.worker_bits,
            self.worker_shift(),
            self.sequence_bits,
        )
    }
}

/// Unvalidated wire form of [`BitLayout`]; deserializing goes through
/// [`BitLayout::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBitLayout {
    timestamp_bits: u8,
    cluster_bits: u8,
    worker_bits: u8,
    sequence_bits: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBitLayout> for BitLayout {
    type Error = Error;

    fn try_from(raw: RawBitLayout) -> Result<Self> {
        Self::new(
            raw.timestamp_bits,
            raw.cluster_bits,
            raw.worker_bits,
            raw.sequence_bits,
        )
    }
}

const fn mask(bits: u32) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (64 - bits) }
}
