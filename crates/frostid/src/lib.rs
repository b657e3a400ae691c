//! # frostid
//!
//! Snowflake-style 64-bit identifiers that are roughly time ordered and
//! unique across clusters, workers, and processes on one host.
//!
//! An identifier packs, from the most significant usable bit down:
//!
//! - 50 bits of microseconds since a configurable epoch,
//! - 5 bits of cluster id,
//! - 5 bits of worker id,
//! - 3 bits of per-microsecond sequence.
//!
//! The clock, the sequence counter, and the encoder are swappable. Two
//! counters ship with the crate: [`MemorySequence`] for a single process and
//! [`FileSequence`] (feature `file`) which coordinates every process on a
//! host through an exclusively locked JSON file.
//!
//! ## Example
//!
//! ```
//! use frostid::Snowflake;
//!
//! let mut generator = Snowflake::default();
//! generator.configure("2021-02-02 00:00:00", 1, 7).unwrap();
//!
//! let a = generator.generate(None).unwrap();
//! let b = generator.generate(None).unwrap();
//! assert!(a < b);
//!
//! let parsed = generator.parse(b).unwrap();
//! assert_eq!(parsed.worker, 7);
//! ```
//!
//! ## Feature flags
//!
//! - `file` (default): [`FileSequence`], the cross-process counter.
//! - `tracing` (default): spans and events through `tracing`.
//! - `parking-lot`: `parking_lot` mutexes instead of `std`.
//! - `cache-padded`: pads the shared generator's lock to a cache line.
//! - `serde`: `Serialize`/`Deserialize` for [`Parsed`], [`Components`] and
//!   [`BitLayout`].
//! - `async-tokio`, `async-smol`: async retry loops.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod global;
mod id;
mod sequence;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::id::*;
pub use crate::sequence::*;
pub use crate::time::*;
