mod epoch;
mod interface;
mod mono_clock;
mod unit;

pub use epoch::*;
pub use interface::*;
pub use mono_clock::*;
pub use unit::*;
