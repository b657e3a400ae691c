#[cfg(feature = "file")]
mod file;
mod interface;
#[cfg(feature = "file")]
mod lock;
mod memory;

#[cfg_attr(docsrs, doc(cfg(feature = "file")))]
#[cfg(feature = "file")]
pub use file::*;
pub use interface::*;
pub use memory::*;
