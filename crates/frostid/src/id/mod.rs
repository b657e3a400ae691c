mod interface;
mod layout;
mod parsed;

pub use interface::*;
pub use layout::*;
pub use parsed::*;
