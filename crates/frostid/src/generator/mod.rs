mod config;
mod mutex;
mod shared;
mod snowflake;
mod status;
#[cfg(test)]
mod tests;

pub use config::*;
pub use mutex::*;
pub use shared::*;
pub use snowflake::*;
pub use status::*;
