//! Data models for the address pool

mod prefix;

pub use prefix::{PrefixKey, PrefixStats};
