//! Pool service layer

mod pool;

pub use pool::{IpPool, PoolConfig};
