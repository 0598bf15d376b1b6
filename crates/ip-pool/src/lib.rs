//! In-Process IP Address Pool
//!
//! Issues unused addresses from registered IPv4 and IPv6 prefixes and takes
//! them back for reuse:
//! - Sequential issue from the first usable host address
//! - Reuse of released addresses, greatest host offset first
//! - Release validation (range, never-issued, double release)
//! - Per-prefix locking for concurrent callers
//!
//! IPv6 prefixes must have a host portion of at most 64 bits (prefix length
//! of 64 or more).
//!
//! ```
//! use ip_pool::IpPool;
//! use ipnet::IpNet;
//!
//! let pool = IpPool::new();
//! let prefix: IpNet = "192.168.0.0/24".parse().unwrap();
//! pool.register_prefix(&prefix).unwrap();
//!
//! let ip = pool.request_ip(&prefix).unwrap();
//! assert_eq!(ip.to_string(), "192.168.0.1");
//!
//! pool.release_ip(&prefix, ip).unwrap();
//! assert!(pool.is_address_released(&prefix, ip));
//! ```

pub mod allocator;
pub mod cidr;
pub mod error;
pub mod models;
pub mod service;

// Re-export core types
pub use allocator::{FreeList, IpAllocator, PrefixAllocator};
pub use error::{Error, Result};
pub use models::{PrefixKey, PrefixStats};
pub use service::{IpPool, PoolConfig};
