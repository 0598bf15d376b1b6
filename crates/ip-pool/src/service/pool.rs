//! Address Pool Service
//!
//! Owns every registered prefix and serves the pool operations:
//! - Prefix registration
//! - Address request (reuse first, then sequential issue)
//! - Address release with range, issue and duplicate checks
//! - Read-only queries (released state, counters, registered prefixes)
//!
//! Each prefix sits behind its own lock, so operations on different prefixes
//! never wait on each other.

use crate::allocator::{IpAllocator, PrefixAllocator};
use crate::cidr;
use crate::models::{PrefixKey, PrefixStats};
use crate::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ipnet::IpNet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Configuration for IpPool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of registered prefixes (unlimited if None)
    pub max_prefixes: Option<usize>,
    /// Emit a debug event for every issued and released address
    pub log_allocations: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_prefixes: None,
            log_allocations: true,
        }
    }
}

impl PoolConfig {
    /// Limit the number of prefixes the pool accepts
    pub fn with_max_prefixes(mut self, max_prefixes: usize) -> Self {
        self.max_prefixes = Some(max_prefixes);
        self
    }

    /// Toggle per-address debug events
    pub fn with_log_allocations(mut self, enabled: bool) -> Self {
        self.log_allocations = enabled;
        self
    }
}

/// In-memory address pool
///
/// The pool is the only owner of prefix state. Callers identify a prefix by
/// any network that normalizes to the same canonical key.
pub struct IpPool {
    /// Configuration
    config: PoolConfig,
    /// Allocators indexed by canonical prefix key
    prefixes: DashMap<PrefixKey, Arc<Mutex<PrefixAllocator>>>,
    /// Registered prefix count, used to enforce `max_prefixes`
    registered: AtomicUsize,
}

impl IpPool {
    /// Create an empty pool with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create an empty pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            config,
            prefixes: DashMap::new(),
            registered: AtomicUsize::new(0),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // ==================== Registration ====================

    /// Register a prefix
    ///
    /// The first registration of a canonical key wins; later ones fail with
    /// `AlreadyRegistered` and leave the existing state untouched.
    #[instrument(level = "debug", skip_all, fields(prefix = %net))]
    pub fn register_prefix(&self, net: &IpNet) -> Result<()> {
        let key = cidr::canonical_key(net);

        match self.prefixes.entry(key) {
            Entry::Occupied(_) => {
                warn!(prefix = %key, "Prefix already registered");
                Err(Error::AlreadyRegistered(key))
            }
            Entry::Vacant(entry) => {
                let allocator = PrefixAllocator::new(net)?;
                self.reserve_slot()?;

                let capacity = allocator.capacity();
                entry.insert(Arc::new(Mutex::new(allocator)));

                info!(prefix = %key, capacity, "Registered prefix");
                Ok(())
            }
        }
    }

    /// Count a new registration against the configured limit
    fn reserve_slot(&self) -> Result<()> {
        match self.config.max_prefixes {
            Some(limit) => self
                .registered
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n < limit).then_some(n + 1)
                })
                .map(|_| ())
                .map_err(|_| {
                    warn!(limit, "Prefix limit reached");
                    Error::PrefixLimitReached(limit)
                }),
            None => {
                self.registered.fetch_add(1, Ordering::AcqRel);
                Ok(())
            }
        }
    }

    /// Find the allocator for a prefix
    ///
    /// The map guard is released before returning, so the caller can lock the
    /// allocator without holding up other prefixes in the same shard.
    fn allocator(&self, net: &IpNet) -> Result<Arc<Mutex<PrefixAllocator>>> {
        let key = cidr::canonical_key(net);
        self.prefixes
            .get(&key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::UnknownPrefix(key))
    }

    // ==================== Allocation ====================

    /// Request an address from a prefix
    ///
    /// Released addresses are reused (greatest offset first) before a new
    /// sequential address is issued. Fails with `PoolExhausted` when neither
    /// is available.
    #[instrument(level = "debug", skip_all, fields(prefix = %net))]
    pub fn request_ip(&self, net: &IpNet) -> Result<IpAddr> {
        let allocator = self.allocator(net)?;
        let result = allocator.lock().allocate();

        match &result {
            Ok(ip) if self.config.log_allocations => debug!(address = %ip, "Issued address"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Address request failed"),
        }
        result
    }

    /// Return an issued address to its prefix
    #[instrument(level = "debug", skip_all, fields(prefix = %net, address = %ip))]
    pub fn release_ip(&self, net: &IpNet, ip: IpAddr) -> Result<()> {
        let allocator = self.allocator(net)?;
        let result = allocator.lock().release(ip);

        match &result {
            Ok(()) if self.config.log_allocations => debug!("Released address"),
            Ok(()) => {}
            Err(e) => warn!(error = %e, "Rejected address release"),
        }
        result
    }

    // ==================== Queries ====================

    /// Check if an address was released and is waiting for reuse
    ///
    /// This is not an "in use" check: an address that is currently assigned
    /// returns false. Unknown prefixes and foreign addresses also return false.
    pub fn is_address_released(&self, net: &IpNet, ip: IpAddr) -> bool {
        self.allocator(net)
            .map(|allocator| allocator.lock().is_released(ip))
            .unwrap_or(false)
    }

    /// Snapshot of a prefix's counters
    pub fn prefix_stats(&self, net: &IpNet) -> Result<PrefixStats> {
        Ok(self.allocator(net)?.lock().stats())
    }

    /// Number of addresses a prefix can still hand out
    pub fn available_count(&self, net: &IpNet) -> Result<u64> {
        Ok(self.allocator(net)?.lock().available_count())
    }

    /// Check if a prefix is registered
    pub fn is_registered(&self, net: &IpNet) -> bool {
        self.prefixes.contains_key(&cidr::canonical_key(net))
    }

    /// All registered prefixes, in ascending order
    pub fn registered_prefixes(&self) -> Vec<PrefixKey> {
        let mut keys: Vec<PrefixKey> = self.prefixes.iter().map(|entry| *entry.key()).collect();
        keys.sort();
        keys
    }

    /// Number of registered prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for IpPool {
    fn default() -> Self {
        Self::new()
    }
}
