//! Per-prefix address allocator
//!
//! Issues addresses within one prefix. Fresh addresses come from a sequential
//! counter; released addresses go to a free list and are handed out again,
//! greatest offset first, before the counter grows.

use super::free_list::FreeList;
use crate::cidr;
use crate::models::{PrefixKey, PrefixStats};
use crate::{Error, Result};
use ipnet::IpNet;
use std::net::IpAddr;

/// Trait for address allocation within a prefix
pub trait IpAllocator: Send + Sync {
    /// Issue an address, preferring released ones
    fn allocate(&mut self) -> Result<IpAddr>;

    /// Return a previously issued address for reuse
    fn release(&mut self, ip: IpAddr) -> Result<()>;

    /// Check if an address has been released and awaits reuse
    fn is_released(&self, ip: IpAddr) -> bool;

    /// Get the number of addresses that can still be issued
    fn available_count(&self) -> u64;

    /// Snapshot of the allocation counters
    fn stats(&self) -> PrefixStats;
}

/// Allocator for a single registered prefix
///
/// Host offsets count from the first usable address. Offsets below `issued`
/// have been handed out at least once; those among them in the free list are
/// currently unassigned.
#[derive(Debug, Clone)]
pub struct PrefixAllocator {
    /// Normalized prefix
    network: IpNet,
    /// Maximum assignable host addresses
    capacity: u64,
    /// Addresses issued through the sequential counter
    issued: u64,
    /// Offsets currently held in the free list
    freed_count: u64,
    /// Released offsets awaiting reuse
    free_list: FreeList,
}

impl PrefixAllocator {
    /// Create an allocator for the given prefix
    ///
    /// Fails for prefixes whose capacity cannot be computed: IPv4 /32 and IPv6
    /// prefixes with more than 64 host bits.
    pub fn new(network: &IpNet) -> Result<Self> {
        let capacity = cidr::max_hosts(network)?;

        Ok(Self {
            network: network.trunc(),
            capacity,
            issued: 0,
            freed_count: 0,
            free_list: FreeList::new(),
        })
    }

    /// Get the prefix
    pub fn network(&self) -> IpNet {
        self.network
    }

    /// Get the canonical key of the prefix
    pub fn key(&self) -> PrefixKey {
        cidr::canonical_key(&self.network)
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn freed_count(&self) -> u64 {
        self.freed_count
    }

    /// Offset of an address inside the usable range, if it lies there
    fn usable_offset(&self, ip: IpAddr) -> Option<u64> {
        // offset < capacity  <=>  first_usable <= ip <= last_usable
        cidr::offset_of(&self.network, ip).filter(|&offset| offset < self.capacity)
    }
}

impl IpAllocator for PrefixAllocator {
    fn allocate(&mut self) -> Result<IpAddr> {
        if self.freed_count > 0 {
            if let Some(offset) = self.free_list.pop_max() {
                self.freed_count -= 1;
                return Ok(cidr::address_at(&self.network, offset));
            }
        }

        if self.issued < self.capacity {
            let ip = cidr::address_at(&self.network, self.issued);
            self.issued += 1;
            return Ok(ip);
        }

        Err(Error::PoolExhausted(self.key()))
    }

    fn release(&mut self, ip: IpAddr) -> Result<()> {
        let offset = self.usable_offset(ip).ok_or(Error::OutOfRange {
            addr: ip,
            prefix: self.key(),
        })?;

        // Never handed out, so it cannot be outstanding
        if offset >= self.issued {
            return Err(Error::NotInUse(ip));
        }

        self.free_list.insert(offset).map_err(|e| match e {
            Error::DuplicateOffset(_) => Error::DuplicateRelease(ip),
            other => other,
        })?;
        self.freed_count += 1;

        Ok(())
    }

    fn is_released(&self, ip: IpAddr) -> bool {
        self.usable_offset(ip)
            .map(|offset| self.free_list.contains(offset))
            .unwrap_or(false)
    }

    fn available_count(&self) -> u64 {
        self.capacity - self.issued + self.freed_count
    }

    fn stats(&self) -> PrefixStats {
        PrefixStats {
            prefix: self.key(),
            capacity: self.capacity,
            issued: self.issued,
            freed: self.freed_count,
        }
    }
}
