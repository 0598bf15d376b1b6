//! Prefix key and statistics models

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Canonical key of a registered prefix
///
/// Holds the prefix with its host bits cleared, so `192.168.0.77/24` and
/// `192.168.0.0/24` map to the same key. Renders as `<network>/<len>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixKey(IpNet);

impl PrefixKey {
    /// Build the canonical key for a network
    pub fn new(net: &IpNet) -> Self {
        Self(net.trunc())
    }

    /// Normalized network address
    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// The normalized prefix
    pub fn as_net(&self) -> IpNet {
        self.0
    }
}

impl From<IpNet> for PrefixKey {
    fn from(net: IpNet) -> Self {
        Self::new(&net)
    }
}

impl FromStr for PrefixKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Ok(Self::new(&IpNet::from_str(s)?))
    }
}

impl fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.network(), self.0.prefix_len())
    }
}

/// Point-in-time snapshot of a prefix's allocation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixStats {
    /// Canonical prefix
    pub prefix: PrefixKey,
    /// Maximum number of assignable host addresses
    pub capacity: u64,
    /// Addresses handed out through sequential issue
    pub issued: u64,
    /// Released addresses waiting for reuse
    pub freed: u64,
}

impl PrefixStats {
    /// Addresses currently assigned to callers
    pub fn outstanding(&self) -> u64 {
        self.issued - self.freed
    }

    /// Addresses that can still be requested
    pub fn available(&self) -> u64 {
        self.capacity - self.issued + self.freed
    }

    /// Whether no further request can succeed
    pub fn is_exhausted(&self) -> bool {
        self.available() == 0
    }
}
