//! Error types for address pool operations

use crate::models::PrefixKey;
use ipnet::IpNet;
use std::net::IpAddr;
use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Address pool errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Registration errors
    #[error("Prefix already registered: {0}")]
    AlreadyRegistered(PrefixKey),

    #[error("Prefix not registered: {0}")]
    UnknownPrefix(PrefixKey),

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("Unsupported prefix size for {prefix}: {host_bits} host bits (at most 64 supported)")]
    UnsupportedPrefixSize { prefix: IpNet, host_bits: u8 },

    #[error("Prefix limit reached: pool holds at most {0} prefixes")]
    PrefixLimitReached(usize),

    // Allocation errors
    #[error("No available addresses in prefix {0}")]
    PoolExhausted(PrefixKey),

    #[error("Address {addr} is outside the usable range of {prefix}")]
    OutOfRange { addr: IpAddr, prefix: PrefixKey },

    #[error("Address {0} was never issued and cannot be released")]
    NotInUse(IpAddr),

    #[error("Address {0} is already released")]
    DuplicateRelease(IpAddr),

    // Free list errors
    #[error("Offset {0} is already in the free list")]
    DuplicateOffset(u64),
}

impl From<ipnet::PrefixLenError> for Error {
    fn from(e: ipnet::PrefixLenError) -> Self {
        Error::InvalidPrefix(e.to_string())
    }
}

impl From<ipnet::AddrParseError> for Error {
    fn from(e: ipnet::AddrParseError) -> Self {
        Error::InvalidPrefix(e.to_string())
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Error::InvalidPrefix(e.to_string())
    }
}
