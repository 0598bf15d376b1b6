//! Prefix address arithmetic
//!
//! Pure functions over IPv4 and IPv6 prefixes: prefix length from a mask,
//! network and usable-host boundaries, host capacity, and translation between
//! addresses and host offsets.
//!
//! Addresses are handled as integers (`u32` widened to `u128` for IPv4) so
//! both families share one code path. IPv6 prefixes are limited to a host
//! portion of at most 64 bits, which keeps every host offset in a `u64`.

use crate::models::PrefixKey;
use crate::{Error, Result};
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Widest host portion accepted for IPv6 prefixes
pub const MAX_V6_HOST_BITS: u8 = 64;

/// Convert an address to its integer form
fn addr_to_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(a) => u128::from(u32::from(a)),
        IpAddr::V6(a) => u128::from(a),
    }
}

/// Convert an integer back to an address of the network's family
fn bits_to_addr(net: &IpNet, bits: u128) -> IpAddr {
    match net {
        IpNet::V4(_) => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        IpNet::V6(_) => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Whether `addr` belongs to the same address family as `net`
pub fn same_family(net: &IpNet, addr: IpAddr) -> bool {
    matches!(
        (net, addr),
        (IpNet::V4(_), IpAddr::V4(_)) | (IpNet::V6(_), IpAddr::V6(_))
    )
}

/// Prefix length encoded by a netmask
///
/// Counts the leading run of 1 bits. Bits set after the first 0 are ignored,
/// so a non-contiguous mask yields the length of its leading run.
pub fn prefix_len_from_mask(mask: IpAddr) -> u8 {
    match mask {
        IpAddr::V4(m) => u32::from(m).leading_ones() as u8,
        IpAddr::V6(m) => u128::from(m).leading_ones() as u8,
    }
}

/// Build a network from an address and a netmask
///
/// Host bits in `addr` are kept; use [`network_address`] for the masked form.
pub fn network_from_mask(addr: IpAddr, mask: IpAddr) -> Result<IpNet> {
    if addr.is_ipv4() != mask.is_ipv4() {
        return Err(Error::InvalidPrefix(format!(
            "address {} and mask {} are of different families",
            addr, mask
        )));
    }

    Ok(IpNet::new(addr, prefix_len_from_mask(mask))?)
}

/// Network address (address AND mask)
pub fn network_address(net: &IpNet) -> IpAddr {
    net.network()
}

/// Last address of the block (all host bits set)
pub fn broadcast_address(net: &IpNet) -> IpAddr {
    net.broadcast()
}

/// First assignable host address, one past the network address
pub fn first_usable(net: &IpNet) -> IpAddr {
    bits_to_addr(net, addr_to_bits(net.network()).wrapping_add(1))
}

/// Last assignable host address
///
/// For IPv4 this is one below the broadcast address. For IPv6 there is no
/// broadcast, so it is the network address plus the capacity.
pub fn last_usable(net: &IpNet) -> Result<IpAddr> {
    let capacity = max_hosts(net)?;
    Ok(bits_to_addr(
        net,
        addr_to_bits(net.network()) + u128::from(capacity),
    ))
}

/// Maximum number of assignable host addresses in a prefix
///
/// - IPv4: `2^(32 - len) - 2`, excluding network and broadcast. A /31 has no
///   usable hosts; a /32 is rejected as `InvalidPrefix`.
/// - IPv6: `2^(128 - len) - 1`, excluding the network address. Host portions
///   wider than 64 bits are rejected as `UnsupportedPrefixSize`.
pub fn max_hosts(net: &IpNet) -> Result<u64> {
    match net {
        IpNet::V4(n) => {
            let host_bits = 32 - n.prefix_len();
            if host_bits == 0 {
                return Err(Error::InvalidPrefix(format!(
                    "{} leaves no room for network and broadcast addresses",
                    net
                )));
            }
            Ok((1u64 << host_bits) - 2)
        }
        IpNet::V6(n) => {
            let host_bits = 128 - n.prefix_len();
            if host_bits > MAX_V6_HOST_BITS {
                return Err(Error::UnsupportedPrefixSize {
                    prefix: *net,
                    host_bits,
                });
            }
            if host_bits == 0 {
                return Ok(0);
            }
            Ok(u64::MAX >> (64 - host_bits))
        }
    }
}

/// Canonical pool key: normalized network address and prefix length
pub fn canonical_key(net: &IpNet) -> PrefixKey {
    PrefixKey::new(net)
}

/// Address at a host offset, counted from the first usable address
pub fn address_at(net: &IpNet, offset: u64) -> IpAddr {
    let first = addr_to_bits(first_usable(net));
    bits_to_addr(net, first.wrapping_add(u128::from(offset)))
}

/// Host offset of an address, counted from the first usable address
///
/// Returns `None` for an address of the other family, one below the first
/// usable address, or one too far away to be expressed as a `u64` offset.
pub fn offset_of(net: &IpNet, addr: IpAddr) -> Option<u64> {
    if !same_family(net, addr) {
        return None;
    }

    let first = addr_to_bits(first_usable(net));
    let addr = addr_to_bits(addr);
    if addr < first {
        return None;
    }
    u64::try_from(addr - first).ok()
}
