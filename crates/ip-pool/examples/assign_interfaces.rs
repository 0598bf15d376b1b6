//! Assign addresses to a set of virtual interfaces
//!
//! Registers an IPv4 and an IPv6 prefix, hands each interface one address of
//! each family, then tears one interface down and brings up a replacement.
//!
//! Run with `RUST_LOG=ip_pool=debug` to see per-address events.

use ip_pool::{IpPool, PoolConfig, Result};
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = IpPool::with_config(PoolConfig::default().with_max_prefixes(4));
    let v4: IpNet = "10.77.0.0/28".parse()?;
    let v6: IpNet = "fd77::/120".parse()?;
    pool.register_prefix(&v4)?;
    pool.register_prefix(&v6)?;

    let mut interfaces = Vec::new();
    for i in 0..4 {
        let name = format!("veth{}", i);
        let addr4 = pool.request_ip(&v4)?;
        let addr6 = pool.request_ip(&v6)?;
        tracing::info!(interface = %name, ipv4 = %addr4, ipv6 = %addr6, "Interface up");
        interfaces.push((name, addr4, addr6));
    }

    let (name, addr4, addr6) = interfaces.remove(1);
    pool.release_ip(&v4, addr4)?;
    pool.release_ip(&v6, addr6)?;
    tracing::info!(interface = %name, "Interface down");

    // The replacement picks up the addresses just released
    let addr4 = pool.request_ip(&v4)?;
    let addr6 = pool.request_ip(&v6)?;
    tracing::info!(interface = "veth4", ipv4 = %addr4, ipv6 = %addr6, "Interface up");

    for prefix in pool.registered_prefixes() {
        let stats = pool.prefix_stats(&prefix.as_net())?;
        println!(
            "{}: {} outstanding, {} available",
            stats.prefix,
            stats.outstanding(),
            stats.available()
        );
    }

    Ok(())
}
