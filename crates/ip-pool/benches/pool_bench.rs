//! Performance benchmarks for the address pool

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use ip_pool::{cidr, IpAllocator, IpPool, PoolConfig, PrefixAllocator};
use ipnet::IpNet;
use std::net::IpAddr;
use std::str::FromStr;

fn quiet_pool() -> IpPool {
    IpPool::with_config(PoolConfig::default().with_log_allocations(false))
}

/// Benchmark sequential issue until exhaustion
fn bench_sequential_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ip_allocation_sequential");

    for prefix in [24u8, 20, 16].iter() {
        let cidr = IpNet::from_str(&format!("10.100.0.0/{}", prefix)).unwrap();
        let capacity = cidr::max_hosts(&cidr).unwrap();

        group.throughput(Throughput::Elements(capacity));
        group.bench_with_input(BenchmarkId::new("prefix", prefix), prefix, |b, _| {
            b.iter(|| {
                let mut allocator = PrefixAllocator::new(&cidr).unwrap();
                let mut count = 0u64;
                while allocator.allocate().is_ok() {
                    count += 1;
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

/// Benchmark reuse from a fragmented free list
fn bench_fragmented_allocation(c: &mut Criterion) {
    let cidr = IpNet::from_str("10.100.0.0/20").unwrap();

    c.bench_function("ip_allocation_fragmented", |b| {
        b.iter_batched(
            || {
                // Setup: issue a block, release every other address
                let mut allocator = PrefixAllocator::new(&cidr).unwrap();
                let allocated: Vec<IpAddr> =
                    (0..2048).map(|_| allocator.allocate().unwrap()).collect();
                for ip in allocated.iter().step_by(2) {
                    allocator.release(*ip).unwrap();
                }
                allocator
            },
            |mut allocator| {
                let mut count = 0;
                for _ in 0..1024 {
                    if allocator.allocate().is_ok() {
                        count += 1;
                    }
                }
                black_box(count)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark releasing every issued address
fn bench_ip_release(c: &mut Criterion) {
    let cidr = IpNet::from_str("10.100.0.0/24").unwrap();

    c.bench_function("ip_release", |b| {
        b.iter_batched(
            || {
                let mut allocator = PrefixAllocator::new(&cidr).unwrap();
                let mut allocated = Vec::new();
                while let Ok(ip) = allocator.allocate() {
                    allocated.push(ip);
                }
                (allocator, allocated)
            },
            |(mut allocator, allocated)| {
                for ip in allocated {
                    allocator.release(ip).unwrap();
                }
                black_box(allocator.available_count())
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark request/release churn through the pool
fn bench_pool_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_churn");

    for cidr in ["10.100.0.0/16", "fd00::/64"] {
        let prefix = IpNet::from_str(cidr).unwrap();
        let pool = quiet_pool();
        pool.register_prefix(&prefix).unwrap();
        // Keep some addresses outstanding so the free list is not trivially empty
        for _ in 0..1024 {
            pool.request_ip(&prefix).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("prefix", cidr), &prefix, |b, prefix| {
            b.iter(|| {
                let ip = pool.request_ip(prefix).unwrap();
                pool.release_ip(prefix, ip).unwrap();
                black_box(ip)
            });
        });
    }

    group.finish();
}

/// Benchmark released-address lookups
fn bench_is_address_released(c: &mut Criterion) {
    let prefix = IpNet::from_str("10.100.0.0/24").unwrap();
    let pool = quiet_pool();
    pool.register_prefix(&prefix).unwrap();

    let issued: Vec<IpAddr> = (0..200).map(|_| pool.request_ip(&prefix).unwrap()).collect();
    for ip in issued.iter().step_by(3) {
        pool.release_ip(&prefix, *ip).unwrap();
    }

    c.bench_function("is_address_released", |b| {
        b.iter(|| {
            let released = issued
                .iter()
                .filter(|ip| pool.is_address_released(&prefix, **ip))
                .count();
            black_box(released)
        });
    });
}

/// Benchmark prefix registration
fn bench_register_prefix(c: &mut Criterion) {
    c.bench_function("register_prefix_256", |b| {
        b.iter(|| {
            let pool = quiet_pool();
            for i in 0..=255u8 {
                let prefix = IpNet::from_str(&format!("10.{}.0.0/24", i)).unwrap();
                pool.register_prefix(&prefix).unwrap();
            }
            black_box(pool.len())
        });
    });
}

criterion_group!(
    benches,
    bench_sequential_allocation,
    bench_fragmented_allocation,
    bench_ip_release,
    bench_pool_churn,
    bench_is_address_released,
    bench_register_prefix,
);

criterion_main!(benches);
