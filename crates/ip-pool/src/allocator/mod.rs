//! Address allocation modules
//!
//! Provides:
//! - The free list of released host offsets
//! - Per-prefix allocation (sequential issue plus max-first reuse)

mod free_list;
mod prefix_allocator;

pub use free_list::FreeList;
pub use prefix_allocator::{IpAllocator, PrefixAllocator};
