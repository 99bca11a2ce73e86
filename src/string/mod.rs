//! Zero-copy string extents and their allocators
//!
//! A [`StringExtent`] is a `(buffer, start, len)` view over UTF-16 code
//! units. The trie builder uses extents for chain fragments so the label runs
//! of many chains can share a handful of large zone blocks.

mod allocator;
mod extent;

pub use allocator::{
    ExtentAllocator, HeapAllocator, ReusableBuffer, ZoneAllocator, DEFAULT_BLOCK_SIZE,
};
pub use extent::{SharedBuffer, StringExtent};
