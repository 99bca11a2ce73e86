//! Allocation policies for [`StringExtent`] storage
//!
//! Three strategies share the [`ExtentAllocator`] trait:
//!
//! - [`HeapAllocator`]: one fresh buffer per extent
//! - [`ReusableBuffer`]: a single scratch buffer handed out again on every call
//! - [`ZoneAllocator`]: bump allocation out of fixed-size blocks, recycled on `reset`
//!
//! The reusable and zone policies hand out storage that later allocations may
//! overwrite. Callers must stop reading an extent from a [`ReusableBuffer`]
//! once they allocate again, and must stop reading zone extents after
//! [`ZoneAllocator::reset`].

use std::mem;
use std::rc::Rc;

use super::extent::{new_buffer, SharedBuffer, StringExtent};
use crate::error::{EditTrieError, Result};

/// Default zone block size in code units
pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;

/// Source of [`StringExtent`] storage
pub trait ExtentAllocator {
    /// Hand out an extent of `len` code units; contents are unspecified
    fn allocate(&mut self, len: usize) -> Result<StringExtent>;

    /// Allocate an extent holding a copy of `src`
    fn allocate_from(&mut self, src: &[u16]) -> Result<StringExtent> {
        let extent = self.allocate(src.len())?;
        extent.copy_from_units(src)?;
        Ok(extent)
    }

    /// Allocate an extent holding the UTF-16 encoding of `s`
    fn allocate_str(&mut self, s: &str) -> Result<StringExtent> {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.allocate_from(&units)
    }
}

/// Allocator that gives every extent its own buffer
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl HeapAllocator {
    /// Create a heap allocator
    pub fn new() -> Self {
        Self
    }
}

impl ExtentAllocator for HeapAllocator {
    fn allocate(&mut self, len: usize) -> Result<StringExtent> {
        StringExtent::new(new_buffer(len), 0, len)
    }
}

/// Single growable buffer reused by every allocation
///
/// Each call returns an extent at offset 0 of the same buffer, so the
/// previous extent is clobbered by the next allocation.
#[derive(Debug, Default)]
pub struct ReusableBuffer {
    buffer: Option<SharedBuffer>,
}

impl ReusableBuffer {
    /// Create an empty reusable buffer
    pub fn new() -> Self {
        Self { buffer: None }
    }

    /// Current buffer capacity in code units
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len())
    }

    /// Make sure the buffer holds at least `len` code units
    pub fn resize(&mut self, len: usize) {
        if self.capacity() < len {
            self.buffer = Some(new_buffer(len));
        }
    }
}

impl ExtentAllocator for ReusableBuffer {
    fn allocate(&mut self, len: usize) -> Result<StringExtent> {
        self.resize(len);
        match &self.buffer {
            Some(buffer) => StringExtent::new(Rc::clone(buffer), 0, len),
            None => Ok(StringExtent::empty()),
        }
    }
}

/// Bump allocator over fixed-size blocks
///
/// No block is allocated until the first non-empty request.
///
/// # Examples
///
/// ```rust
/// use edit_trie::string::{ExtentAllocator, ZoneAllocator};
///
/// let mut zone = ZoneAllocator::with_block_size(8).unwrap();
/// let a = zone.allocate_str("hat").unwrap();
/// let b = zone.allocate_str("watch").unwrap();
/// assert_eq!(a.to_string(), "hat");
/// assert_eq!(b.to_string(), "watch");
/// assert_eq!(zone.block_count(), 1);
///
/// assert!(zone.allocate(9).is_err());
/// ```
#[derive(Debug)]
pub struct ZoneAllocator {
    block_size: usize,
    current: Option<SharedBuffer>,
    used: Vec<SharedBuffer>,
    free: Vec<SharedBuffer>,
    pos: usize,
    memory_usage: usize,
}

impl ZoneAllocator {
    /// Create a zone with the default block size
    pub fn new() -> Self {
        Self::build(DEFAULT_BLOCK_SIZE)
    }

    /// Create a zone with a custom block size
    ///
    /// # Errors
    ///
    /// Fails if `block_size` is zero or larger than [`StringExtent::MAX_LENGTH`].
    pub fn with_block_size(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(EditTrieError::invalid_data("zone block size must be non-zero"));
        }
        if block_size > StringExtent::MAX_LENGTH {
            return Err(EditTrieError::out_of_bounds(
                block_size,
                StringExtent::MAX_LENGTH,
            ));
        }
        Ok(Self::build(block_size))
    }

    fn build(block_size: usize) -> Self {
        Self {
            block_size,
            current: None,
            used: Vec::new(),
            free: Vec::new(),
            pos: 0,
            memory_usage: 0,
        }
    }

    #[inline]
    fn block_bytes(block_size: usize) -> usize {
        block_size * mem::size_of::<u16>() + mem::size_of::<SharedBuffer>()
    }

    fn next_block(&mut self) {
        let block = match self.free.pop() {
            Some(block) => block,
            None => {
                self.memory_usage += Self::block_bytes(self.block_size);
                new_buffer(self.block_size)
            }
        };
        if let Some(full) = self.current.replace(block) {
            self.used.push(full);
        }
        self.pos = 0;
    }

    /// Recycle every block onto the free list and start over
    ///
    /// Extents handed out before the reset may be overwritten afterwards.
    pub fn reset(&mut self) {
        self.free.append(&mut self.used);
        self.pos = 0;
    }

    /// Block size in code units
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks currently holding allocations (including the open one)
    pub fn block_count(&self) -> usize {
        self.used.len() + usize::from(self.current.is_some())
    }

    /// Number of recycled blocks waiting for reuse
    pub fn free_block_count(&self) -> usize {
        self.free.len()
    }

    /// Bytes owned by the zone, including recycled blocks
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }
}

impl Default for ZoneAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtentAllocator for ZoneAllocator {
    fn allocate(&mut self, len: usize) -> Result<StringExtent> {
        if len > self.block_size {
            return Err(EditTrieError::out_of_bounds(len, self.block_size));
        }
        if len == 0 {
            return Ok(StringExtent::empty());
        }
        if self.current.is_none() || self.pos + len > self.block_size {
            self.next_block();
        }
        let start = self.pos;
        self.pos += len;
        match &self.current {
            Some(block) => StringExtent::new(Rc::clone(block), start, len),
            None => Err(EditTrieError::invalid_data("zone has no open block")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_allocations_are_independent() {
        let mut heap = HeapAllocator::new();
        let a = heap.allocate_str("match").unwrap();
        let b = heap.allocate_str("watch").unwrap();
        assert_eq!(a.to_string(), "match");
        assert_eq!(b.to_string(), "watch");
        assert!(!a.same_range(&b));
    }

    #[test]
    fn test_reusable_buffer_grows_and_clobbers() {
        let mut scratch = ReusableBuffer::new();
        assert_eq!(scratch.capacity(), 0);

        let first = scratch.allocate_str("hatch").unwrap();
        assert_eq!(first.to_string(), "hatch");
        assert_eq!(scratch.capacity(), 5);

        let second = scratch.allocate_str("cat").unwrap();
        assert_eq!(second.to_string(), "cat");
        assert_eq!(scratch.capacity(), 5);
        // Same storage: the earlier view now sees the new text.
        assert_eq!(first.to_string(), "catch");

        scratch.allocate(12).unwrap();
        assert_eq!(scratch.capacity(), 12);
        assert!(scratch.allocate(0).unwrap().is_empty());
    }

    #[test]
    fn test_zone_bump_and_block_rollover() {
        let mut zone = ZoneAllocator::with_block_size(6).unwrap();
        let a = zone.allocate_str("abcd").unwrap();
        assert_eq!(zone.block_count(), 1);

        let b = zone.allocate_str("efg").unwrap();
        assert_eq!(zone.block_count(), 2);
        assert_eq!(b.start(), 0);

        let c = zone.allocate_str("hi").unwrap();
        assert_eq!(c.start(), 3);

        assert_eq!(a.to_string(), "abcd");
        assert_eq!(b.to_string(), "efg");
        assert_eq!(c.to_string(), "hi");
    }

    #[test]
    fn test_zone_opens_first_block_lazily() {
        let mut zone = ZoneAllocator::new();
        assert_eq!(zone.block_count(), 0);
        assert_eq!(zone.memory_usage(), 0);

        assert!(zone.allocate(0).unwrap().is_empty());
        assert_eq!(zone.block_count(), 0);
        assert_eq!(zone.memory_usage(), 0);

        let run = zone.allocate_str("ab").unwrap();
        assert_eq!(run.to_string(), "ab");
        assert_eq!(zone.block_count(), 1);
        assert!(zone.memory_usage() >= DEFAULT_BLOCK_SIZE * 2);

        zone.reset();
        assert_eq!(zone.block_count(), 1);
        assert_eq!(zone.free_block_count(), 0);
    }

    #[test]
    fn test_zone_rejects_oversize() {
        let mut zone = ZoneAllocator::with_block_size(4).unwrap();
        assert!(matches!(
            zone.allocate(5),
            Err(EditTrieError::OutOfBounds { index: 5, size: 4 })
        ));
        assert!(zone.allocate(4).is_ok());
        assert!(ZoneAllocator::with_block_size(0).is_err());
    }

    #[test]
    fn test_zone_reset_recycles_blocks() {
        let mut zone = ZoneAllocator::with_block_size(4).unwrap();
        for _ in 0..5 {
            zone.allocate(3).unwrap();
        }
        assert_eq!(zone.block_count(), 5);
        let usage = zone.memory_usage();

        zone.reset();
        assert_eq!(zone.block_count(), 1);
        assert_eq!(zone.free_block_count(), 4);

        for _ in 0..5 {
            zone.allocate(3).unwrap();
        }
        assert_eq!(zone.free_block_count(), 0);
        assert_eq!(zone.memory_usage(), usage);
    }

    #[test]
    fn test_clone_into_zone() {
        let src = StringExtent::from_str("watcher");
        let mut zone = ZoneAllocator::new();
        let copy = src.clone_into(&mut zone).unwrap();
        assert_eq!(copy, src);
        assert_eq!(zone.block_size(), DEFAULT_BLOCK_SIZE);
    }
}
