//! StringExtent: a `(buffer, start, len)` view over UTF-16 code units
//!
//! Extents share their backing buffer, so slicing and cloning an extent never
//! copies text. Buffers come from an [`ExtentAllocator`](super::ExtentAllocator),
//! which decides whether each extent gets its own buffer, reuses one scratch
//! buffer, or is bump-allocated out of a large block.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use super::allocator::ExtentAllocator;
use crate::error::{check_range, EditTrieError, Result};

/// Backing storage shared between extents
pub type SharedBuffer = Rc<[Cell<u16>]>;

/// Allocate a zeroed shared buffer of `len` code units
pub(crate) fn new_buffer(len: usize) -> SharedBuffer {
    Rc::from(vec![Cell::new(0u16); len])
}

/// Zero-copy view of a run of UTF-16 code units
///
/// # Examples
///
/// ```rust
/// use edit_trie::string::StringExtent;
///
/// let s = StringExtent::from_str("watcher  ");
/// let mut word = s.sub_extent(0, 7).unwrap();
/// assert!(word.eq_str("watcher"));
///
/// word.trim_end_matches(&['r' as u16, 'e' as u16]);
/// assert_eq!(word.to_string(), "watch");
/// ```
#[derive(Clone)]
pub struct StringExtent {
    buffer: SharedBuffer,
    start: usize,
    len: usize,
}

impl StringExtent {
    /// Maximum length of a single extent
    pub const MAX_LENGTH: usize = i32::MAX as usize;

    /// Create an extent over `buffer[start..start + len]`
    ///
    /// # Errors
    ///
    /// Fails if the range does not fit the buffer or exceeds [`Self::MAX_LENGTH`].
    pub fn new(buffer: SharedBuffer, start: usize, len: usize) -> Result<Self> {
        if start > Self::MAX_LENGTH || len > Self::MAX_LENGTH {
            return Err(EditTrieError::out_of_bounds(
                start.max(len),
                Self::MAX_LENGTH,
            ));
        }
        let end = start
            .checked_add(len)
            .ok_or_else(|| EditTrieError::out_of_bounds(start, buffer.len()))?;
        check_range(start, end, buffer.len())?;
        Ok(Self { buffer, start, len })
    }

    /// An extent of length zero
    pub fn empty() -> Self {
        Self {
            buffer: new_buffer(0),
            start: 0,
            len: 0,
        }
    }

    /// Copy a string into a fresh heap buffer
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        Self::from_units(&units)
    }

    /// Copy code units into a fresh heap buffer
    pub fn from_units(units: &[u16]) -> Self {
        let buffer: SharedBuffer = units.iter().copied().map(Cell::new).collect();
        let len = units.len();
        Self {
            buffer,
            start: 0,
            len,
        }
    }

    /// Length in code units
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the extent is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the extent in its buffer
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Code unit at `index`, relative to the extent start
    #[inline]
    pub fn get(&self, index: usize) -> Option<u16> {
        if index < self.len {
            Some(self.buffer[self.start + index].get())
        } else {
            None
        }
    }

    #[inline]
    fn cells(&self) -> &[Cell<u16>] {
        &self.buffer[self.start..self.start + self.len]
    }

    /// Iterate over the code units of the extent
    pub fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.cells().iter().map(Cell::get)
    }

    /// Copy the code units out into a vector
    pub fn to_units(&self) -> Vec<u16> {
        self.units().collect()
    }

    /// Decode to a `String`, replacing unpaired surrogates
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.to_units())
    }

    /// Overwrite the extent with `src`, which must have the same length
    pub fn copy_from_units(&self, src: &[u16]) -> Result<()> {
        if src.len() != self.len {
            return Err(EditTrieError::out_of_bounds(src.len(), self.len));
        }
        for (cell, &unit) in self.cells().iter().zip(src) {
            cell.set(unit);
        }
        Ok(())
    }

    /// View `len` code units starting at `start` (relative to this extent)
    ///
    /// # Errors
    ///
    /// Never clamps: a range past the end of this extent is an error.
    pub fn sub_extent(&self, start: usize, len: usize) -> Result<StringExtent> {
        let end = start
            .checked_add(len)
            .ok_or_else(|| EditTrieError::out_of_bounds(start, self.len))?;
        check_range(start, end, self.len)?;
        Ok(Self {
            buffer: Rc::clone(&self.buffer),
            start: self.start + start,
            len,
        })
    }

    /// Drop trailing code units contained in `set`
    pub fn trim_end_matches(&mut self, set: &[u16]) {
        while self.len > 0 && set.contains(&self.buffer[self.start + self.len - 1].get()) {
            self.len -= 1;
        }
    }

    /// Copy this extent into storage handed out by `allocator`
    pub fn clone_into<A: ExtentAllocator + ?Sized>(&self, allocator: &mut A) -> Result<StringExtent> {
        let clone = allocator.allocate(self.len)?;
        for (dst, src) in clone.cells().iter().zip(self.cells()) {
            dst.set(src.get());
        }
        Ok(clone)
    }

    /// Check whether two extents view the same buffer range
    pub fn same_range(&self, other: &StringExtent) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer) && self.start == other.start && self.len == other.len
    }

    /// Lexicographic comparison by code unit
    pub fn compare(&self, other: &StringExtent) -> Ordering {
        if self.same_range(other) {
            return Ordering::Equal;
        }
        self.units().cmp(other.units())
    }

    /// Lexicographic comparison against a string's UTF-16 encoding
    pub fn compare_str(&self, other: &str) -> Ordering {
        self.units().cmp(other.encode_utf16())
    }

    /// Check equality with a string
    pub fn eq_str(&self, other: &str) -> bool {
        self.compare_str(other) == Ordering::Equal
    }

    /// Approximate footprint of the viewed text plus the extent header
    pub fn memory_usage(&self) -> usize {
        self.len * mem::size_of::<u16>() + mem::size_of::<Self>()
    }
}

impl Default for StringExtent {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for StringExtent {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.compare(other) == Ordering::Equal
    }
}

impl Eq for StringExtent {}

impl PartialOrd for StringExtent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for StringExtent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for StringExtent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for unit in self.units() {
            state.write_u16(unit);
        }
    }
}

impl PartialEq<str> for StringExtent {
    fn eq(&self, other: &str) -> bool {
        self.eq_str(other)
    }
}

impl PartialEq<&str> for StringExtent {
    fn eq(&self, other: &&str) -> bool {
        self.eq_str(other)
    }
}

impl From<&str> for StringExtent {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl fmt::Debug for StringExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringExtent({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for StringExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::HeapAllocator;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(e: &StringExtent) -> u64 {
        let mut h = DefaultHasher::new();
        e.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_basic_view() {
        let s = StringExtent::from_str("hatch");
        assert_eq!(s.len(), 5);
        assert!(!s.is_empty());
        assert_eq!(s.get(0), Some('h' as u16));
        assert_eq!(s.get(5), None);
        assert_eq!(s.to_string(), "hatch");
        assert!(StringExtent::empty().is_empty());
    }

    #[test]
    fn test_new_checks_range() {
        let buffer = new_buffer(4);
        assert!(StringExtent::new(Rc::clone(&buffer), 1, 3).is_ok());
        assert!(StringExtent::new(Rc::clone(&buffer), 2, 3).is_err());
        assert!(StringExtent::new(buffer, usize::MAX, 1).is_err());
    }

    #[test]
    fn test_sub_extent_shares_buffer() {
        let s = StringExtent::from_str("matcher");
        let sub = s.sub_extent(1, 4).unwrap();
        assert_eq!(sub.to_string(), "atch");
        assert_eq!(sub.start(), 1);

        let nested = sub.sub_extent(1, 2).unwrap();
        assert_eq!(nested.to_string(), "tc");

        assert!(s.sub_extent(5, 3).is_err());
        assert!(sub.sub_extent(0, 5).is_err());
        assert!(s.sub_extent(7, 0).unwrap().is_empty());
    }

    #[test]
    fn test_equality_and_hash_follow_content() {
        let a = StringExtent::from_str("xxwatch");
        let b = StringExtent::from_str("watch");
        let a_tail = a.sub_extent(2, 5).unwrap();

        assert_eq!(a_tail, b);
        assert_eq!(hash_of(&a_tail), hash_of(&b));
        assert!(a_tail == "watch");
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering() {
        let match_ = StringExtent::from_str("match");
        let matcher = StringExtent::from_str("matcher");
        let watch = StringExtent::from_str("watch");

        assert_eq!(match_.compare(&matcher), Ordering::Less);
        assert_eq!(watch.compare(&matcher), Ordering::Greater);
        assert_eq!(match_.compare(&match_.clone()), Ordering::Equal);
        assert_eq!(matcher.compare_str("match"), Ordering::Greater);
        assert!(match_ < watch);
    }

    #[test]
    fn test_trim_end_matches() {
        let mut s = StringExtent::from_str("hatch.,,");
        s.trim_end_matches(&[',' as u16, '.' as u16]);
        assert_eq!(s.to_string(), "hatch");

        let mut all = StringExtent::from_str("...");
        all.trim_end_matches(&['.' as u16]);
        assert!(all.is_empty());
    }

    #[test]
    fn test_clone_into_copies() {
        let src = StringExtent::from_str("watcher");
        let mut heap = HeapAllocator::new();
        let copy = src.clone_into(&mut heap).unwrap();
        assert_eq!(copy, src);
        assert!(!copy.same_range(&src));
    }

    #[test]
    fn test_copy_from_units_length_checked() {
        let mut heap = HeapAllocator::new();
        let e = heap.allocate(3).unwrap();
        e.copy_from_units(&[97, 98, 99]).unwrap();
        assert_eq!(e.to_string(), "abc");
        assert!(e.copy_from_units(&[1, 2]).is_err());
    }

    #[test]
    fn test_non_ascii_units() {
        let s = StringExtent::from_str("café");
        assert_eq!(s.len(), 4);
        assert!(s.eq_str("café"));
        assert!(s.memory_usage() >= 8);
    }
}
