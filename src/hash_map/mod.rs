//! Compact integer hash tables
//!
//! This module provides the fixed-capacity tables the trie builder and the
//! lookup frontiers lean on:
//! - `IntHashTable`: `u32 -> u32` with O(1) logical clear
//! - `IntPairHashTable`: `(u32, u32) -> u32`, used as the build-time transition function
//!
//! Both are instances of [`CompactHashTable`]: single-slot buckets, a
//! generation stamp per slot, and a fallback map for colliding keys.

mod compact_table;
mod hash_functions;

pub use compact_table::{CompactHashTable, IntHashTable, IntPairHashTable, TableKey};
pub use hash_functions::{
    bucket_mask, hash_int, hash_int_pair, jenkins_mix32, GROWTH_FACTOR, MAX_BUCKETS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let mut single = IntHashTable::new(16).unwrap();
        single.add(1, 2).unwrap();
        assert_eq!(single.try_get(&1), Some(2));

        let mut pair = IntPairHashTable::new(16).unwrap();
        pair.add((1, 2), 3).unwrap();
        assert_eq!(pair.try_get(&(1, 2)), Some(3));

        assert_eq!(bucket_mask(16).unwrap(), 31);
        assert_ne!(hash_int(1), hash_int(2));
    }
}
