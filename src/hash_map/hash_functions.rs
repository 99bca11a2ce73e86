//! Integer hash mixing and bucket sizing for the compact tables
//!
//! The compact tables index buckets with `hash & mask`, so the hash has to
//! spread low-entropy integer keys (dense node ids, small code units) across
//! all bits. A Jenkins-style 32-bit avalanche mix does this cheaply.

use crate::error::{EditTrieError, Result};

/// Growth factor between the suggested capacity and the bucket count
pub const GROWTH_FACTOR: usize = 2;

/// Largest bucket count a compact table accepts (2^31)
pub const MAX_BUCKETS: usize = 1 << 31;

/// Jenkins-style 32-bit avalanche mix
#[inline]
pub fn jenkins_mix32(mut key: u32) -> u32 {
    key = key.wrapping_add(!(key << 15));
    key ^= key >> 10;
    key = key.wrapping_add(key << 3);
    key ^= key >> 6;
    key = key.wrapping_add(!(key << 11));
    key ^= key >> 16;
    key
}

/// Hash a single integer key
#[inline]
pub fn hash_int(key: u32) -> u32 {
    jenkins_mix32(key)
}

/// Hash a pair of integer keys; the second key is folded into the running hash
#[inline]
pub fn hash_int_pair(key1: u32, key2: u32) -> u32 {
    jenkins_mix32(jenkins_mix32(key1).wrapping_add(key2))
}

/// Compute the bucket mask for a table sized from `suggested_capacity`
///
/// The bucket count is the next power of two at or above
/// `GROWTH_FACTOR * suggested_capacity` (minimum 2), so the mask is
/// `bucket_count - 1`.
///
/// # Errors
///
/// Returns [`EditTrieError::CapacityOverflow`] when the bucket count would
/// exceed [`MAX_BUCKETS`].
pub fn bucket_mask(suggested_capacity: usize) -> Result<usize> {
    let min_buckets = suggested_capacity
        .checked_mul(GROWTH_FACTOR)
        .ok_or_else(|| EditTrieError::capacity_overflow(suggested_capacity))?
        .max(2);

    if min_buckets > MAX_BUCKETS {
        return Err(EditTrieError::capacity_overflow(suggested_capacity));
    }

    Ok(min_buckets.next_power_of_two() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mix_is_deterministic() {
        assert_eq!(jenkins_mix32(12345), jenkins_mix32(12345));
        assert_eq!(hash_int_pair(7, 97), hash_int_pair(7, 97));
    }

    #[test]
    fn test_pair_hash_is_order_sensitive() {
        assert_ne!(hash_int_pair(1, 2), hash_int_pair(2, 1));
    }

    #[test]
    fn test_dense_keys_spread_over_buckets() {
        let mask = bucket_mask(512).unwrap();
        let buckets: HashSet<u32> = (0u32..512).map(|k| hash_int(k) & mask as u32).collect();
        // A poor hash of dense keys would pile onto few buckets.
        assert!(buckets.len() > 300, "only {} distinct buckets", buckets.len());
    }

    #[test]
    fn test_bucket_mask_sizes() {
        assert_eq!(bucket_mask(0).unwrap(), 1);
        assert_eq!(bucket_mask(1).unwrap(), 1);
        assert_eq!(bucket_mask(3).unwrap(), 7);
        assert_eq!(bucket_mask(4).unwrap(), 7);
        assert_eq!(bucket_mask(1000).unwrap(), 2047);
        assert_eq!(bucket_mask(1_000_000).unwrap(), (1 << 21) - 1);
    }

    #[test]
    fn test_bucket_mask_overflow() {
        assert!(matches!(
            bucket_mask(usize::MAX),
            Err(EditTrieError::CapacityOverflow { .. })
        ));
        assert!(bucket_mask(MAX_BUCKETS / 2).is_ok());
        assert!(bucket_mask(MAX_BUCKETS / 2 + 1).is_err());
    }
}
