//! Fixed-capacity integer hash tables with generation-stamped slots
//!
//! Each bucket holds exactly one `(key, value, stamp)` slot. A slot is live
//! only while its stamp equals the table's current generation, so
//! [`CompactHashTable::clear`] is a counter increment instead of a wipe.
//! Keys that land on a live bucket owned by a different key go to a fallback
//! map. The bucket array is sized once and never rehashed.
//!
//! # Examples
//!
//! ```rust
//! use edit_trie::hash_map::{IntHashTable, IntPairHashTable};
//!
//! let mut goto = IntPairHashTable::new(1024).unwrap();
//! goto.add((0, 'a' as u32), 1).unwrap();
//! assert_eq!(goto.try_get(&(0, 'a' as u32)), Some(1));
//!
//! let mut seen = IntHashTable::new(16).unwrap();
//! seen.add(42, 1).unwrap();
//! seen.clear();
//! assert!(!seen.contains_key(&42));
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;

use ahash::AHashMap;

use super::hash_functions::{bucket_mask, hash_int, hash_int_pair};
use crate::error::{EditTrieError, Result};

/// Key types accepted by [`CompactHashTable`]
pub trait TableKey: Copy + Eq + Hash + Default + fmt::Debug {
    /// 32-bit avalanche hash used to pick the bucket
    fn table_hash(&self) -> u32;
}

impl TableKey for u32 {
    #[inline]
    fn table_hash(&self) -> u32 {
        hash_int(*self)
    }
}

impl TableKey for (u32, u32) {
    #[inline]
    fn table_hash(&self) -> u32 {
        hash_int_pair(self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot<K, V> {
    key: K,
    value: V,
    stamp: u32,
}

/// Open-addressed table with single-slot buckets and O(1) clear
pub struct CompactHashTable<K: TableKey, V: Copy + Default = u32> {
    buckets: Vec<Slot<K, V>>,
    mask: usize,
    generation: u32,
    fallback: AHashMap<K, V>,
    len: usize,
}

/// `u32 -> u32` table
pub type IntHashTable = CompactHashTable<u32>;

/// `(u32, u32) -> u32` table
pub type IntPairHashTable = CompactHashTable<(u32, u32)>;

impl<K: TableKey, V: Copy + Default> CompactHashTable<K, V> {
    /// Create a table with room for roughly `suggested_capacity` keys
    ///
    /// # Errors
    ///
    /// Fails with [`EditTrieError::CapacityOverflow`] if the bucket count
    /// cannot be represented.
    pub fn new(suggested_capacity: usize) -> Result<Self> {
        let mask = bucket_mask(suggested_capacity)?;
        Ok(Self {
            buckets: vec![Slot::default(); mask + 1],
            mask,
            generation: 1,
            fallback: AHashMap::new(),
            len: 0,
        })
    }

    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        key.table_hash() as usize & self.mask
    }

    #[inline]
    fn is_live(&self, bucket: usize) -> bool {
        self.buckets[bucket].stamp == self.generation
    }

    /// Insert a new key
    ///
    /// # Errors
    ///
    /// Returns [`EditTrieError::DuplicateKey`] if the key is already present,
    /// whether it lives in its bucket or in the fallback map.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        let bucket = self.bucket_of(&key);

        if !self.is_live(bucket) {
            self.buckets[bucket] = Slot {
                key,
                value,
                stamp: self.generation,
            };
        } else if self.buckets[bucket].key == key {
            return Err(EditTrieError::duplicate_key(key));
        } else {
            match self.fallback.entry(key) {
                std::collections::hash_map::Entry::Occupied(_) => {
                    return Err(EditTrieError::duplicate_key(key));
                }
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }

        self.len += 1;
        Ok(())
    }

    /// Insert the key or overwrite its value
    pub fn set(&mut self, key: K, value: V) {
        let bucket = self.bucket_of(&key);

        if !self.is_live(bucket) {
            self.buckets[bucket] = Slot {
                key,
                value,
                stamp: self.generation,
            };
            self.len += 1;
        } else if self.buckets[bucket].key == key {
            self.buckets[bucket].value = value;
        } else if self.fallback.insert(key, value).is_none() {
            self.len += 1;
        }
    }

    /// Overwrite the value of a key that is already present
    ///
    /// Returns `false` (and changes nothing) if the key is absent.
    pub fn update(&mut self, key: K, value: V) -> bool {
        let bucket = self.bucket_of(&key);

        if !self.is_live(bucket) {
            return false;
        }
        if self.buckets[bucket].key == key {
            self.buckets[bucket].value = value;
            return true;
        }
        match self.fallback.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Look up a key
    #[inline]
    pub fn try_get(&self, key: &K) -> Option<V> {
        let bucket = self.bucket_of(key);

        if !self.is_live(bucket) {
            return None;
        }
        if self.buckets[bucket].key == *key {
            return Some(self.buckets[bucket].value);
        }
        self.fallback.get(key).copied()
    }

    /// Look up a key that must be present
    ///
    /// # Errors
    ///
    /// Returns [`EditTrieError::InvalidData`] if the key is absent.
    pub fn get(&self, key: &K) -> Result<V> {
        self.try_get(key)
            .ok_or_else(|| EditTrieError::invalid_data(format!("key {:?} not present", key)))
    }

    /// Check whether a key is present
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.try_get(key).is_some()
    }

    /// Logically remove every key
    ///
    /// Bumps the generation so all slots become stale. The stamps are only
    /// rewritten when the generation counter wraps.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);

        if self.generation == u32::MAX || self.generation == 0 {
            for slot in &mut self.buckets {
                slot.stamp = 0;
            }
            self.generation = 1;
        }

        self.fallback.clear();
        self.len = 0;
    }

    /// Number of live keys
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table holds no live keys
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of keys currently held by the fallback map
    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }

    /// Approximate heap footprint in bytes
    pub fn memory_usage(&self) -> usize {
        self.buckets.len() * mem::size_of::<Slot<K, V>>()
            + self.fallback.len() * (mem::size_of::<K>() + mem::size_of::<V>())
    }
}

impl<K: TableKey, V: Copy + Default + fmt::Debug> fmt::Debug for CompactHashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactHashTable")
            .field("len", &self.len)
            .field("buckets", &self.buckets.len())
            .field("fallback", &self.fallback.len())
            .field("generation", &self.generation)
            .finish()
    }
}
