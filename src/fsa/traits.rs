//! Insertion and lookup contracts of the edit-tolerant trie
//!
//! Callers that only load entities use [`EntityAdd`]; callers that only query
//! use [`LookupIndex`]. [`EditTrie`](super::EditTrie) implements both.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::index::TrieIndex;
use super::EntityId;
use crate::error::Result;

/// Bulk loading of entities
///
/// A load is `begin_update`, any number of `add` calls, then `end_update`.
/// Starting a new load discards the previous content.
pub trait EntityAdd {
    /// Start a new load
    fn begin_update(&mut self) -> Result<()>;

    /// Add one entity; adding the same text twice is a no-op
    fn add(&mut self, entity: &str) -> Result<()>;

    /// Finish the load and make the trie searchable
    fn end_update(&mut self) -> Result<()>;

    /// Add every entity of an iterator
    fn add_all<I, S>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entity in entities {
            self.add(entity.as_ref())?;
        }
        Ok(())
    }
}

/// Edit-tolerant lookup
pub trait LookupIndex {
    /// Number of entities within edit distance `max_edit` of `query`
    fn lookup(&mut self, query: &str, max_edit: u32) -> Result<usize>;

    /// Entities within edit distance `max_edit` of `query`, closest first
    fn edit_lookup(
        &mut self,
        query: &str,
        max_edit: u32,
        max_matches: usize,
    ) -> Result<Vec<TrieMatch<'_>>>;
}

/// One lookup result; the token text is resolved from the trie on access
#[derive(Clone, Copy)]
pub struct TrieMatch<'a> {
    index: &'a TrieIndex,
    entity: EntityId,
    distance: u32,
}

impl<'a> TrieMatch<'a> {
    pub(crate) fn new(index: &'a TrieIndex, entity: EntityId, distance: u32) -> Self {
        Self {
            index,
            entity,
            distance,
        }
    }

    /// Matched entity text
    pub fn token(&self) -> &'a str {
        self.index.entity(self.entity).unwrap_or_default()
    }

    /// Edit distance between the query and the entity
    #[inline]
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Dense id of the matched entity
    #[inline]
    pub fn entity_id(&self) -> EntityId {
        self.entity
    }
}

impl fmt::Debug for TrieMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieMatch")
            .field("token", &self.token())
            .field("distance", &self.distance)
            .field("entity", &self.entity)
            .finish()
    }
}

impl PartialEq for TrieMatch<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && self.distance == other.distance
    }
}

impl Eq for TrieMatch<'_> {}

/// Shape and size of a finalized trie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieStats {
    /// Number of nodes, root included
    pub num_states: usize,
    /// Nodes stored with sorted edge arrays
    pub num_hi_sources: usize,
    /// Edges leaving hi sources
    pub num_hi_edges: usize,
    /// Nodes stored inside compressed chains
    pub num_lo_nodes: usize,
    /// Number of compressed chains
    pub num_chains: usize,
    /// Distinct entities
    pub num_entities: usize,
    /// Nodes carrying an output
    pub num_outputs: usize,
    /// Nodes with a cached descendant list
    pub num_cached_descendants: usize,
    /// Approximate heap footprint in bytes
    pub memory_usage: usize,
}

impl TrieStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Average number of children per hi source
    pub fn avg_hi_fanout(&self) -> f64 {
        if self.num_hi_sources == 0 {
            0.0
        } else {
            self.num_hi_edges as f64 / self.num_hi_sources as f64
        }
    }

    /// Bytes per stored entity
    pub fn bytes_per_entity(&self) -> f64 {
        if self.num_entities == 0 {
            0.0
        } else {
            self.memory_usage as f64 / self.num_entities as f64
        }
    }
}

/// Types that report [`TrieStats`]
pub trait StatisticsProvider {
    /// Get detailed statistics about the trie
    fn stats(&self) -> TrieStats;

    /// Get memory usage in bytes
    fn memory_usage(&self) -> usize {
        self.stats().memory_usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_ratios() {
        let stats = TrieStats {
            num_hi_sources: 4,
            num_hi_edges: 10,
            num_entities: 5,
            memory_usage: 500,
            ..TrieStats::new()
        };
        assert_eq!(stats.avg_hi_fanout(), 2.5);
        assert_eq!(stats.bytes_per_entity(), 100.0);
        assert_eq!(TrieStats::new().avg_hi_fanout(), 0.0);
        assert_eq!(TrieStats::new().bytes_per_entity(), 0.0);
    }

    #[test]
    fn test_stats_serde() {
        let stats = TrieStats {
            num_states: 12,
            num_entities: 3,
            ..TrieStats::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: TrieStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
