//! Immutable lookup-time representation of a finalized trie

use std::mem;

use ahash::AHashMap;

use super::child_store::{Children, TrieChildStore};
use super::traits::{StatisticsProvider, TrieStats};
use super::{EntityId, Label, NodeId};

/// Flattened trie: child transitions, outputs, descendant cache and entity text
///
/// Produced by [`TrieBuildState::finalize`](super::TrieBuildState::finalize)
/// and never mutated afterwards, so any number of
/// [`TrieCursor`](super::TrieCursor)s may read it at once.
#[derive(Debug, Clone)]
pub struct TrieIndex {
    store: TrieChildStore,
    outputs: Vec<(NodeId, EntityId)>,
    descendants: AHashMap<NodeId, Box<[EntityId]>>,
    entity_text: String,
    entity_offsets: Vec<u32>,
    num_chains: usize,
}

impl TrieIndex {
    pub(crate) fn from_parts(
        store: TrieChildStore,
        outputs: Vec<(NodeId, EntityId)>,
        descendants: AHashMap<NodeId, Box<[EntityId]>>,
        entity_text: String,
        entity_offsets: Vec<u32>,
        num_chains: usize,
    ) -> Self {
        debug_assert!(outputs.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(!entity_offsets.is_empty());
        Self {
            store,
            outputs,
            descendants,
            entity_text,
            entity_offsets,
            num_chains,
        }
    }

    /// Number of nodes
    #[inline]
    pub fn num_states(&self) -> usize {
        self.store.num_states()
    }

    /// Number of distinct entities
    #[inline]
    pub fn num_entities(&self) -> usize {
        self.entity_offsets.len().saturating_sub(1)
    }

    /// Entity whose full text ends at `node`
    #[inline]
    pub fn output(&self, node: NodeId) -> Option<EntityId> {
        self.outputs
            .binary_search_by_key(&node, |&(n, _)| n)
            .ok()
            .map(|idx| self.outputs[idx].1)
    }

    /// Text of entity `id`
    pub fn entity(&self, id: EntityId) -> Option<&str> {
        let id = id as usize;
        let start = *self.entity_offsets.get(id)? as usize;
        let end = *self.entity_offsets.get(id + 1)? as usize;
        self.entity_text.get(start..end)
    }

    /// Iterate `(id, text)` over all entities in id order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &str)> + '_ {
        self.entity_offsets
            .windows(2)
            .enumerate()
            .map(move |(id, w)| (id as EntityId, &self.entity_text[w[0] as usize..w[1] as usize]))
    }

    /// Child of `node` along `label`
    #[inline]
    pub fn find_target(&self, node: NodeId, label: Label) -> Option<NodeId> {
        self.store.find_target(node, label)
    }

    /// Children of `node`
    #[inline]
    pub fn children(&self, node: NodeId) -> Children<'_> {
        self.store.children(node)
    }

    /// Cached descendant entities of `node`, present only for nodes with a full list
    #[inline]
    pub fn cached_descendants(&self, node: NodeId) -> Option<&[EntityId]> {
        self.descendants.get(&node).map(|d| &d[..])
    }

    /// Node reached by following `text` exactly from the root
    pub fn walk(&self, text: &str) -> Option<NodeId> {
        text.encode_utf16()
            .try_fold(0, |node, unit| self.find_target(node, unit))
    }

    /// Underlying child-transition store
    pub fn child_store(&self) -> &TrieChildStore {
        &self.store
    }
}

impl StatisticsProvider for TrieIndex {
    fn stats(&self) -> TrieStats {
        let descendant_bytes: usize = self
            .descendants
            .values()
            .map(|d| d.len() * mem::size_of::<EntityId>() + mem::size_of::<NodeId>())
            .sum();
        TrieStats {
            num_states: self.store.num_states(),
            num_hi_sources: self.store.num_hi_sources(),
            num_hi_edges: self.store.num_hi_edges(),
            num_lo_nodes: self.store.num_lo_nodes(),
            num_chains: self.num_chains,
            num_entities: self.num_entities(),
            num_outputs: self.outputs.len(),
            num_cached_descendants: self.descendants.len(),
            memory_usage: self.store.memory_usage()
                + self.outputs.len() * mem::size_of::<(NodeId, EntityId)>()
                + descendant_bytes
                + self.entity_text.len()
                + self.entity_offsets.len() * mem::size_of::<u32>(),
        }
    }
}
