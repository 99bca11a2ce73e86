//! Build-time trie state and finalization
//!
//! While loading, the trie is a plain tree grown one code unit at a time: the
//! transition function lives in an [`IntPairHashTable`] keyed by
//! `(node, label)`, and every node keeps the list of labels it branches on.
//! [`TrieBuildState::finalize`] consumes all of this and produces a
//! [`TrieIndex`]:
//!
//! 1. mark chains: a node is a chain node if it has at most one child and
//!    every child is a chain node (the root never is)
//! 2. number non-chain (hi) nodes first, in preorder
//! 3. number each maximal chain contiguously, top to bottom
//! 4. rebuild outputs and the descendant cache under the new ids
//! 5. write hi edges and chain label runs into a [`TrieChildStore`]

use ahash::{AHashMap, AHashSet};

use super::child_store::{ChildStoreBuilder, CHAIN_SENTINEL};
use super::index::TrieIndex;
use super::{EntityId, Label, NodeId};
use crate::config::TrieConfig;
use crate::error::{EditTrieError, Result};
use crate::hash_map::IntPairHashTable;
use crate::string::{ExtentAllocator, HeapAllocator, StringExtent, ZoneAllocator};

const UNASSIGNED: NodeId = NodeId::MAX;

/// Mutable trie under construction
#[derive(Debug)]
pub struct TrieBuildState {
    top_l: usize,
    zone_block_size: usize,
    goto: IntPairHashTable,
    child_labels: Vec<Vec<Label>>,
    outputs: Vec<Option<EntityId>>,
    descendants: Vec<Vec<EntityId>>,
    entity_text: String,
    entity_offsets: Vec<u32>,
    dup_checker: AHashSet<Box<str>>,
}

impl TrieBuildState {
    /// Create an empty build state holding only the root
    pub fn new(config: &TrieConfig) -> Result<Self> {
        Ok(Self {
            top_l: config.top_l,
            zone_block_size: config.zone_block_size,
            goto: IntPairHashTable::new(config.build_capacity)?,
            child_labels: vec![Vec::new()],
            outputs: vec![None],
            descendants: vec![Vec::new()],
            entity_text: String::new(),
            entity_offsets: vec![0],
            dup_checker: AHashSet::new(),
        })
    }

    /// Number of nodes so far
    #[inline]
    pub fn num_states(&self) -> usize {
        self.child_labels.len()
    }

    /// Number of distinct entities so far
    #[inline]
    pub fn num_entities(&self) -> usize {
        self.entity_offsets.len() - 1
    }

    /// Follow `(state, label)`, creating the child if it does not exist yet
    fn goto_or_insert(&mut self, state: NodeId, label: Label) -> Result<NodeId> {
        let key = (state, label as u32);
        if let Some(next) = self.goto.try_get(&key) {
            return Ok(next);
        }

        let next = self.num_states();
        if next >= UNASSIGNED as usize {
            return Err(EditTrieError::capacity_overflow(next));
        }
        let next = next as NodeId;
        self.goto.add(key, next)?;
        self.child_labels[state as usize].push(label);
        self.child_labels.push(Vec::new());
        self.outputs.push(None);
        self.descendants.push(Vec::new());
        Ok(next)
    }

    /// Insert an entity
    ///
    /// Returns `Ok(false)` if the exact text was already added.
    ///
    /// # Errors
    ///
    /// Fails if the text contains the reserved chain sentinel, or if its end
    /// node already carries an output.
    pub fn add(&mut self, entity: &str) -> Result<bool> {
        if self.dup_checker.contains(entity) {
            return Ok(false);
        }
        if entity.encode_utf16().any(|u| u == CHAIN_SENTINEL) {
            return Err(EditTrieError::invalid_data(format!(
                "entity {:?} contains reserved code unit U+FFFF",
                entity
            )));
        }
        let entity_id = self.num_entities();
        let end_offset = self.entity_text.len() + entity.len();
        if entity_id >= EntityId::MAX as usize || end_offset > u32::MAX as usize {
            return Err(EditTrieError::capacity_overflow(entity_id));
        }
        let entity_id = entity_id as EntityId;

        let mut state: NodeId = 0;
        for unit in entity.encode_utf16() {
            state = self.goto_or_insert(state, unit)?;
            let list = &mut self.descendants[state as usize];
            if list.len() < self.top_l {
                list.push(entity_id);
            }
        }

        let slot = &mut self.outputs[state as usize];
        if slot.is_some() {
            return Err(EditTrieError::trie("Output size exceeded 1"));
        }
        *slot = Some(entity_id);

        self.entity_text.push_str(entity);
        self.entity_offsets.push(end_offset as u32);
        self.dup_checker.insert(entity.into());
        Ok(true)
    }

    #[inline]
    fn child(&self, state: NodeId, label: Label) -> Result<NodeId> {
        self.goto.try_get(&(state, label as u32)).ok_or_else(|| {
            EditTrieError::trie(format!("missing transition ({}, {})", state, label))
        })
    }

    /// Chain flags, computed children-first over a preorder listing
    fn mark_chains(&self) -> Result<Vec<bool>> {
        let n = self.num_states();
        let mut preorder = Vec::with_capacity(n);
        let mut stack = vec![0 as NodeId];
        while let Some(state) = stack.pop() {
            preorder.push(state);
            for &label in self.child_labels[state as usize].iter().rev() {
                stack.push(self.child(state, label)?);
            }
        }
        if preorder.len() != n {
            return Err(EditTrieError::trie(format!(
                "trie walk reached {} of {} nodes",
                preorder.len(),
                n
            )));
        }

        let mut is_chain = vec![false; n];
        for &state in preorder.iter().rev() {
            let labels = &self.child_labels[state as usize];
            is_chain[state as usize] = match labels.as_slice() {
                [] => true,
                [label] => is_chain[self.child(state, *label)? as usize],
                _ => false,
            };
        }
        is_chain[0] = false;
        Ok(is_chain)
    }

    /// Consume the build state and produce the immutable lookup index
    pub fn finalize(self) -> Result<TrieIndex> {
        let n = self.num_states();
        let is_chain = self.mark_chains()?;

        let mut old_to_new = vec![UNASSIGNED; n];
        let mut new_to_old: Vec<NodeId> = Vec::with_capacity(n);

        // Hi nodes in preorder; chain children of hi nodes are chain heads.
        let mut chain_heads = Vec::new();
        let mut num_hi_edges = 0usize;
        let mut stack = vec![0 as NodeId];
        while let Some(state) = stack.pop() {
            old_to_new[state as usize] = new_to_old.len() as NodeId;
            new_to_old.push(state);

            let labels = &self.child_labels[state as usize];
            num_hi_edges += labels.len();
            for &label in labels {
                let child = self.child(state, label)?;
                if is_chain[child as usize] {
                    chain_heads.push(child);
                }
            }
            for &label in labels.iter().rev() {
                let child = self.child(state, label)?;
                if !is_chain[child as usize] {
                    stack.push(child);
                }
            }
        }
        let num_hi_sources = new_to_old.len();

        // Each chain takes a contiguous id range; its label run goes to the zone.
        let mut zone = ZoneAllocator::with_block_size(self.zone_block_size)?;
        let mut heap = HeapAllocator::new();
        let mut runs: Vec<(NodeId, StringExtent)> = Vec::with_capacity(chain_heads.len());
        let mut run_labels: Vec<Label> = Vec::new();
        for &head in &chain_heads {
            let first = new_to_old.len() as NodeId;
            run_labels.clear();
            let mut state = head;
            loop {
                old_to_new[state as usize] = new_to_old.len() as NodeId;
                new_to_old.push(state);
                match self.child_labels[state as usize].first() {
                    Some(&label) => {
                        run_labels.push(label);
                        state = self.child(state, label)?;
                    }
                    None => break,
                }
            }
            let run = if run_labels.len() <= zone.block_size() {
                zone.allocate_from(&run_labels)?
            } else {
                heap.allocate_from(&run_labels)?
            };
            runs.push((first, run));
        }

        if new_to_old.len() != n {
            return Err(EditTrieError::trie(format!(
                "renumbering covered {} of {} nodes",
                new_to_old.len(),
                n
            )));
        }

        let mut store = ChildStoreBuilder::new(n, num_hi_sources, num_hi_edges)?;
        let mut sorted_labels: Vec<Label> = Vec::new();
        for (new_id, &old) in new_to_old[..num_hi_sources].iter().enumerate() {
            let new_id = new_id as NodeId;
            store.begin_hi_source(new_id)?;
            sorted_labels.clear();
            sorted_labels.extend_from_slice(&self.child_labels[old as usize]);
            sorted_labels.sort_unstable();
            for &label in &sorted_labels {
                let target = old_to_new[self.child(old, label)? as usize];
                store.add_hi_target(new_id, label, target)?;
            }
        }
        for (first, run) in &runs {
            store.add_lo_chain(*first, run)?;
        }
        let store = store.finish()?;

        let mut outputs: Vec<(NodeId, EntityId)> = self
            .outputs
            .iter()
            .enumerate()
            .filter_map(|(old, out)| out.map(|e| (old_to_new[old], e)))
            .collect();
        outputs.sort_unstable_by_key(|&(node, _)| node);

        let descendants: AHashMap<NodeId, Box<[EntityId]>> = self
            .descendants
            .into_iter()
            .enumerate()
            .filter(|(_, list)| list.len() >= self.top_l)
            .map(|(old, list)| (old_to_new[old], list.into_boxed_slice()))
            .collect();

        log::debug!(
            "Finalized trie: {} states, {} hi sources, {} hi edges, {} chains, {} entities, {} cached lists, {} transition spills, {} zone blocks",
            n,
            num_hi_sources,
            num_hi_edges,
            runs.len(),
            self.entity_offsets.len() - 1,
            descendants.len(),
            self.goto.fallback_len(),
            zone.block_count()
        );

        Ok(TrieIndex::from_parts(
            store,
            outputs,
            descendants,
            self.entity_text,
            self.entity_offsets,
            runs.len(),
        ))
    }
}
