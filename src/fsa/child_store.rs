//! Read-only child transitions of a finalized trie
//!
//! Node ids are split in two ranges:
//!
//! - `[0, n_hi)`: hi sources. Their edges are stored contiguously, sorted by
//!   label, with per-source offsets. Targets are signed deltas from the source.
//! - `[n_hi, num_states)`: lo nodes, the members of path-compressed chains.
//!   A lo node has at most one child, always `id + 1`. `lo_labels[id - n_hi]`
//!   is the label of that edge, or [`CHAIN_SENTINEL`] at the end of a chain.
//!
//! Lookup of a labeled child is a binary search for hi sources and a single
//! comparison for lo nodes.

use std::iter::FusedIterator;
use std::mem;

use super::{Label, NodeId};
use crate::error::{EditTrieError, Result};
use crate::string::StringExtent;

/// Label reserved to terminate a chain run
pub const CHAIN_SENTINEL: Label = Label::MAX;

/// Compact child-transition table
#[derive(Debug, Clone, Default)]
pub struct TrieChildStore {
    hi_offsets: Vec<u32>,
    hi_labels: Vec<Label>,
    hi_targets: Vec<i32>,
    lo_labels: Vec<Label>,
}

impl TrieChildStore {
    /// Number of hi sources
    #[inline]
    pub fn num_hi_sources(&self) -> usize {
        self.hi_offsets.len().saturating_sub(1)
    }

    /// Number of lo nodes
    #[inline]
    pub fn num_lo_nodes(&self) -> usize {
        self.lo_labels.len()
    }

    /// Total number of nodes
    #[inline]
    pub fn num_states(&self) -> usize {
        self.num_hi_sources() + self.num_lo_nodes()
    }

    /// Number of edges out of hi sources
    #[inline]
    pub fn num_hi_edges(&self) -> usize {
        self.hi_labels.len()
    }

    /// Check whether `node` is a hi source
    #[inline]
    pub fn is_hi(&self, node: NodeId) -> bool {
        (node as usize) < self.num_hi_sources()
    }

    #[inline]
    fn hi_range(&self, source: usize) -> (usize, usize) {
        (
            self.hi_offsets[source] as usize,
            self.hi_offsets[source + 1] as usize,
        )
    }

    #[inline]
    fn hi_target(&self, source: NodeId, idx: usize) -> NodeId {
        (source as i64 + self.hi_targets[idx] as i64) as NodeId
    }

    #[inline]
    fn lo_label(&self, node: NodeId) -> Option<Label> {
        let idx = (node as usize).checked_sub(self.num_hi_sources())?;
        match self.lo_labels.get(idx) {
            Some(&CHAIN_SENTINEL) | None => None,
            Some(&label) => Some(label),
        }
    }

    /// Child of `source` along the edge labeled `label`
    pub fn find_target(&self, source: NodeId, label: Label) -> Option<NodeId> {
        if label == CHAIN_SENTINEL {
            return None;
        }
        if self.is_hi(source) {
            let (start, end) = self.hi_range(source as usize);
            let idx = self.hi_labels[start..end].binary_search(&label).ok()?;
            Some(self.hi_target(source, start + idx))
        } else if self.lo_label(source)? == label {
            Some(source + 1)
        } else {
            None
        }
    }

    /// Iterate the children of `source`
    ///
    /// Hi sources yield children in label order; lo nodes yield at most one.
    pub fn children(&self, source: NodeId) -> Children<'_> {
        if self.is_hi(source) {
            let (start, end) = self.hi_range(source as usize);
            Children {
                store: self,
                source,
                idx: start,
                end,
                lo_next: None,
            }
        } else {
            Children {
                store: self,
                source,
                idx: 0,
                end: 0,
                lo_next: self.lo_label(source).map(|_| source + 1),
            }
        }
    }

    /// Iterate `(label, child)` pairs of `source`
    pub fn labeled_children(&self, source: NodeId) -> impl Iterator<Item = (Label, NodeId)> + '_ {
        let hi = if self.is_hi(source) {
            let (start, end) = self.hi_range(source as usize);
            start..end
        } else {
            0..0
        };
        let lo = if self.is_hi(source) {
            None
        } else {
            self.lo_label(source).map(|label| (label, source + 1))
        };
        hi.map(move |idx| (self.hi_labels[idx], self.hi_target(source, idx)))
            .chain(lo)
    }

    /// Number of children of `source`
    pub fn out_degree(&self, source: NodeId) -> usize {
        if self.is_hi(source) {
            let (start, end) = self.hi_range(source as usize);
            end - start
        } else {
            usize::from(self.lo_label(source).is_some())
        }
    }

    /// Approximate heap footprint in bytes
    pub fn memory_usage(&self) -> usize {
        self.hi_offsets.len() * mem::size_of::<u32>()
            + self.hi_labels.len() * mem::size_of::<Label>()
            + self.hi_targets.len() * mem::size_of::<i32>()
            + self.lo_labels.len() * mem::size_of::<Label>()
    }
}

/// Iterator over the children of one node
#[derive(Debug, Clone)]
pub struct Children<'a> {
    store: &'a TrieChildStore,
    source: NodeId,
    idx: usize,
    end: usize,
    lo_next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        if self.idx < self.end {
            let target = self.store.hi_target(self.source, self.idx);
            self.idx += 1;
            return Some(target);
        }
        self.lo_next.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.idx + usize::from(self.lo_next.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for Children<'_> {}
impl FusedIterator for Children<'_> {}

/// Two-phase builder for [`TrieChildStore`]
///
/// Hi sources must be started in id order `0..n_hi`, each followed by its
/// targets in increasing label order. Chains may then be added in any order.
#[derive(Debug)]
pub struct ChildStoreBuilder {
    num_hi_sources: usize,
    next_hi_source: usize,
    hi_offsets: Vec<u32>,
    hi_labels: Vec<Label>,
    hi_targets: Vec<i32>,
    lo_labels: Vec<Label>,
}

impl ChildStoreBuilder {
    /// Start a store for `num_states` nodes of which the first `num_hi_sources` are hi
    pub fn new(num_states: usize, num_hi_sources: usize, num_hi_edges: usize) -> Result<Self> {
        if num_hi_sources > num_states {
            return Err(EditTrieError::out_of_bounds(num_hi_sources, num_states));
        }
        let mut hi_offsets = Vec::with_capacity(num_hi_sources + 1);
        hi_offsets.push(0);
        Ok(Self {
            num_hi_sources,
            next_hi_source: 0,
            hi_offsets,
            hi_labels: Vec::with_capacity(num_hi_edges),
            hi_targets: Vec::with_capacity(num_hi_edges),
            lo_labels: vec![CHAIN_SENTINEL; num_states - num_hi_sources],
        })
    }

    /// Start the edge list of the next hi source
    pub fn begin_hi_source(&mut self, source: NodeId) -> Result<()> {
        if source as usize != self.next_hi_source || self.next_hi_source >= self.num_hi_sources {
            return Err(EditTrieError::trie(format!(
                "hi source {} started out of order (expected {})",
                source, self.next_hi_source
            )));
        }
        if source > 0 {
            self.hi_offsets.push(self.hi_labels.len() as u32);
        }
        self.next_hi_source += 1;
        Ok(())
    }

    /// Add an edge of the current hi source
    pub fn add_hi_target(&mut self, source: NodeId, label: Label, target: NodeId) -> Result<()> {
        if self.next_hi_source == 0 || source as usize != self.next_hi_source - 1 {
            return Err(EditTrieError::trie(format!(
                "edge added to hi source {} which is not open",
                source
            )));
        }
        let start = *self.hi_offsets.last().unwrap_or(&0) as usize;
        if let Some(&prev) = self.hi_labels[start..].last() {
            if prev >= label {
                return Err(EditTrieError::trie(format!(
                    "labels of hi source {} not strictly increasing",
                    source
                )));
            }
        }
        self.hi_labels.push(label);
        self.hi_targets.push(target as i32 - source as i32);
        Ok(())
    }

    /// Record the label run of the chain whose first node is `first`
    ///
    /// The chain occupies ids `first..=first + run.len()`; its last node is
    /// terminated by the sentinel.
    pub fn add_lo_chain(&mut self, first: NodeId, run: &StringExtent) -> Result<()> {
        let start = (first as usize)
            .checked_sub(self.num_hi_sources)
            .ok_or_else(|| EditTrieError::trie(format!("chain start {} is a hi node", first)))?;
        let end = start + run.len();
        if end >= self.lo_labels.len() {
            return Err(EditTrieError::out_of_bounds(
                first as usize + run.len(),
                self.num_hi_sources + self.lo_labels.len(),
            ));
        }
        for (slot, label) in self.lo_labels[start..end].iter_mut().zip(run.units()) {
            *slot = label;
        }
        self.lo_labels[end] = CHAIN_SENTINEL;
        Ok(())
    }

    /// Seal the store
    pub fn finish(mut self) -> Result<TrieChildStore> {
        if self.next_hi_source != self.num_hi_sources {
            return Err(EditTrieError::trie(format!(
                "only {} of {} hi sources were added",
                self.next_hi_source, self.num_hi_sources
            )));
        }
        if self.num_hi_sources > 0 {
            self.hi_offsets.push(self.hi_labels.len() as u32);
        }
        Ok(TrieChildStore {
            hi_offsets: self.hi_offsets,
            hi_labels: self.hi_labels,
            hi_targets: self.hi_targets,
            lo_labels: self.lo_labels,
        })
    }
}
