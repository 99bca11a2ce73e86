//! Frontier of trie nodes reachable within an edit budget
//!
//! [`ActiveNodes`] maps node id to the best distance found so far, keeps the
//! order in which nodes first became active, and buckets nodes by distance so
//! they can be emitted cheapest-first. Distances only ever decrease; a node
//! whose distance drops is pushed onto its new bucket and the old entry is
//! skipped as stale when buckets are read.

use super::NodeId;
use crate::error::Result;
use crate::hash_map::IntHashTable;

const MIN_TABLE_CAPACITY: usize = 16;
const MAX_TABLE_CAPACITY: usize = 1 << 16;

/// Active node set with distance buckets
#[derive(Debug)]
pub struct ActiveNodes {
    distances: IntHashTable,
    queue: Vec<NodeId>,
    buckets: Vec<Vec<NodeId>>,
    min_distance: usize,
    max_distance: usize,
}

impl ActiveNodes {
    /// Create a frontier sized for a trie of `num_states` nodes
    pub fn new(num_states: usize) -> Result<Self> {
        let capacity = num_states.clamp(MIN_TABLE_CAPACITY, MAX_TABLE_CAPACITY);
        Ok(Self {
            distances: IntHashTable::new(capacity)?,
            queue: Vec::new(),
            buckets: Vec::new(),
            min_distance: usize::MAX,
            max_distance: 0,
        })
    }

    /// Number of active nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if no node is active
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Make `node` active at `distance`, or lower its distance
    ///
    /// Returns `true` if the node was added or its distance decreased.
    pub fn add_node(&mut self, node: NodeId, distance: u32) -> bool {
        match self.distances.try_get(&node) {
            Some(current) if current <= distance => return false,
            Some(_) => {
                self.distances.update(node, distance);
            }
            None => {
                self.distances.set(node, distance);
                self.queue.push(node);
            }
        }

        let d = distance as usize;
        if self.buckets.len() <= d {
            self.buckets.resize_with(d + 1, Vec::new);
        }
        self.buckets[d].push(node);
        self.min_distance = self.min_distance.min(d);
        self.max_distance = self.max_distance.max(d);
        true
    }

    /// Best known distance of `node`
    #[inline]
    pub fn distance(&self, node: NodeId) -> Option<u32> {
        self.distances.try_get(&node)
    }

    /// Check whether `node` is active
    #[inline]
    pub fn is_active(&self, node: NodeId) -> bool {
        self.distances.contains_key(&node)
    }

    /// Active nodes in the order they first became active
    #[inline]
    pub fn queue_order(&self) -> &[NodeId] {
        &self.queue
    }

    /// Take `(node, distance)` in first-activation order, leaving the frontier empty
    pub fn drain_queue_order(&mut self) -> Vec<(NodeId, u32)> {
        let drained = self
            .queue
            .drain(..)
            .filter_map(|node| self.distances.try_get(&node).map(|d| (node, d)))
            .collect();
        self.reset_distances();
        drained
    }

    /// Nodes currently at exactly distance `d`, in the order they reached it
    pub fn bucket(&self, d: u32) -> impl Iterator<Item = NodeId> + '_ {
        let entries = self.buckets.get(d as usize).map_or(&[][..], |b| b.as_slice());
        entries
            .iter()
            .copied()
            .filter(move |&node| self.distances.try_get(&node) == Some(d))
    }

    /// Raw bucket length including stale entries
    #[inline]
    pub(crate) fn bucket_len(&self, d: u32) -> usize {
        self.buckets.get(d as usize).map_or(0, Vec::len)
    }

    /// Raw bucket entry; may be stale
    #[inline]
    pub(crate) fn bucket_entry(&self, d: u32, idx: usize) -> NodeId {
        self.buckets[d as usize][idx]
    }

    /// Lowest and highest distance present, if any node is active
    pub fn distance_range(&self) -> Option<(u32, u32)> {
        if self.is_empty() {
            None
        } else {
            Some((self.min_distance as u32, self.max_distance as u32))
        }
    }

    /// Emit active nodes in increasing distance until `limit` results are covered
    ///
    /// `estimate` returns how many results a node is expected to contribute.
    /// Nodes are appended to `out` (which is cleared first) bucket by bucket;
    /// enumeration stops as soon as the running estimate reaches `limit`.
    pub fn sorted_by_distance<F>(&self, limit: usize, mut estimate: F, out: &mut Vec<NodeId>)
    where
        F: FnMut(NodeId) -> usize,
    {
        out.clear();
        if self.is_empty() {
            return;
        }

        let mut covered = 0usize;
        for d in self.min_distance..=self.max_distance {
            for node in self.bucket(d as u32) {
                covered += estimate(node);
                out.push(node);
                if covered >= limit {
                    return;
                }
            }
        }
    }

    fn reset_distances(&mut self) {
        self.distances.clear();
        if self.min_distance <= self.max_distance {
            for bucket in &mut self.buckets[self.min_distance..=self.max_distance] {
                bucket.clear();
            }
        }
        self.min_distance = usize::MAX;
        self.max_distance = 0;
    }

    /// Forget every active node
    ///
    /// Only the buckets touched since the last clear are visited.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.reset_distances();
    }
}
