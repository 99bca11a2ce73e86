//! Edit-tolerant traversal of a finalized trie
//!
//! A search keeps two [`ActiveNodes`] frontiers. The current one holds every
//! node whose path label is within `k` edits of the query prefix typed so far,
//! tagged with the smallest such distance. Appending a code unit computes the
//! next frontier from the current one and swaps them.
//!
//! For each active node `v` at distance `d`, the next frontier receives:
//!
//! - `v` at `d + 1` (the query unit is dropped)
//! - the child along the typed unit at `d` (match)
//! - every other child at `d + 1` (substitution)
//!
//! A final pass then walks the next frontier's distance buckets in increasing
//! order and offers every child of a node at `d` the distance `d + 1` (a trie
//! unit inserted after the typed one). Because buckets are processed
//! cheapest-first, each node ends with its exact Levenshtein distance.

use super::active_nodes::ActiveNodes;
use super::index::TrieIndex;
use super::traits::TrieMatch;
use super::{EntityId, Label, NodeId};
use crate::error::Result;
use crate::hash_map::IntHashTable;

/// Reusable per-query state, independent of any particular index borrow
#[derive(Debug)]
pub struct SearchState {
    current: ActiveNodes,
    next: ActiveNodes,
    max_edit: u32,
    prefix: Vec<Label>,
    visits: u64,
    scratch: Vec<NodeId>,
    sorted: Vec<NodeId>,
    visited: IntHashTable,
    seen: IntHashTable,
}

impl SearchState {
    /// Create search state sized for a trie of `num_states` nodes
    pub fn new(num_states: usize) -> Result<Self> {
        Ok(Self {
            current: ActiveNodes::new(num_states)?,
            next: ActiveNodes::new(num_states)?,
            max_edit: 0,
            prefix: Vec::new(),
            visits: 0,
            scratch: Vec::new(),
            sorted: Vec::new(),
            visited: IntHashTable::new(64)?,
            seen: IntHashTable::new(64)?,
        })
    }

    /// Reset the frontier to every node within `k` steps of the root
    pub fn begin(&mut self, index: &TrieIndex, k: u32) {
        self.current.clear();
        self.next.clear();
        self.prefix.clear();
        self.max_edit = k;

        self.current.add_node(0, 0);
        self.scratch.clear();
        self.scratch.push(0);
        let mut head = 0;
        while head < self.scratch.len() {
            let node = self.scratch[head];
            head += 1;
            let d = match self.current.distance(node) {
                Some(d) if d < k => d,
                _ => continue,
            };
            for child in index.children(node) {
                if self.current.add_node(child, d + 1) {
                    self.scratch.push(child);
                }
            }
        }
    }

    /// Consume one query code unit
    pub fn advance(&mut self, index: &TrieIndex, unit: Label) {
        let k = self.max_edit;
        self.next.clear();

        for &node in self.current.queue_order() {
            let d = match self.current.distance(node) {
                Some(d) => d,
                None => continue,
            };
            if d < k {
                self.next.add_node(node, d + 1);
            }

            let literal = index.find_target(node, unit);
            if let Some(child) = literal {
                self.next.add_node(child, d);
            }

            let base = self.next.distance(node).map_or(d, |nd| nd.min(d));
            if base < k {
                for child in index.children(node) {
                    if Some(child) != literal {
                        self.next.add_node(child, base + 1);
                    }
                }
            }
        }

        for d in 0..k {
            let mut idx = 0;
            while idx < self.next.bucket_len(d) {
                let node = self.next.bucket_entry(d, idx);
                idx += 1;
                if self.next.distance(node) != Some(d) {
                    continue;
                }
                for child in index.children(node) {
                    self.next.add_node(child, d + 1);
                }
            }
        }

        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
        self.prefix.push(unit);
        self.visits += self.current.len() as u64;
        log::trace!(
            "Frontier after {} units: {} active nodes",
            self.prefix.len(),
            self.current.len()
        );
    }

    /// Outputs of the current frontier as `(entity, distance)`, closest first
    pub fn matches(&self, index: &TrieIndex, max_matches: usize) -> Vec<(EntityId, u32)> {
        let active = self
            .current
            .queue_order()
            .iter()
            .filter_map(|&node| self.current.distance(node).map(|d| (node, d)));
        collect_matches(index, active, max_matches)
    }

    /// Like [`matches`](Self::matches), but consumes the frontier
    ///
    /// Appending further units requires a new [`begin`](Self::begin).
    pub fn take_matches(&mut self, index: &TrieIndex, max_matches: usize) -> Vec<(EntityId, u32)> {
        let active = self.current.drain_queue_order();
        collect_matches(index, active, max_matches)
    }

    /// Up to `limit` entities below the closest active nodes
    ///
    /// Active nodes are taken in increasing distance; each contributes the
    /// entities of its subtree. A node with a descendant cache answers from
    /// the cache first and is walked only if the cache falls short. A subtree
    /// rooted at an already visited active node is not walked again, and
    /// every entity is reported once. If the estimated nodes fall short of
    /// `limit`, the rest of the frontier is walked in distance order.
    pub fn top_entities(&mut self, index: &TrieIndex, limit: usize) -> Vec<EntityId> {
        let mut result = Vec::new();
        if limit == 0 || self.current.is_empty() {
            return result;
        }

        let mut sorted = std::mem::take(&mut self.sorted);
        self.current.sorted_by_distance(
            limit,
            |node| match index.cached_descendants(node) {
                Some(list) => list.len(),
                None => usize::from(index.output(node).is_some()),
            },
            &mut sorted,
        );

        self.visited.clear();
        self.seen.clear();
        for &node in &sorted {
            self.visit_subtree(index, node, limit, &mut result);
            if result.len() >= limit {
                break;
            }
        }

        // Estimates overlap between nested active nodes; fall back to the full frontier.
        if result.len() < limit && sorted.len() < self.current.len() {
            self.current.sorted_by_distance(usize::MAX, |_| 0, &mut sorted);
            for &node in &sorted {
                self.visit_subtree(index, node, limit, &mut result);
                if result.len() >= limit {
                    break;
                }
            }
        }
        self.sorted = sorted;
        result
    }

    fn push_entity(&mut self, entity: EntityId, result: &mut Vec<EntityId>) {
        if !self.seen.contains_key(&entity) {
            self.seen.set(entity, 1);
            result.push(entity);
        }
    }

    fn visit_subtree(&mut self, index: &TrieIndex, root: NodeId, limit: usize, result: &mut Vec<EntityId>) {
        self.scratch.clear();
        self.scratch.push(root);

        while let Some(node) = self.scratch.pop() {
            if self.visited.contains_key(&node) {
                continue;
            }
            if self.current.is_active(node) {
                self.visited.set(node, 1);
            }

            if let Some(entity) = index.output(node) {
                self.push_entity(entity, result);
                if result.len() >= limit {
                    return;
                }
            }

            if let Some(cached) = index.cached_descendants(node) {
                for &entity in cached {
                    self.push_entity(entity, result);
                    if result.len() >= limit {
                        return;
                    }
                }
            }

            let start = self.scratch.len();
            self.scratch.extend(index.children(node));
            self.scratch[start..].reverse();
        }
    }

    /// Active nodes as `(node, distance)` sorted by node id
    pub fn active_nodes(&self) -> Vec<(NodeId, u32)> {
        let mut nodes: Vec<(NodeId, u32)> = self
            .current
            .queue_order()
            .iter()
            .filter_map(|&node| self.current.distance(node).map(|d| (node, d)))
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Current frontier
    pub fn frontier(&self) -> &ActiveNodes {
        &self.current
    }

    /// Code units consumed since the last `begin`
    pub fn prefix(&self) -> &[Label] {
        &self.prefix
    }

    /// Edit budget of the current search
    pub fn max_edit(&self) -> u32 {
        self.max_edit
    }

    /// Sum of frontier sizes over every consumed unit
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Reset the visit counter
    pub fn clear_counters(&mut self) {
        self.visits = 0;
    }
}

fn collect_matches<I>(index: &TrieIndex, active: I, max_matches: usize) -> Vec<(EntityId, u32)>
where
    I: IntoIterator<Item = (NodeId, u32)>,
{
    let mut found: Vec<(EntityId, u32)> = active
        .into_iter()
        .filter_map(|(node, d)| index.output(node).map(|entity| (entity, d)))
        .collect();
    found.sort_by_key(|&(_, d)| d);
    found.truncate(max_matches);
    found
}

/// Independent query session over a shared [`TrieIndex`]
///
/// # Examples
///
/// ```rust
/// use edit_trie::fsa::{EditTrie, EntityAdd};
///
/// let mut trie = EditTrie::new(10);
/// trie.begin_update().unwrap();
/// trie.add_all(["match", "watch", "hatch"]).unwrap();
/// trie.end_update().unwrap();
///
/// let mut cursor = trie.cursor().unwrap();
/// cursor.begin(1);
/// cursor.append_str("wat");
/// let top = cursor.top_completions(2);
/// assert_eq!(top[0], "watch");
/// ```
#[derive(Debug)]
pub struct TrieCursor<'a> {
    index: &'a TrieIndex,
    state: SearchState,
}

impl<'a> TrieCursor<'a> {
    /// Open a cursor over `index`
    pub fn new(index: &'a TrieIndex) -> Result<Self> {
        let mut state = SearchState::new(index.num_states())?;
        state.begin(index, 0);
        Ok(Self { index, state })
    }

    /// Restart with edit budget `k`
    pub fn begin(&mut self, k: u32) {
        self.state.begin(self.index, k);
    }

    /// Consume one UTF-16 code unit
    pub fn append_unit(&mut self, unit: Label) {
        self.state.advance(self.index, unit);
    }

    /// Consume a character (two steps for characters outside the BMP)
    pub fn append_char(&mut self, c: char) {
        let mut buf = [0u16; 2];
        for &unit in c.encode_utf16(&mut buf).iter() {
            self.append_unit(unit);
        }
    }

    /// Consume every character of `s`
    pub fn append_str(&mut self, s: &str) {
        for unit in s.encode_utf16() {
            self.append_unit(unit);
        }
    }

    /// Up to `limit` completions of the current prefix, closest first
    pub fn top_completions(&mut self, limit: usize) -> Vec<&'a str> {
        let index = self.index;
        self.state
            .top_entities(index, limit)
            .into_iter()
            .filter_map(|e| index.entity(e))
            .collect()
    }

    /// Append `c`, then return the top `limit` completions
    pub fn append_char_top(&mut self, c: char, limit: usize) -> Vec<&'a str> {
        self.append_char(c);
        self.top_completions(limit)
    }

    /// Entities matching the whole prefix within the edit budget, closest first
    pub fn matches(&self, max_matches: usize) -> Vec<TrieMatch<'a>> {
        self.state
            .matches(self.index, max_matches)
            .into_iter()
            .map(|(e, d)| TrieMatch::new(self.index, e, d))
            .collect()
    }

    /// Whole-string lookup; an empty query yields no matches
    pub fn edit_lookup(&mut self, query: &str, max_edit: u32, max_matches: usize) -> Vec<TrieMatch<'a>> {
        if query.is_empty() {
            return Vec::new();
        }
        self.begin(max_edit);
        self.append_str(query);
        self.matches(max_matches)
    }

    /// Active nodes as `(node, distance)` sorted by node id
    pub fn active_nodes(&self) -> Vec<(NodeId, u32)> {
        self.state.active_nodes()
    }

    /// Query prefix consumed since the last `begin`
    pub fn prefix(&self) -> String {
        String::from_utf16_lossy(self.state.prefix())
    }

    /// Sum of frontier sizes over every consumed unit
    pub fn num_visits(&self) -> u64 {
        self.state.visits()
    }
}
