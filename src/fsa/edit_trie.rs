//! Edit-tolerant trie orchestrator
//!
//! [`EditTrie`] moves through three states. It starts `Empty`;
//! [`begin_update`](EntityAdd::begin_update) enters `Building`, where entities
//! are added to a [`TrieBuildState`]; [`end_update`](EntityAdd::end_update)
//! finalizes the build into an immutable [`TrieIndex`] and enters `Ready`.
//! Only a `Ready` trie answers lookups.

use std::borrow::Cow;

use super::builder::TrieBuildState;
use super::cursor::{SearchState, TrieCursor};
use super::index::TrieIndex;
use super::traits::{EntityAdd, LookupIndex, StatisticsProvider, TrieMatch, TrieStats};
use super::EntityId;
use crate::config::{Config, TrieConfig};
use crate::error::{EditTrieError, Result};

enum TrieState {
    Empty,
    Building(Box<TrieBuildState>),
    Ready { index: TrieIndex, search: SearchState },
}

impl TrieState {
    fn name(&self) -> &'static str {
        match self {
            TrieState::Empty => "empty",
            TrieState::Building(_) => "building",
            TrieState::Ready { .. } => "ready",
        }
    }
}

/// Fuzzy-autocomplete index over a vocabulary of entities
///
/// # Examples
///
/// ```rust
/// use edit_trie::fsa::{EditTrie, EntityAdd, LookupIndex};
///
/// let mut trie = EditTrie::new(10);
/// trie.begin_update().unwrap();
/// trie.add_all(["match", "matcher", "watch", "watcher", "hatch"]).unwrap();
/// trie.end_update().unwrap();
///
/// let found: Vec<_> = trie
///     .edit_lookup("matcher", 1, usize::MAX)
///     .unwrap()
///     .iter()
///     .map(|m| (m.token(), m.distance()))
///     .collect();
/// assert_eq!(found, vec![("matcher", 0), ("watcher", 1)]);
/// assert_eq!(trie.lookup("atch", 3).unwrap(), 5);
/// ```
pub struct EditTrie {
    config: TrieConfig,
    state: TrieState,
}

impl EditTrie {
    /// Create an empty trie caching `top_l` descendants per node
    ///
    /// A `top_l` of zero is raised to 1, the smallest value
    /// [`with_config`](Self::with_config) accepts.
    pub fn new(top_l: usize) -> Self {
        Self {
            config: TrieConfig {
                top_l: top_l.max(1),
                ..TrieConfig::default()
            },
            state: TrieState::Empty,
        }
    }

    /// Create an empty trie from a validated configuration
    pub fn with_config(config: TrieConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TrieState::Empty,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Check whether lookups are available
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TrieState::Ready { .. })
    }

    fn normalized<'s>(&self, text: &'s str) -> Cow<'s, str> {
        if self.config.normalize {
            Cow::Owned(text.trim().to_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn not_ready(&self, operation: &str) -> EditTrieError {
        EditTrieError::trie(format!(
            "{} requires a finalized trie (state: {})",
            operation,
            self.state.name()
        ))
    }

    fn index(&self) -> Option<&TrieIndex> {
        match &self.state {
            TrieState::Ready { index, .. } => Some(index),
            _ => None,
        }
    }

    fn ready_mut(&mut self, operation: &str) -> Result<(&TrieIndex, &mut SearchState)> {
        if !self.is_ready() {
            return Err(self.not_ready(operation));
        }
        match &mut self.state {
            TrieState::Ready { index, search } => Ok((&*index, search)),
            _ => Err(EditTrieError::trie("trie left the ready state")),
        }
    }

    /// Start an incremental search with edit budget `max_edit`
    pub fn begin_ac(&mut self, max_edit: u32) -> Result<()> {
        let (index, search) = self.ready_mut("begin_ac")?;
        search.begin(index, max_edit);
        Ok(())
    }

    /// Advance the incremental search by one character
    pub fn append_char(&mut self, c: char) -> Result<()> {
        let lower = self.config.normalize;
        let (index, search) = self.ready_mut("append_char")?;
        let mut buf = [0u16; 2];
        if lower {
            for lc in c.to_lowercase() {
                for &unit in lc.encode_utf16(&mut buf).iter() {
                    search.advance(index, unit);
                }
            }
        } else {
            for &unit in c.encode_utf16(&mut buf).iter() {
                search.advance(index, unit);
            }
        }
        Ok(())
    }

    /// Up to `limit` completions of the incremental prefix, closest first
    pub fn top_completions(&mut self, limit: usize) -> Result<Vec<&str>> {
        let (index, search) = self.ready_mut("top_completions")?;
        Ok(search
            .top_entities(index, limit)
            .into_iter()
            .filter_map(|e| index.entity(e))
            .collect())
    }

    /// Advance by `c`, then return up to `limit` completions
    pub fn append_char_top(&mut self, c: char, limit: usize) -> Result<Vec<&str>> {
        self.append_char(c)?;
        self.top_completions(limit)
    }

    /// Open an independent query session over the finalized index
    pub fn cursor(&self) -> Result<TrieCursor<'_>> {
        match self.index() {
            Some(index) => TrieCursor::new(index),
            None => Err(self.not_ready("cursor")),
        }
    }

    /// Text of entity `id`
    pub fn lookup_entity(&self, id: EntityId) -> Option<&str> {
        self.index()?.entity(id)
    }

    /// Number of distinct entities added so far
    pub fn num_entities(&self) -> usize {
        match &self.state {
            TrieState::Empty => 0,
            TrieState::Building(build) => build.num_entities(),
            TrieState::Ready { index, .. } => index.num_entities(),
        }
    }

    /// Number of trie nodes
    pub fn num_states(&self) -> usize {
        match &self.state {
            TrieState::Empty => 0,
            TrieState::Building(build) => build.num_states(),
            TrieState::Ready { index, .. } => index.num_states(),
        }
    }

    /// Sum of frontier sizes over every character consumed by this trie's own searches
    pub fn num_visits(&self) -> u64 {
        match &self.state {
            TrieState::Ready { search, .. } => search.visits(),
            _ => 0,
        }
    }

    /// Reset the visit counter
    pub fn clear_counters(&mut self) {
        if let TrieState::Ready { search, .. } = &mut self.state {
            search.clear_counters();
        }
    }
}

impl std::fmt::Debug for EditTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditTrie")
            .field("state", &self.state.name())
            .field("num_states", &self.num_states())
            .field("num_entities", &self.num_entities())
            .field("config", &self.config)
            .finish()
    }
}

impl EntityAdd for EditTrie {
    fn begin_update(&mut self) -> Result<()> {
        log::debug!(
            "Beginning trie update (previous state: {}, build capacity: {})",
            self.state.name(),
            self.config.build_capacity
        );
        self.state = TrieState::Empty;
        self.state = TrieState::Building(Box::new(TrieBuildState::new(&self.config)?));
        Ok(())
    }

    fn add(&mut self, entity: &str) -> Result<()> {
        let text = self.normalized(entity).into_owned();
        match &mut self.state {
            TrieState::Building(build) => {
                if !build.add(&text)? {
                    log::trace!("Skipping duplicate entity {:?}", text);
                }
                Ok(())
            }
            _ => Err(EditTrieError::trie(format!(
                "add requires begin_update first (state: {})",
                self.state.name()
            ))),
        }
    }

    fn end_update(&mut self) -> Result<()> {
        let build = match std::mem::replace(&mut self.state, TrieState::Empty) {
            TrieState::Building(build) => build,
            other => {
                let name = other.name();
                self.state = other;
                return Err(EditTrieError::trie(format!(
                    "end_update without begin_update (state: {})",
                    name
                )));
            }
        };
        let index = build.finalize()?;
        let search = SearchState::new(index.num_states())?;
        self.state = TrieState::Ready { index, search };
        Ok(())
    }
}

impl LookupIndex for EditTrie {
    fn lookup(&mut self, query: &str, max_edit: u32) -> Result<usize> {
        Ok(self.edit_lookup(query, max_edit, usize::MAX)?.len())
    }

    fn edit_lookup(
        &mut self,
        query: &str,
        max_edit: u32,
        max_matches: usize,
    ) -> Result<Vec<TrieMatch<'_>>> {
        let lower = self.config.normalize;
        let (index, search) = self.ready_mut("edit_lookup")?;
        let query = if lower {
            Cow::Owned(query.trim().to_lowercase())
        } else {
            Cow::Borrowed(query)
        };
        if query.is_empty() {
            return Ok(Vec::new());
        }

        search.begin(index, max_edit);
        for unit in query.encode_utf16() {
            search.advance(index, unit);
        }
        // The lookup shares the typeahead frontier and leaves it empty.
        Ok(search
            .take_matches(index, max_matches)
            .into_iter()
            .map(|(entity, distance)| TrieMatch::new(index, entity, distance))
            .collect())
    }
}

impl StatisticsProvider for EditTrie {
    fn stats(&self) -> TrieStats {
        self.index().map(|index| index.stats()).unwrap_or_default()
    }
}
