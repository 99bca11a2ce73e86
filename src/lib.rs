//! # Edit Trie: Fuzzy Autocomplete over a Compressed Trie
//!
//! This crate provides an in-memory index that answers two kinds of queries
//! over a vocabulary of strings: which entries lie within edit distance `k`
//! of a query, and which entries best complete a query typed one character
//! at a time.
//!
//! ## Key Features
//!
//! - **Compressed Trie**: branching nodes keep sorted edge arrays, single-child chains collapse into label runs
//! - **Edit Tolerance**: a distance-bucketed frontier simulates a bounded Levenshtein automaton over trie edges
//! - **Typeahead**: per-character frontier updates with top-L completion retrieval
//! - **Compact Hash Tables**: generation-stamped integer tables with O(1) clear
//! - **Bounded Edit Distance**: banded dynamic programming capped at a threshold
//! - **String Extents**: zero-copy views with heap, reusable and zone allocators
//!
//! ## Quick Start
//!
//! ```rust
//! use edit_trie::{EditTrie, EntityAdd, LookupIndex};
//!
//! let mut trie = EditTrie::new(10);
//! trie.begin_update().unwrap();
//! for word in ["match", "matcher", "watch", "watcher", "hatch"] {
//!     trie.add(word).unwrap();
//! }
//! trie.end_update().unwrap();
//!
//! // Whole-string lookup within one edit
//! let matches = trie.edit_lookup("matcher", 1, 10).unwrap();
//! assert_eq!(matches[0].token(), "matcher");
//! assert_eq!(matches[1].token(), "watcher");
//!
//! // Typeahead
//! trie.begin_ac(1).unwrap();
//! trie.append_char('w').unwrap();
//! let top = trie.append_char_top('a', 3).unwrap();
//! assert_eq!(top[0], "watch");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod distance;
pub mod error;
pub mod fsa;
pub mod hash_map;
pub mod string;

// Re-export core types
pub use config::{Config, TrieConfig, ValidationError};
pub use distance::{levenshtein, levenshtein_str, BoundedEditDistance};
pub use error::{EditTrieError, Result};
pub use fsa::{
    ActiveNodes, EditTrie, EntityAdd, EntityId, Label, LookupIndex, NodeId, StatisticsProvider,
    TrieBuildState, TrieChildStore, TrieCursor, TrieIndex, TrieMatch, TrieStats,
};
pub use hash_map::{CompactHashTable, IntHashTable, IntPairHashTable};
pub use string::{ExtentAllocator, HeapAllocator, ReusableBuffer, StringExtent, ZoneAllocator};

/// Type alias for state identifiers in the trie
pub type StateId = u32;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently a no-op, for future use)
pub fn init() {
    log::debug!("Initializing edit-trie v{}", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_info() {
        assert!(VERSION.contains('.'));
        // Version should be semver format like "0.1.0"
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2);
    }

    #[test]
    fn test_type_aliases() {
        let _state_id: StateId = 42;
        assert_eq!(std::mem::size_of::<StateId>(), 4);
        assert_eq!(std::mem::size_of::<NodeId>(), 4);
        assert_eq!(std::mem::size_of::<Label>(), 2);
    }

    #[test]
    fn test_re_exports() {
        let trie = EditTrie::new(5);
        assert!(!trie.is_ready());
        let _err = EditTrieError::invalid_data("test");
        assert!(std::any::type_name::<Result<()>>().contains("EditTrieError"));
        assert_eq!(levenshtein_str("kitten", "sitting"), 3);
    }

    #[test]
    fn test_multiple_init_calls() {
        init();
        init();
    }
}
