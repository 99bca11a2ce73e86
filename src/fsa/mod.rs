//! Edit-tolerant trie
//!
//! The trie is built in two representations. [`TrieBuildState`] grows the
//! trie through a paired-key transition table while entities are added;
//! finalizing it produces a [`TrieIndex`], whose [`TrieChildStore`] keeps
//! branching nodes as sorted edge arrays and path-compresses single-child
//! chains into label runs. Lookups walk the index with an [`ActiveNodes`]
//! frontier per query. [`EditTrie`] orchestrates both phases.

pub mod active_nodes;
pub mod builder;
pub mod child_store;
pub mod cursor;
pub mod edit_trie;
pub mod index;
pub mod traits;

/// Dense node identifier; 0 is the root
pub type NodeId = crate::StateId;
/// Dense entity identifier in first-insertion order
pub type EntityId = u32;
/// Edge label: one UTF-16 code unit
pub type Label = u16;

pub use active_nodes::ActiveNodes;
pub use builder::TrieBuildState;
pub use child_store::{ChildStoreBuilder, Children, TrieChildStore, CHAIN_SENTINEL};
pub use cursor::{SearchState, TrieCursor};
pub use edit_trie::EditTrie;
pub use index::TrieIndex;
pub use traits::{EntityAdd, LookupIndex, StatisticsProvider, TrieMatch, TrieStats};
