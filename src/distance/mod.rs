//! Edit distance between short strings
//!
//! - [`BoundedEditDistance`]: banded O(n * k) distance with a threshold,
//!   exact-`k` check and prefix matching, over a reusable scratch matrix
//! - [`levenshtein`]: unbounded reference distance

mod bounded;
mod levenshtein;

pub use bounded::{BoundedEditDistance, INFTY, MAX_LEN};
pub use levenshtein::{levenshtein, levenshtein_str};
