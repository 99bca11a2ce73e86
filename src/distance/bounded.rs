//! Banded edit distance with an early-exit threshold
//!
//! Computes the Levenshtein distance between two code-unit strings only
//! inside the diagonal band of cells that can still be `<= k`. Each row keeps
//! a live column window `[l, r]`; cells that leave the window are never
//! revisited, and once the window is empty the answer is [`INFTY`]. Time is
//! O(n * k) instead of O(n * m).

use crate::error::{EditTrieError, Result};

/// Longest string accepted by [`BoundedEditDistance`]
pub const MAX_LEN: usize = 128;

/// Returned when the distance exceeds the threshold
pub const INFTY: u32 = 1000;

const WIDTH: usize = MAX_LEN + 1;

/// Reusable scratch matrix for thresholded edit distance
///
/// The matrix is sized once for [`MAX_LEN`] and shared by every call, so an
/// instance must not be used by two computations at the same time (`&mut self`
/// enforces this).
///
/// # Examples
///
/// ```rust
/// use edit_trie::distance::{BoundedEditDistance, INFTY};
///
/// let mut ed = BoundedEditDistance::new();
/// assert_eq!(ed.distance_str("watcher", "matcher", 1).unwrap(), 1);
/// assert_eq!(ed.distance_str("hatch", "matcher", 2).unwrap(), INFTY);
/// ```
#[derive(Clone)]
pub struct BoundedEditDistance {
    dist: Vec<u32>,
}

impl BoundedEditDistance {
    /// Allocate the scratch matrix and seed row 0 and column 0
    pub fn new() -> Self {
        let mut dist = vec![0u32; WIDTH * WIDTH];
        for i in 0..WIDTH {
            dist[i] = i as u32;
            dist[i * WIDTH] = i as u32;
        }
        Self { dist }
    }

    #[inline]
    fn at(i: usize, j: usize) -> usize {
        i * WIDTH + j
    }

    fn check_lengths(a: &[u16], b: &[u16]) -> Result<()> {
        if a.len() > MAX_LEN {
            return Err(EditTrieError::out_of_bounds(a.len(), MAX_LEN));
        }
        if b.len() > MAX_LEN {
            return Err(EditTrieError::out_of_bounds(b.len(), MAX_LEN));
        }
        Ok(())
    }

    /// Edit distance between `a` and `b` if it is at most `k`, else [`INFTY`]
    ///
    /// # Errors
    ///
    /// Returns [`EditTrieError::OutOfBounds`] if either input is longer than
    /// [`MAX_LEN`].
    pub fn distance(&mut self, a: &[u16], b: &[u16], k: u32) -> Result<u32> {
        Self::check_lengths(a, b)?;
        Ok(self.banded(a, b, k, None))
    }

    /// Check whether the edit distance is exactly `k`
    pub fn distance_equals(&mut self, a: &[u16], b: &[u16], k: u32) -> Result<bool> {
        Ok(self.distance(a, b, k)? == k)
    }

    /// Find every prefix of `a` within distance `k` of `b`
    ///
    /// Returns `(prefix length, distance)` pairs in increasing prefix length.
    pub fn prefix_check(&mut self, a: &[u16], b: &[u16], k: u32) -> Result<Vec<(usize, u32)>> {
        Self::check_lengths(a, b)?;
        let mut positions = Vec::new();
        self.banded(a, b, k, Some(&mut positions));
        Ok(positions)
    }

    /// [`distance`](Self::distance) over the UTF-16 encodings of two strings
    pub fn distance_str(&mut self, a: &str, b: &str, k: u32) -> Result<u32> {
        let a: Vec<u16> = a.encode_utf16().collect();
        let b: Vec<u16> = b.encode_utf16().collect();
        self.distance(&a, &b, k)
    }

    /// [`prefix_check`](Self::prefix_check) over the UTF-16 encodings of two strings
    pub fn prefix_check_str(&mut self, a: &str, b: &str, k: u32) -> Result<Vec<(usize, u32)>> {
        let a: Vec<u16> = a.encode_utf16().collect();
        let b: Vec<u16> = b.encode_utf16().collect();
        self.prefix_check(&a, &b, k)
    }

    /// Rows walk `b`, columns walk `a`. When `positions` is given, every
    /// final-row cell `<= k` is recorded.
    fn banded(&mut self, a: &[u16], b: &[u16], k: u32, mut positions: Option<&mut Vec<(usize, u32)>>) -> u32 {
        let n1 = a.len();
        let n2 = b.len();

        // Row 0 and column 0 hold the distances against an empty string.
        if n2 == 0 {
            if let Some(out) = positions.as_deref_mut() {
                for j in 0..=n1.min(k as usize) {
                    out.push((j, j as u32));
                }
            }
            return if n1 as u32 <= k { n1 as u32 } else { INFTY };
        }
        if let Some(out) = positions.as_deref_mut() {
            if n2 as u32 <= k {
                out.push((0, n2 as u32));
            }
        }
        if n1 == 0 {
            return if n2 as u32 <= k { n2 as u32 } else { INFTY };
        }

        let cap = k.saturating_add(1);
        let dist = &mut self.dist;
        let mut l = 1usize;
        let mut r = (k as usize).min(n1);

        for i in 1..=n2 {
            // Invariant: only row i-1 cells in [l, r] can be <= k.
            r += 1;
            if r <= n1 {
                dist[Self::at(i - 1, r)] = cap;
            } else {
                r = n1;
            }
            if l > 1 {
                dist[Self::at(i, l - 1)] = cap;
            }

            let mut below = true;
            let mut trailing = 0usize;
            for j in l..=r {
                let diag = dist[Self::at(i - 1, j - 1)];
                let cell = if b[i - 1] == a[j - 1] {
                    diag
                } else {
                    diag.min(dist[Self::at(i - 1, j)])
                        .min(dist[Self::at(i, j - 1)])
                        + 1
                };
                dist[Self::at(i, j)] = cell;

                trailing += 1;
                if cell <= k {
                    trailing = 0;
                    below = false;
                    if i == n2 {
                        if let Some(out) = positions.as_deref_mut() {
                            out.push((j, cell));
                        }
                    }
                }
                if below {
                    l += 1;
                }
            }

            r -= trailing;
            if l > r {
                return INFTY;
            }
        }

        if r != n1 {
            return INFTY;
        }
        dist[Self::at(n2, n1)]
    }
}

impl Default for BoundedEditDistance {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BoundedEditDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedEditDistance")
            .field("max_len", &MAX_LEN)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::levenshtein_str;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_known_distances() {
        let mut ed = BoundedEditDistance::new();
        assert_eq!(ed.distance_str("matcher", "matcher", 0).unwrap(), 0);
        assert_eq!(ed.distance_str("matcher", "watcher", 1).unwrap(), 1);
        assert_eq!(ed.distance_str("matcher", "watcher", 0).unwrap(), INFTY);
        assert_eq!(ed.distance_str("kitten", "sitting", 3).unwrap(), 3);
        assert_eq!(ed.distance_str("kitten", "sitting", 2).unwrap(), INFTY);
        assert_eq!(ed.distance_str("atch", "hatch", 3).unwrap(), 1);
        assert_eq!(ed.distance_str("atch", "matcher", 3).unwrap(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let mut ed = BoundedEditDistance::new();
        assert_eq!(ed.distance_str("", "", 0).unwrap(), 0);
        assert_eq!(ed.distance_str("abc", "", 3).unwrap(), 3);
        assert_eq!(ed.distance_str("", "abc", 3).unwrap(), 3);
        assert_eq!(ed.distance_str("", "abc", 2).unwrap(), INFTY);
        assert_eq!(ed.distance_str("abcd", "", 2).unwrap(), INFTY);
    }

    #[test]
    fn test_distance_equals() {
        let mut ed = BoundedEditDistance::new();
        let a = units("hatch");
        let b = units("watch");
        assert!(ed.distance_equals(&a, &b, 1).unwrap());
        assert!(!ed.distance_equals(&a, &b, 2).unwrap());
        assert!(!ed.distance_equals(&a, &b, 0).unwrap());
    }

    #[test]
    fn test_matrix_reuse_does_not_leak_between_calls() {
        let mut ed = BoundedEditDistance::new();
        let pairs = [
            ("abcdefgh", "hgfedcba"),
            ("match", "matcher"),
            ("zzzz", "zz"),
            ("watcher", "matcher"),
            ("a", "b"),
        ];
        for _ in 0..3 {
            for &(a, b) in &pairs {
                for k in 0..6 {
                    let truth = levenshtein_str(a, b) as u32;
                    let expected = if truth <= k { truth } else { INFTY };
                    assert_eq!(ed.distance_str(a, b, k).unwrap(), expected, "{} / {} k={}", a, b, k);
                }
            }
        }
    }

    #[test]
    fn test_prefix_check() {
        let mut ed = BoundedEditDistance::new();
        let hits = ed.prefix_check_str("matcher", "match", 1).unwrap();
        assert_eq!(hits, vec![(4, 1), (5, 0), (6, 1)]);

        let hits = ed.prefix_check_str("watch", "ma", 2).unwrap();
        assert_eq!(hits, vec![(0, 2), (1, 2), (2, 1), (3, 2)]);

        let hits = ed.prefix_check_str("abc", "", 1).unwrap();
        assert_eq!(hits, vec![(0, 0), (1, 1)]);

        assert!(ed.prefix_check_str("abc", "xyz", 0).unwrap().is_empty());
    }

    #[test]
    fn test_prefix_check_matches_reference() {
        let mut ed = BoundedEditDistance::new();
        let a = "watchers";
        let b = "wacth";
        let k = 2;
        let hits = ed.prefix_check_str(a, b, k).unwrap();
        let expected: Vec<(usize, u32)> = (0..=a.len())
            .map(|j| (j, levenshtein_str(&a[..j], b) as u32))
            .filter(|&(_, d)| d <= k)
            .collect();
        assert_eq!(hits, expected);
    }

    #[test]
    fn test_length_limit() {
        let mut ed = BoundedEditDistance::new();
        let ok = vec![b'a' as u16; MAX_LEN];
        let long = vec![b'a' as u16; MAX_LEN + 1];
        assert_eq!(ed.distance(&ok, &ok, 0).unwrap(), 0);
        assert!(matches!(
            ed.distance(&long, &ok, 1),
            Err(EditTrieError::OutOfBounds { .. })
        ));
        assert!(ed.prefix_check(&ok, &long, 1).is_err());
    }

    #[test]
    fn test_large_threshold() {
        let mut ed = BoundedEditDistance::new();
        assert_eq!(ed.distance_str("abc", "xyz", 500).unwrap(), 3);
        assert_eq!(ed.distance_str("abc", "abcdef", u32::MAX - 1).unwrap(), 3);
    }
}
