//! Unbounded Levenshtein distance
//!
//! Plain two-row dynamic program with no length limit or threshold. Slower
//! than [`BoundedEditDistance`](super::BoundedEditDistance) for small `k`, but
//! exact for any input, which makes it the reference the trie lookups are
//! checked against.

/// Levenshtein distance between two code-unit strings
pub fn levenshtein(a: &[u16], b: &[u16]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Levenshtein distance over the UTF-16 encodings of two strings
pub fn levenshtein_str(a: &str, b: &str) -> usize {
    let a: Vec<u16> = a.encode_utf16().collect();
    let b: Vec<u16> = b.encode_utf16().collect();
    levenshtein(&a, &b)
}
