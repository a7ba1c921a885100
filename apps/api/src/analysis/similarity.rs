//! Character-sequence similarity (Ratcliff/Obershelp "gestalt" ratio).
//!
//! `ratio = 2·M / (|a| + |b|)`, where M is the total length of the matching
//! blocks `difflib` finds by repeatedly taking the longest common substring
//! and recursing on the pieces to its left and right.

use difflib::sequencematcher::SequenceMatcher;

/// Similarity ratio in `[0.0, 1.0]`. Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // SequenceMatcher::ratio is f32; sum the blocks to keep full precision.
    let mut matcher = SequenceMatcher::new(&a, &b);
    let matched: usize = matcher
        .get_matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matched as f64 / total as f64
}
