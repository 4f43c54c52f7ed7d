//! Ratcliff/Obershelp string similarity.
//!
//! The score is `2 * M / T` where `T` is the combined character count of both
//! strings and `M` is the number of characters covered by the matching blocks
//! found by repeatedly taking the longest common substring and recursing on
//! the unmatched text to either side of it. This rewards long shared runs,
//! which suits organisation names with a dropped or swapped letter better
//! than a plain edit distance.

use std::collections::HashMap;

/// When the second string is this long, characters making up more than 1% of
/// it are not indexed. Blocks found through the remaining characters are
/// still extended across them.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity ratio in `[0.0, 1.0]`, compared character by character.
///
/// Two empty strings are identical and score `1.0`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Number of characters covered by all matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let b2j = index_positions(b);

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Ascending positions of every character of `b`, minus popular characters.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    if b.len() >= POPULAR_MIN_LEN {
        let limit = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= limit);
    }

    b2j
}

/// Longest block `a[i..i+k] == b[j..j+k]` inside the given window.
///
/// Among equally long indexed blocks the one starting earliest in `a` wins,
/// then the one starting earliest in `b`; the winner is then extended over
/// equal neighbours.
fn longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

    // run_len[j] = length of the match ending at a[i - 1] and b[j]
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_len = HashMap::new();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_len.insert(j, k);
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            }
        }
        run_len = next_run_len;
    }

    // Popular characters are left out of the index but still match, so grow
    // the block over equal neighbours on both sides.
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_len += 1;
    }
    while best_i + best_len < ahi
        && best_j + best_len < bhi
        && a[best_i + best_len] == b[best_j + best_len]
    {
        best_len += 1;
    }

    (best_i, best_j, best_len)
}
