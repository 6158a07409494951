//! Triple enumeration for tournament matches
//!
//! Every unordered 3-subset of the pool is played once, in ascending
//! lexicographic order of `(i, j, k)` with `i < j < k`. The `index`-th
//! triple can be computed directly without materializing the list.

/// Number of triples drawn from `participant_count` entries: C(n, 3)
pub fn calculate_match_count(participant_count: u32) -> u64 {
    binomial2(participant_count as u64) * (participant_count as u64).saturating_sub(2) / 3
}

/// C(n, 2)
fn binomial2(n: u64) -> u64 {
    n * n.saturating_sub(1) / 2
}

/// All triples `(i, j, k)`, `i < j < k`, in lexicographic order
pub fn generate_all_triples(participant_count: u32) -> Vec<(u32, u32, u32)> {
    let n = participant_count;
    let mut triples = Vec::with_capacity(calculate_match_count(n) as usize);
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                triples.push((i, j, k));
            }
        }
    }
    triples
}

/// The `match_index`-th triple of [`generate_all_triples`], in O(n) without allocating
pub fn get_triple_for_match(participant_count: u32, match_index: u64) -> Option<(u32, u32, u32)> {
    let n = participant_count as u64;
    if match_index >= calculate_match_count(participant_count) {
        return None;
    }

    let mut rank = match_index;

    // Triples starting at i number C(n-1-i, 2)
    let mut i = 0u64;
    while rank >= binomial2(n - 1 - i) {
        rank -= binomial2(n - 1 - i);
        i += 1;
    }

    // Pairs (j, k) after j number n-1-j
    let mut j = i + 1;
    while rank >= n - 1 - j {
        rank -= n - 1 - j;
        j += 1;
    }

    let k = j + 1 + rank;
    Some((i as u32, j as u32, k as u32))
}
