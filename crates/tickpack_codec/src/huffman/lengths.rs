//! # Length-Limited Code Lengths
//!
//! Package-merge construction of optimal prefix-code lengths under a
//! maximum length.
//!
//! ```text
//! level 1:  leaves                              (sorted by frequency)
//! level 2:  merge(leaves, pairs of level 1)
//! ...
//! level L:  merge(leaves, pairs of level L-1)
//!
//! take the 2n-2 lightest nodes of level L, every leaf reached below them
//! gains one bit of length
//! ```
//!
//! Runs once per model rebuild, never per packet.

use super::arena::{NodeArena, NodeId};

/// Largest alphabet the builder accepts.
pub const MAX_ALPHABET: usize = 256;

/// Longest code the builder (and [`kraft_sum`]) can express.
pub const MAX_SUPPORTED_LENGTH: u8 = 15;

/// Kraft sum of a complete code, in units of `2^-MAX_SUPPORTED_LENGTH`.
pub const KRAFT_ONE: u64 = 1 << MAX_SUPPORTED_LENGTH;

/// Computes code lengths for `frequencies`, none longer than `max_code_length`.
///
/// Symbols with frequency 0 get length 0. A lone used symbol gets length 1.
///
/// # Panics
///
/// Panics if the alphabet exceeds [`MAX_ALPHABET`], if `max_code_length` is
/// outside `1..=MAX_SUPPORTED_LENGTH`, or if more than
/// `2^max_code_length` symbols are in use.
#[must_use]
pub fn build_code_lengths(frequencies: &[u64], max_code_length: u8) -> Vec<u8> {
    assert!(frequencies.len() <= MAX_ALPHABET, "alphabet of {} symbols", frequencies.len());
    assert!(
        (1..=MAX_SUPPORTED_LENGTH).contains(&max_code_length),
        "max code length {max_code_length}"
    );

    let mut lengths = vec![0u8; frequencies.len()];
    let mut symbols: Vec<u16> = (0..frequencies.len())
        .filter(|&s| frequencies[s] > 0)
        .map(|s| s as u16)
        .collect();

    match symbols.len() {
        0 => return lengths,
        1 => {
            lengths[symbols[0] as usize] = 1;
            return lengths;
        }
        n => assert!(
            n <= 1 << max_code_length,
            "{n} symbols cannot fit in codes of {max_code_length} bits"
        ),
    }

    symbols.sort_by_key(|&s| (frequencies[s as usize], s));
    let n = symbols.len();

    let mut arena = NodeArena::with_capacity(n * (usize::from(max_code_length) + 1));
    let leaves: Vec<NodeId> = symbols
        .iter()
        .map(|&s| arena.leaf(s, frequencies[s as usize]))
        .collect();

    let mut previous: Vec<NodeId> = Vec::with_capacity(2 * n);
    let mut current: Vec<NodeId> = Vec::with_capacity(2 * n);

    for _ in 0..max_code_length {
        current.clear();
        let pairs = previous.len() / 2;
        let (mut leaf_ix, mut pair_ix) = (0, 0);

        while leaf_ix < leaves.len() || pair_ix < pairs {
            let take_leaf = if pair_ix == pairs {
                true
            } else if leaf_ix == leaves.len() {
                false
            } else {
                let pair_weight = arena.get(previous[2 * pair_ix]).frequency
                    + arena.get(previous[2 * pair_ix + 1]).frequency;
                arena.get(leaves[leaf_ix]).frequency <= pair_weight
            };

            if take_leaf {
                current.push(leaves[leaf_ix]);
                leaf_ix += 1;
            } else {
                let package = arena.package(previous[2 * pair_ix], previous[2 * pair_ix + 1]);
                current.push(package);
                pair_ix += 1;
            }
        }

        std::mem::swap(&mut previous, &mut current);
    }

    for &id in previous.iter().take(2 * n - 2) {
        accumulate_depth(&arena, id, &mut lengths);
    }

    lengths
}

/// Every leaf under `id` gains one bit.
fn accumulate_depth(arena: &NodeArena, id: NodeId, lengths: &mut [u8]) {
    let node = arena.get(id);
    if node.is_leaf() {
        lengths[node.symbol as usize] += 1;
    } else {
        accumulate_depth(arena, node.left, lengths);
        accumulate_depth(arena, node.right, lengths);
    }
}

/// Kraft sum of `lengths` in units of `2^-MAX_SUPPORTED_LENGTH`.
///
/// A prefix code exists iff the result is at most [`KRAFT_ONE`]. Zero
/// lengths (unused symbols) contribute nothing.
///
/// # Panics
///
/// Panics if a length exceeds [`MAX_SUPPORTED_LENGTH`].
#[must_use]
pub fn kraft_sum(lengths: &[u8]) -> u64 {
    lengths
        .iter()
        .filter(|&&len| len > 0)
        .map(|&len| {
            assert!(len <= MAX_SUPPORTED_LENGTH, "code length {len}");
            1u64 << (MAX_SUPPORTED_LENGTH - len)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted_bits(frequencies: &[u64], lengths: &[u8]) -> u64 {
        frequencies
            .iter()
            .zip(lengths)
            .map(|(&f, &l)| f * u64::from(l))
            .sum()
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(build_code_lengths(&[0, 0, 0], 6), vec![0, 0, 0]);
        assert_eq!(build_code_lengths(&[0, 42, 0], 6), vec![0, 1, 0]);
    }

    #[test]
    fn test_two_symbols() {
        assert_eq!(build_code_lengths(&[5, 1], 6), vec![1, 1]);
    }

    #[test]
    fn test_unlimited_matches_huffman() {
        // Classic Huffman gives 1,2,3,4,4 for these weights
        let freqs = [16, 8, 4, 2, 1];
        let lengths = build_code_lengths(&freqs, 8);
        assert_eq!(lengths, vec![1, 2, 3, 4, 4]);
        assert_eq!(kraft_sum(&lengths), KRAFT_ONE);
    }

    #[test]
    fn test_limit_is_respected() {
        // Fibonacci weights push plain Huffman far past 4 bits
        let freqs = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        let lengths = build_code_lengths(&freqs, 4);

        assert!(lengths.iter().all(|&l| (1..=4).contains(&l)));
        assert_eq!(kraft_sum(&lengths), KRAFT_ONE);
        // Heavier symbols never get longer codes
        for i in 1..freqs.len() {
            assert!(lengths[i] <= lengths[i - 1]);
        }
    }

    #[test]
    fn test_limit_costs_bits() {
        let freqs = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        let free = build_code_lengths(&freqs, 15);
        let limited = build_code_lengths(&freqs, 4);
        assert!(weighted_bits(&freqs, &limited) >= weighted_bits(&freqs, &free));
    }

    #[test]
    fn test_full_alphabet_at_limit() {
        let freqs = [1u64; 16];
        let lengths = build_code_lengths(&freqs, 4);
        assert!(lengths.iter().all(|&l| l == 4));
    }

    #[test]
    #[should_panic(expected = "cannot fit")]
    fn test_too_many_symbols() {
        let _ = build_code_lengths(&[1u64; 17], 4);
    }

    #[test]
    fn test_kraft_sum_default_lengths() {
        let lengths = [2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 6, 6];
        assert_eq!(kraft_sum(&lengths), KRAFT_ONE);
        assert_eq!(kraft_sum(&[1, 1, 1]), KRAFT_ONE + KRAFT_ONE / 2);
    }
}
