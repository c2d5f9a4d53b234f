//! Longest-matching-block sequence alignment.
//!
//! Finds the longest contiguous run shared by both sequences, then repeats on
//! the pieces to its left and right until no run remains. The similarity
//! ratio is `2*M / T` where `M` is the number of matched elements and `T` the
//! combined length.
//!
//! Ties between equally long runs go to the one found first scanning `a`
//! left to right and, for each element of `a`, its positions in `b` in
//! ascending order. Scores depend on this rule when tokens repeat, and the
//! ratio is not symmetric in general because of it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// Sequences at least this long get popular elements pruned from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Decimal places kept by [`score`].
const SCORE_SCALE: u128 = 10_000;

/// `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Drop elements of `b` that occur more than `len(b) / 100 + 1` times from
    /// candidate lookup once `b` has at least 200 elements. They can still
    /// join a match by extending one found through other elements.
    pub autojunk: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// element → ascending positions in `b`
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::with_options(a, b, MatcherOptions::default())
    }

    pub fn with_options(a: &'a [T], b: &'a [T], options: MatcherOptions) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if options.autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block with `alo <= i < ahi` and `blo <= j < bhi`.
    ///
    /// Returns a block of size 0 positioned at `(alo, blo)` when the ranges
    /// share nothing.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the run ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            new_j2len.clear();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = match j.checked_sub(1) {
                        Some(prev) => j2len.get(&prev).copied().unwrap_or(0) + 1,
                        None => 1,
                    };
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut new_j2len);
        }

        // Pruned elements never seed a run but may sit right next to one.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// Non-overlapping blocks in increasing order, adjacent blocks merged,
    /// terminated by the sentinel `(len(a), len(b), 0)`.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut pending = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(MatchingBlock {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Total number of matched elements, `M`.
    pub fn matched_len(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.size).sum()
    }

    /// Unrounded `2*M / T`, `0.0` when both sequences are empty.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 0.0;
        }
        2.0 * self.matched_len() as f64 / total as f64
    }
}

/// Similarity of two token sequences, rounded to 4 decimals.
///
/// Either sequence being empty scores exactly `0.0`: there is nothing to
/// compare, which is not the same as being identical.
pub fn score<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    score_with_options(a, b, MatcherOptions::default())
}

pub fn score_with_options<T: Eq + Hash>(a: &[T], b: &[T], options: MatcherOptions) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matched = SequenceMatcher::with_options(a, b, options).matched_len();
    round_ratio(matched, a.len() + b.len())
}

/// `2 * matched / total` rounded to 4 decimals.
///
/// The quotient is computed as an `f64` first and its exact binary value is
/// rounded half-to-even. `2/8000` is stored slightly above `0.00025` and
/// gives `0.0003`; `2/64` is exactly `0.03125` and gives `0.0312`.
pub fn round_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_scale(2.0 * matched as f64 / total as f64)
}

/// Round a finite, non-negative `value` below `2^52` to [`SCORE_SCALE`].
fn round_to_scale(value: f64) -> f64 {
    let bits = value.to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };
    if exp >= 0 {
        return value;
    }

    // value == mantissa / 2^shift exactly
    let shift = exp.unsigned_abs();
    if shift >= 128 {
        return 0.0;
    }
    let num = mantissa as u128 * SCORE_SCALE;
    let quot = num >> shift;
    let rem = num & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    let rounded = match rem.cmp(&half) {
        Ordering::Less => quot,
        Ordering::Greater => quot + 1,
        Ordering::Equal => quot + (quot & 1),
    };
    rounded as f64 / SCORE_SCALE as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn block(a: usize, b: usize, size: usize) -> MatchingBlock {
        MatchingBlock { a, b, size }
    }

    #[test]
    fn test_identical_sequences_score_one() {
        let a = vec!["identifier", "=", "integer"];
        assert_eq!(score(&a, &a), 1.0);
    }

    #[test]
    fn test_empty_sequences_score_zero() {
        let a = vec!["def", "identifier"];
        let empty: Vec<&str> = Vec::new();
        assert_eq!(score(&a, &empty), 0.0);
        assert_eq!(score(&empty, &a), 0.0);
        assert_eq!(score(&empty, &empty), 0.0);
    }

    #[test]
    fn test_disjoint_sequences_score_zero() {
        assert_eq!(score(&chars("abc"), &chars("xyz")), 0.0);
    }

    #[test]
    fn test_matching_blocks_merge_and_sentinel() {
        let (a, b) = (chars("abxcd"), chars("abcd"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(
            m.matching_blocks(),
            vec![block(0, 0, 2), block(3, 2, 2), block(5, 4, 0)]
        );
        assert_eq!(m.matched_len(), 4);
        assert_eq!(score(&a, &b), 0.8889);
    }

    #[test]
    fn test_longest_match_prefers_earliest_in_a() {
        let (a, b) = (chars(" abcd"), chars("abcd abcd"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.find_longest_match(0, 5, 0, 9), block(0, 4, 5));
    }

    #[test]
    fn test_equal_length_ties_go_leftmost() {
        let (a, b) = (chars("ab"), chars("ba"));
        let m = SequenceMatcher::new(&a, &b);
        // Both 'a' and 'b' are length-1 runs; 'a' is first in `a`.
        assert_eq!(m.find_longest_match(0, 2, 0, 2), block(0, 1, 1));
        assert_eq!(score(&a, &b), 0.5);

        let (a, b) = (chars("aaa"), chars("aa"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.find_longest_match(0, 3, 0, 2), block(0, 0, 2));
    }

    #[test]
    fn test_no_match_reports_empty_block_at_range_start() {
        let (a, b) = (chars("abc"), chars("xyz"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.find_longest_match(1, 3, 2, 3), block(1, 2, 0));
        assert_eq!(m.matching_blocks(), vec![block(3, 3, 0)]);
    }

    #[test]
    fn test_tie_break_makes_ratio_order_dependent() {
        let (a, b) = (chars("bab"), chars("abaab"));
        assert_eq!(score(&a, &b), 0.75);
        assert_eq!(score(&b, &a), 0.5);
    }

    #[test]
    fn test_autojunk_prunes_popular_elements() {
        let a = chars("xx");
        let mut b = vec!['u'];
        b.extend(std::iter::repeat('x').take(199));

        assert_eq!(score(&a, &b), 0.0);
        let plain = MatcherOptions { autojunk: false };
        assert_eq!(score_with_options(&a, &b, plain), 0.0198);
        // `a` is the indexed side here and too short to prune.
        assert_eq!(score(&b, &a), 0.0198);
    }

    #[test]
    fn test_popular_elements_extend_existing_matches() {
        let a = vec!['x'; 200];
        assert_eq!(score(&a, &a), 1.0);

        let mut b = vec!['x'; 150];
        b.push('k');
        b.extend(std::iter::repeat('x').take(60));
        let m = SequenceMatcher::new(&b, &b);
        assert_eq!(m.matching_blocks(), vec![block(0, 0, 211), block(211, 211, 0)]);
    }

    #[test]
    fn test_short_sequences_are_never_pruned() {
        let a = vec!['x'; 199];
        let b = vec!['x'; 100];
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.find_longest_match(0, 199, 0, 100), block(0, 0, 100));
    }

    #[test]
    fn test_ratio_is_unrounded() {
        let (a, b) = (chars("abc"), chars("abd"));
        let m = SequenceMatcher::new(&a, &b);
        assert!((m.ratio() - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(score(&a, &b), 0.6667);
    }

    #[test]
    fn test_round_ratio_half_to_even() {
        // 2/64 = 0.03125 exactly
        assert_eq!(round_ratio(1, 64), 0.0312);
        // 6/64 = 0.09375 exactly
        assert_eq!(round_ratio(3, 64), 0.0938);
        assert_eq!(round_ratio(1, 3), 0.6667);
        assert_eq!(round_ratio(5, 10), 1.0);
        assert_eq!(round_ratio(0, 10), 0.0);
        assert_eq!(round_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_round_ratio_follows_stored_float_on_decimal_ties() {
        // 2/8000 and 4938/40000 are decimal ties that f64 stores just above
        // the midpoint; 6/40000 is stored just below it.
        assert_eq!(round_ratio(1, 8000), 0.0003);
        assert_eq!(round_ratio(2469, 40000), 0.1235);
        assert_eq!(round_ratio(3, 40000), 0.0001);
        assert_eq!(round_ratio(1, 4000), 0.0005);
    }

    #[test]
    fn test_score_rounds_like_reference_on_long_sequences() {
        // One shared token across 8000 total; the rest never match.
        let mut a: Vec<u32> = (1..4000).collect();
        a.push(0);
        let mut b: Vec<u32> = (10_000..13_999).collect();
        b.push(0);
        assert_eq!(a.len() + b.len(), 8000);
        assert_eq!(SequenceMatcher::new(&a, &b).matched_len(), 1);
        assert_eq!(score(&a, &b), 0.0003);
    }

    fn token() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["identifier", "=", "(", ")", ":", "def", "integer", "return"])
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(
            a in prop::collection::vec(token(), 0..60),
            b in prop::collection::vec(token(), 0..60),
        ) {
            let s = score(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
        }

        #[test]
        fn prop_self_similarity_is_one(a in prop::collection::vec(token(), 1..300)) {
            prop_assert_eq!(score(&a, &a), 1.0);
        }

        #[test]
        fn prop_contained_sequence_is_symmetric(
            prefix in prop::collection::vec(token(), 0..20),
            core in prop::collection::vec(token(), 1..20),
            suffix in prop::collection::vec(token(), 0..20),
        ) {
            let outer: Vec<&str> = prefix.iter().chain(&core).chain(&suffix).copied().collect();
            prop_assert_eq!(SequenceMatcher::new(&core, &outer).matched_len(), core.len());
            prop_assert_eq!(score(&core, &outer), score(&outer, &core));
        }

        #[test]
        fn prop_blocks_are_real_matches(
            a in prop::collection::vec(token(), 0..80),
            b in prop::collection::vec(token(), 0..80),
        ) {
            let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
            let mut next_a = 0;
            let mut next_b = 0;
            for m in &blocks {
                prop_assert!(m.a >= next_a && m.b >= next_b, "blocks overlap");
                prop_assert_eq!(&a[m.a..m.a + m.size], &b[m.b..m.b + m.size]);
                next_a = m.a + m.size;
                next_b = m.b + m.size;
            }
            prop_assert_eq!(blocks.last().copied(), Some(block(a.len(), b.len(), 0)));
        }
    }
}
