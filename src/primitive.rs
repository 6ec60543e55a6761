//! The integer family, booleans, and alphabet-bounded strings (spec.md
//! §4.2). Grounded on the teacher's `src/primitive.rs` for the overall shape
//! (one generator struct per scalar domain, `size` asymmetric between
//! negative and positive integers) but with the exact random/enumerate/
//! shrink semantics spec.md §4.2 spells out rather than the teacher's own
//! heuristics.

use crate::{
    generator::Generator,
    lazy_seq::LazySeq,
    one_of::OneConstantOf,
    random::{Random, Stream},
    size::Size,
};

/// An inclusive integer range `[min, max]`. Every integer width in spec.md
/// §4.2 ("int8, int16, ... uint64") is this same generator, only reached
/// through a narrower constructor and repaired with `.map`/`.filter` at the
/// edges — spec.md's canonical representation is `i64`.
#[derive(Clone, Debug)]
pub struct Int {
    min: i64,
    max: i64,
}

impl Int {
    /// # Panics
    /// if `min > max`.
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "Int::new requires min <= max, got {min}..={max}");
        Self { min, max }
    }

    pub fn full() -> Self {
        Self::new(i64::MIN, i64::MAX)
    }

    pub fn non_negative(max: i64) -> Self {
        Self::new(0, max)
    }

    fn straddles_zero(&self) -> bool {
        self.min <= 0 && self.max >= 0
    }

    /// Every integer in `[min, max]`, zig-zagging outward from zero when the
    /// range straddles it (`0, 1, -1, 2, -2, ...`) so that the smallest
    /// representations are enumerated first, per spec.md §4.2.
    fn zigzag(&self) -> Vec<i64> {
        if self.straddles_zero() {
            let mut values = vec![0i64];
            let mut offset = 1i64;
            loop {
                let mut produced = false;
                if offset <= self.max {
                    values.push(offset);
                    produced = true;
                }
                if self.min <= -offset {
                    values.push(-offset);
                    produced = true;
                }
                if !produced {
                    break;
                }
                offset += 1;
            }
            values
        } else {
            (self.min..=self.max).collect()
        }
    }
}

impl Generator for Int {
    type Item = i64;
    type Repr = i64;

    fn name(&self) -> &'static str {
        "int"
    }

    /// spec.md §4.2's heuristic distribution: 10% the minimum, 5% the
    /// maximum, 35% a small-magnitude value from a normal distribution
    /// (only when the range straddles zero), the remainder uniform across
    /// the whole range. `Random::Fixed` (the `fuzzcheck` source) always
    /// takes the uniform path — heuristics are sampling-distribution bias,
    /// meaningless once the entire stream is an external fuzzer's bytes.
    fn random(&self, random: &mut Random, _size: f64) -> i64 {
        if self.min == self.max {
            return self.min;
        }
        if matches!(random, Random::Fixed(_)) {
            return random.uniform_i64(self.min, self.max);
        }
        let roll = random.next_f64();
        if roll < 0.10 {
            self.min
        } else if roll < 0.15 {
            self.max
        } else if self.straddles_zero() && roll < 0.50 {
            let magnitude = (random.next_normal().abs() * 3.0).floor() as i64;
            magnitude.clamp(self.min, self.max)
        } else {
            random.uniform_i64(self.min, self.max)
        }
    }

    fn enumerate(&self, depth: usize) -> LazySeq<i64> {
        crate::lazy_seq::take_exhaustive(depth, crate::lazy_seq::from_slice(self.zigzag()))
    }

    /// Negative `x` shrinks towards `{x/2, -x, x+1}`; positive `x` towards
    /// `{x/2, x-1}`; `0` never shrinks (spec.md §4.2). `size`'s asymmetry
    /// (see [`Int::size`]) is what makes `-x` strictly smaller than `x` here
    /// despite sharing a magnitude.
    fn shrink(&self, repr: &i64) -> LazySeq<i64> {
        let candidates: Vec<i64> = if *repr == 0 {
            Vec::new()
        } else if *repr < 0 {
            vec![repr / 2, -repr, repr + 1]
        } else {
            vec![repr / 2, repr - 1]
        };
        let candidates: Vec<i64> = candidates
            .into_iter()
            .filter(|candidate| self.min <= *candidate && *candidate <= self.max)
            .collect();
        crate::lazy_seq::from_slice(candidates)
    }

    fn rvalue(&self, repr: &i64) -> Option<i64> {
        Some((*repr).clamp(self.min, self.max))
    }

    /// `|x|`, doubled and incremented by one for negatives, so that a
    /// negative value and its positive mirror image never compare equal:
    /// "negatives weigh slightly more than equivalent positives" (spec.md
    /// §4.2).
    fn size(&self, repr: &i64) -> Size {
        let magnitude = Size::from(repr.unsigned_abs());
        let doubled = magnitude.clone() + magnitude;
        if *repr < 0 {
            doubled + Size::from(1u64)
        } else {
            doubled
        }
    }
}

/// `oneConstantOf([false, true])` (spec.md §4.2): booleans are not a
/// distinct primitive, just the simplest possible `oneConstantOf`.
pub fn bool_generator() -> OneConstantOf<bool> {
    OneConstantOf::new(vec![false, true])
}

/// A string drawn from a fixed alphabet (spec.md §4.2; default `{'a','b'}`).
/// The representation is the chosen `Vec<char>` rather than a `String`, so
/// [`crate::list_shrink`] can act on it positionally without re-parsing.
#[derive(Clone, Debug)]
pub struct Str {
    alphabet: Vec<char>,
}

impl Str {
    /// # Panics
    /// if `alphabet` is empty.
    pub fn new(alphabet: impl Into<Vec<char>>) -> Self {
        let alphabet = alphabet.into();
        assert!(!alphabet.is_empty(), "Str::new requires a non-empty alphabet");
        Self { alphabet }
    }

    /// The default alphabet spec.md §4.2 names: `{'a', 'b'}`.
    pub fn default_alphabet() -> Self {
        Self::new(vec!['a', 'b'])
    }

    fn char_at(&self, random: &mut Random) -> char {
        let index = random.uniform_u64(self.alphabet.len() as u64) as usize;
        self.alphabet[index]
    }

    fn shrink_one(&self, ch: &char) -> Vec<char> {
        match self.alphabet.iter().position(|candidate| candidate == ch) {
            Some(0) | None => Vec::new(),
            Some(index) => vec![self.alphabet[index - 1]],
        }
    }

    fn alphabet_index(&self, ch: &char) -> usize {
        self.alphabet
            .iter()
            .position(|candidate| candidate == ch)
            .unwrap_or(0)
    }
}

impl Generator for Str {
    type Item = String;
    type Repr = Vec<char>;

    fn name(&self) -> &'static str {
        "str"
    }

    /// Length uniform in `[0, size]`, each character uniform over the
    /// alphabet (spec.md §4.2).
    fn random(&self, random: &mut Random, size: f64) -> Vec<char> {
        let bound = size.max(0.0).floor() as u64 + 1;
        let length = random.uniform_u64(bound) as usize;
        (0..length).map(|_| self.char_at(random)).collect()
    }

    /// For each length `0..=depth`, every word of that length in
    /// lexicographic alphabet order (spec.md §4.2): infinite in principle,
    /// paginated by `depth`.
    fn enumerate(&self, depth: usize) -> LazySeq<Vec<char>> {
        let lengths = crate::lazy_seq::from_slice((0..=depth).collect());
        let alphabet = self.alphabet.clone();
        crate::lazy_seq::flat_map(lengths, move |length| strings_of_length(&alphabet, length))
    }

    fn shrink(&self, repr: &Vec<char>) -> LazySeq<Vec<char>> {
        let candidates = crate::list_shrink::shrink_list(repr, |ch| self.shrink_one(ch));
        crate::lazy_seq::from_slice(candidates)
    }

    fn rvalue(&self, repr: &Vec<char>) -> Option<String> {
        Some(repr.iter().collect())
    }

    /// Sum of alphabet indices (spec.md §4.2) — not the length: a string of
    /// early-alphabet characters is "smaller" than an equally long string of
    /// late-alphabet ones.
    fn size(&self, repr: &Vec<char>) -> Size {
        repr.iter()
            .map(|ch| Size::from(self.alphabet_index(ch)))
            .sum()
    }
}

/// Every alphabet-drawn string of exactly `length`, in lexicographic order
/// of alphabet index. Bounded (`alphabet.len().pow(length)`), so it is
/// materialized eagerly rather than streamed.
fn strings_of_length(alphabet: &[char], length: usize) -> LazySeq<Vec<char>> {
    let mut combinations = vec![Vec::new()];
    for _ in 0..length {
        let mut next = Vec::with_capacity(combinations.len() * alphabet.len());
        for prefix in &combinations {
            for ch in alphabet {
                let mut candidate = prefix.clone();
                candidate.push(*ch);
                next.push(candidate);
            }
        }
        combinations = next;
    }
    crate::lazy_seq::from_slice(combinations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_respects_bounds() {
        let generator = Int::new(-5, 5);
        let mut random = Random::seeded(7);
        for _ in 0..200 {
            let value = generator.random(&mut random, 1.0);
            assert!((-5..=5).contains(&value));
        }
    }

    #[test]
    fn fixed_source_takes_the_uniform_path() {
        let generator = Int::new(-5, 5);
        let mut random = Random::fixed(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        for _ in 0..8 {
            let value = generator.random(&mut random, 1.0);
            assert!((-5..=5).contains(&value));
        }
    }

    #[test]
    fn enumerate_zigzags_around_zero() {
        let generator = Int::new(-2, 2);
        let (values, exhaustive) = generator.enumerate(100).collect_with_exhaustive();
        assert_eq!(values, vec![0, 1, -1, 2, -2]);
        assert!(exhaustive);
    }

    #[test]
    fn enumerate_ascends_when_range_is_all_positive() {
        let generator = Int::new(3, 6);
        let (values, _) = generator.enumerate(100).collect_with_exhaustive();
        assert_eq!(values, vec![3, 4, 5, 6]);
    }

    #[test]
    fn shrink_of_zero_is_empty() {
        let generator = Int::full();
        let (values, _) = generator.shrink(&0).collect_with_exhaustive();
        assert!(values.is_empty());
    }

    #[test]
    fn shrink_candidates_are_strictly_smaller() {
        let generator = Int::full();
        for seed in [-37i64, -1, 7, 500] {
            let (candidates, _) = generator.shrink(&seed).collect_with_exhaustive();
            for candidate in candidates {
                assert!(
                    generator.size(&candidate).well_founded(&generator.size(&seed)),
                    "{candidate} not well-founded-smaller than {seed}"
                );
            }
        }
    }

    #[test]
    fn negative_mirror_is_smaller_than_its_positive_counterpart() {
        let generator = Int::full();
        assert!(generator.size(&-7).well_founded(&generator.size(&7)) == false);
        // -7's shrink set includes 7 (its positive mirror): confirm that
        // direction specifically is well-founded.
        assert!(generator.size(&7).well_founded(&generator.size(&-7)));
    }

    #[test]
    fn bool_generator_only_yields_both_values() {
        let generator = bool_generator();
        let mut random = Random::seeded(0);
        let mut saw = (false, false);
        for _ in 0..50 {
            match generator.random(&mut random, 1.0) {
                false => saw.0 = true,
                true => saw.1 = true,
            }
        }
        assert_eq!(saw, (true, true));
    }

    #[test]
    fn str_random_respects_the_size_budget() {
        let generator = Str::default_alphabet();
        let mut random = Random::seeded(3);
        for _ in 0..50 {
            let repr = generator.random(&mut random, 4.0);
            assert!(repr.len() <= 4);
            assert!(repr.iter().all(|ch| *ch == 'a' || *ch == 'b'));
        }
    }

    #[test]
    fn str_shrink_can_drop_to_empty() {
        let generator = Str::default_alphabet();
        let repr: Vec<char> = vec!['b', 'a', 'b', 'a', 'b'];
        let (candidates, _) = generator.shrink(&repr).collect_with_exhaustive();
        assert!(candidates.contains(&Vec::new()));
    }

    #[test]
    fn str_enumerate_lists_shortest_words_first() {
        let generator = Str::default_alphabet();
        let (values, exhaustive) = generator.enumerate(2).collect_with_exhaustive();
        assert_eq!(
            values,
            vec![
                vec![],
                vec!['a'],
                vec!['b'],
                vec!['a', 'a'],
                vec!['a', 'b'],
                vec!['b', 'a'],
                vec!['b', 'b'],
            ]
        );
        assert!(exhaustive);
    }
}
