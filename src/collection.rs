//! Slice/vec generators and the distinct/set/dict family built on top of
//! them (spec.md §4.2). Grounded on the teacher's `src/collect.rs`/
//! `src/array.rs` split (unbounded vs. fixed-length collection generators
//! live in separate types there too).

use crate::{
    generator::Generator,
    lazy_seq::LazySeq,
    random::{Random, Stream},
    size::Size,
};
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

/// Unrestricted-length `Vec<G::Item>` (spec.md §4.2's "Slice / List").
#[derive(Clone)]
pub struct Slice<G> {
    element: G,
}

impl<G: Generator> Slice<G> {
    pub fn new(element: G) -> Self {
        Self { element }
    }
}

impl<G: Generator> Generator for Slice<G> {
    type Item = Vec<G::Item>;
    type Repr = Vec<G::Repr>;

    fn name(&self) -> &'static str {
        "slice"
    }

    /// Length uniform in `[0, size)`, each element generated with a size
    /// budget of `size - 1` (spec.md §4.2: shrinking the size budget by one
    /// per nesting level is what makes deeply nested generators eventually
    /// bottom out).
    fn random(&self, random: &mut Random, size: f64) -> Vec<G::Repr> {
        let bound = size.max(0.0).floor() as u64;
        let length = random.uniform_u64(bound) as usize;
        let element_size = (size - 1.0).max(0.0);
        (0..length)
            .map(|_| self.element.random(random, element_size))
            .collect()
    }

    /// Slices of each length `0..=depth`, each built by extending a smaller
    /// slice with one more element (spec.md §4.2); always marked
    /// non-exhaustive since there is no natural length bound.
    fn enumerate(&self, depth: usize) -> LazySeq<Vec<G::Repr>> {
        let (elements, _) = self.element.enumerate(depth).collect_with_exhaustive();
        let mut by_length: Vec<Vec<G::Repr>> = vec![Vec::new()];
        let mut all = vec![Vec::new()];
        for _ in 0..depth {
            let mut next = Vec::new();
            for prefix in &by_length {
                for element in &elements {
                    let mut candidate = prefix.clone();
                    candidate.push(element.clone());
                    next.push(candidate);
                }
            }
            all.extend(next.iter().cloned());
            by_length = next;
        }
        crate::lazy_seq::non_exhaustive(crate::lazy_seq::from_slice(all))
    }

    fn shrink(&self, repr: &Vec<G::Repr>) -> LazySeq<Vec<G::Repr>> {
        let candidates = crate::list_shrink::shrink_list(repr, |element| {
            self.element.shrink(element).collect_with_exhaustive().0
        });
        crate::lazy_seq::from_slice(candidates)
    }

    fn rvalue(&self, repr: &Vec<G::Repr>) -> Option<Vec<G::Item>> {
        repr.iter().map(|element| self.element.rvalue(element)).collect()
    }

    fn size(&self, repr: &Vec<G::Repr>) -> Size {
        repr.iter().map(|element| self.element.size(element)).sum()
    }
}

/// `sliceFixedLength(n)` (spec.md §4.2): the product of `n` independent
/// draws from `element`. Shrinking never changes the length — only
/// one-element shrinks apply, since a bulk removal would violate the fixed
/// arity the name promises.
#[derive(Clone)]
pub struct SliceFixedLength<G> {
    element: G,
    length: usize,
}

impl<G: Generator> SliceFixedLength<G> {
    pub fn new(element: G, length: usize) -> Self {
        Self { element, length }
    }
}

impl<G: Generator> Generator for SliceFixedLength<G> {
    type Item = Vec<G::Item>;
    type Repr = Vec<G::Repr>;

    fn name(&self) -> &'static str {
        "slice_fixed_length"
    }

    fn random(&self, random: &mut Random, size: f64) -> Vec<G::Repr> {
        (0..self.length)
            .map(|_| self.element.random(random, size))
            .collect()
    }

    fn enumerate(&self, depth: usize) -> LazySeq<Vec<G::Repr>> {
        let (elements, _) = self.element.enumerate(depth).collect_with_exhaustive();
        let mut combinations = vec![Vec::new()];
        for _ in 0..self.length {
            let mut next = Vec::with_capacity(combinations.len() * elements.len().max(1));
            for prefix in &combinations {
                for element in &elements {
                    let mut candidate = prefix.clone();
                    candidate.push(element.clone());
                    next.push(candidate);
                }
            }
            combinations = next;
        }
        crate::lazy_seq::from_slice(combinations)
    }

    fn shrink(&self, repr: &Vec<G::Repr>) -> LazySeq<Vec<G::Repr>> {
        let candidates = crate::list_shrink::one_element_shrinks(repr, |element| {
            self.element.shrink(element).collect_with_exhaustive().0
        });
        crate::lazy_seq::from_slice(candidates)
    }

    fn rvalue(&self, repr: &Vec<G::Repr>) -> Option<Vec<G::Item>> {
        if repr.len() != self.length {
            return None;
        }
        repr.iter().map(|element| self.element.rvalue(element)).collect()
    }

    fn size(&self, repr: &Vec<G::Repr>) -> Size {
        repr.iter().map(|element| self.element.size(element)).sum()
    }
}

/// Number of retries [`SliceDistinct`] allows itself while hunting for a
/// not-yet-seen element, mirroring the 1000-retry budget spec.md §4.2 gives
/// `filter` (the two combinators face the same "predicate might never be
/// satisfied again" risk).
const DISTINCT_RETRY_BUDGET: usize = 1000;

/// A [`Slice`] whose elements are pairwise distinct under `PartialEq`
/// (spec.md §4.2: "enumeration and random sampling skip duplicates").
#[derive(Clone)]
pub struct SliceDistinct<G> {
    element: G,
}

impl<G: Generator> SliceDistinct<G>
where
    G::Repr: PartialEq,
{
    pub fn new(element: G) -> Self {
        Self { element }
    }
}

impl<G: Generator> Generator for SliceDistinct<G>
where
    G::Repr: PartialEq,
{
    type Item = Vec<G::Item>;
    type Repr = Vec<G::Repr>;

    fn name(&self) -> &'static str {
        "slice_distinct"
    }

    fn random(&self, random: &mut Random, size: f64) -> Vec<G::Repr> {
        let bound = size.max(0.0).floor() as u64;
        let target = random.uniform_u64(bound) as usize;
        let element_size = (size - 1.0).max(0.0);
        let mut out: Vec<G::Repr> = Vec::new();
        let mut attempts = 0;
        while out.len() < target && attempts < DISTINCT_RETRY_BUDGET {
            attempts += 1;
            let candidate = self.element.random(random, element_size);
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }

    fn enumerate(&self, depth: usize) -> LazySeq<Vec<G::Repr>> {
        let (elements, _) = self.element.enumerate(depth).collect_with_exhaustive();
        let mut all: Vec<Vec<G::Repr>> = vec![Vec::new()];
        let mut by_length = vec![Vec::new()];
        for _ in 0..depth {
            let mut next = Vec::new();
            for prefix in &by_length {
                for element in &elements {
                    if prefix.contains(element) {
                        continue;
                    }
                    let mut candidate = prefix.clone();
                    candidate.push(element.clone());
                    next.push(candidate);
                }
            }
            all.extend(next.iter().cloned());
            by_length = next;
        }
        crate::lazy_seq::non_exhaustive(crate::lazy_seq::from_slice(all))
    }

    fn shrink(&self, repr: &Vec<G::Repr>) -> LazySeq<Vec<G::Repr>> {
        let candidates = crate::list_shrink::shrink_list(repr, |element| {
            self.element.shrink(element).collect_with_exhaustive().0
        });
        let distinct: Vec<Vec<G::Repr>> = candidates
            .into_iter()
            .filter(|candidate| {
                candidate
                    .iter()
                    .enumerate()
                    .all(|(index, value)| !candidate[..index].contains(value))
            })
            .collect();
        crate::lazy_seq::from_slice(distinct)
    }

    fn rvalue(&self, repr: &Vec<G::Repr>) -> Option<Vec<G::Item>> {
        repr.iter().map(|element| self.element.rvalue(element)).collect()
    }

    fn size(&self, repr: &Vec<G::Repr>) -> Size {
        repr.iter().map(|element| self.element.size(element)).sum()
    }
}

/// A `HashSet<G::Item>` (spec.md §4.2: "built on top of `sliceDistinct` ...
/// folded into the container"). Shares [`SliceDistinct`]'s representation
/// entirely; only `rvalue` differs (folding into a `HashSet` rather than a
/// `Vec`).
#[derive(Clone)]
pub struct Set<G> {
    inner: SliceDistinct<G>,
}

impl<G: Generator> Set<G>
where
    G::Repr: PartialEq,
{
    pub fn new(element: G) -> Self {
        Self {
            inner: SliceDistinct::new(element),
        }
    }
}

impl<G: Generator> Generator for Set<G>
where
    G::Repr: PartialEq,
    G::Item: Eq + Hash,
{
    type Item = HashSet<G::Item>;
    type Repr = Vec<G::Repr>;

    fn name(&self) -> &'static str {
        "set"
    }

    fn random(&self, random: &mut Random, size: f64) -> Vec<G::Repr> {
        self.inner.random(random, size)
    }

    fn enumerate(&self, depth: usize) -> LazySeq<Vec<G::Repr>> {
        self.inner.enumerate(depth)
    }

    fn shrink(&self, repr: &Vec<G::Repr>) -> LazySeq<Vec<G::Repr>> {
        self.inner.shrink(repr)
    }

    fn rvalue(&self, repr: &Vec<G::Repr>) -> Option<HashSet<G::Item>> {
        self.inner.rvalue(repr).map(|values| values.into_iter().collect())
    }

    fn size(&self, repr: &Vec<G::Repr>) -> Size {
        self.inner.size(repr)
    }
}

/// A `HashMap<K::Item, V::Item>` (spec.md §4.2): keys generated distinctly
/// (via the key generator alone, mirroring `sliceDistinct`), each paired
/// with one independently generated value.
#[derive(Clone)]
pub struct Dict<K, V> {
    key: K,
    value: V,
}

impl<K: Generator, V: Generator> Dict<K, V>
where
    K::Repr: PartialEq,
{
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Generator, V: Generator> Generator for Dict<K, V>
where
    K::Repr: PartialEq,
    K::Item: Eq + Hash,
{
    type Item = HashMap<K::Item, V::Item>;
    type Repr = Vec<(K::Repr, V::Repr)>;

    fn name(&self) -> &'static str {
        "dict"
    }

    fn random(&self, random: &mut Random, size: f64) -> Vec<(K::Repr, V::Repr)> {
        let bound = size.max(0.0).floor() as u64;
        let target = random.uniform_u64(bound) as usize;
        let element_size = (size - 1.0).max(0.0);
        let mut out: Vec<(K::Repr, V::Repr)> = Vec::new();
        let mut attempts = 0;
        while out.len() < target && attempts < DISTINCT_RETRY_BUDGET {
            attempts += 1;
            let key = self.key.random(random, element_size);
            if out.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            let value = self.value.random(random, element_size);
            out.push((key, value));
        }
        out
    }

    fn enumerate(&self, depth: usize) -> LazySeq<Vec<(K::Repr, V::Repr)>> {
        let (keys, _) = self.key.enumerate(depth).collect_with_exhaustive();
        let (values, _) = self.value.enumerate(depth).collect_with_exhaustive();
        let mut all: Vec<Vec<(K::Repr, V::Repr)>> = vec![Vec::new()];
        let mut by_length = vec![Vec::new()];
        for _ in 0..depth {
            let mut next = Vec::new();
            for prefix in &by_length {
                for key in &keys {
                    if prefix.iter().any(|(existing, _): &(K::Repr, V::Repr)| existing == key) {
                        continue;
                    }
                    for value in &values {
                        let mut candidate = prefix.clone();
                        candidate.push((key.clone(), value.clone()));
                        next.push(candidate);
                    }
                }
            }
            all.extend(next.iter().cloned());
            by_length = next;
        }
        crate::lazy_seq::non_exhaustive(crate::lazy_seq::from_slice(all))
    }

    fn shrink(&self, repr: &Vec<(K::Repr, V::Repr)>) -> LazySeq<Vec<(K::Repr, V::Repr)>> {
        let candidates = crate::list_shrink::shrink_list(repr, |(key, value)| {
            let mut out = Vec::new();
            let (shrunk_keys, _) = self.key.shrink(key).collect_with_exhaustive();
            for shrunk_key in shrunk_keys {
                out.push((shrunk_key, value.clone()));
            }
            let (shrunk_values, _) = self.value.shrink(value).collect_with_exhaustive();
            for shrunk_value in shrunk_values {
                out.push((key.clone(), shrunk_value));
            }
            out
        });
        let distinct: Vec<Vec<(K::Repr, V::Repr)>> = candidates
            .into_iter()
            .filter(|candidate: &Vec<(K::Repr, V::Repr)>| {
                candidate.iter().enumerate().all(|(index, (key, _))| {
                    !candidate[..index].iter().any(|(existing, _)| existing == key)
                })
            })
            .collect();
        crate::lazy_seq::from_slice(distinct)
    }

    fn rvalue(&self, repr: &Vec<(K::Repr, V::Repr)>) -> Option<HashMap<K::Item, V::Item>> {
        repr.iter()
            .map(|(key, value)| Some((self.key.rvalue(key)?, self.value.rvalue(value)?)))
            .collect()
    }

    fn size(&self, repr: &Vec<(K::Repr, V::Repr)>) -> Size {
        repr.iter()
            .map(|(key, value)| self.key.size(key) + self.value.size(value))
            .sum()
    }
}
