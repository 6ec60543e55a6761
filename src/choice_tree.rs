//! The choice tree (spec.md §3/§4.5): every `pick` and `hasMore` made during
//! one run, recorded as an ordered list of segments. [`MutableTree`] is
//! built up during a live run; [`Tree`] is the immutable snapshot the
//! shrinker repeatedly transforms.
//!
//! Grounded in the teacher's own design-notes guidance (spec.md §9): replace
//! GC-reliant persistent lists with plain vectors, `Arc`-shared since these
//! trees are small and `ShrinkSearch` produces many candidate variations of
//! the same tree cheaply.

use crate::{
    generator::{AnyRepr, Generator, UntypedGenerator},
    size::Size,
};
use std::sync::Arc;

/// One entry picked during a run: the generator that produced it (erased
/// behind [`UntypedGenerator`] so segments can hold heterogeneous picks) and
/// the representation it produced.
#[derive(Clone)]
pub struct GeneratedValue {
    pub generator_name: &'static str,
    pub representation: AnyRepr,
    pub generator: Arc<dyn UntypedGenerator>,
}

impl GeneratedValue {
    pub fn new<G: Generator>(generator: &G, representation: G::Repr) -> Self {
        Self {
            generator_name: generator.name(),
            representation: Arc::new(representation),
            generator: Arc::new(generator.clone()),
        }
    }

    pub fn size(&self) -> Size {
        self.generator.size_any(&self.representation)
    }
}

impl std::fmt::Debug for GeneratedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedValue")
            .field("generator_name", &self.generator_name)
            .finish_non_exhaustive()
    }
}

/// One "round" of picks, bracketed by calls to `hasMore` (spec.md §3).
pub type Segment = Arc<Vec<GeneratedValue>>;

/// Built up while a run is live. `append_to_current_segment` records a pick;
/// `new_segment` is called on every `hasMore` transition.
#[derive(Clone, Default)]
pub struct MutableTree {
    segments: Vec<Vec<GeneratedValue>>,
}

impl MutableTree {
    pub fn new() -> Self {
        Self {
            segments: vec![Vec::new()],
        }
    }

    pub fn append_to_current_segment(&mut self, value: GeneratedValue) {
        if self.segments.is_empty() {
            self.segments.push(Vec::new());
        }
        self.segments
            .last_mut()
            .expect("segments is never empty")
            .push(value);
    }

    pub fn new_segment(&mut self) {
        self.segments.push(Vec::new());
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Converts the mutable tree built during a run into an immutable
    /// snapshot for replay/shrinking.
    pub fn into_immutable(self) -> Tree {
        Tree {
            segments: Arc::new(self.segments.into_iter().map(Arc::new).collect()),
        }
    }
}

/// An immutable, cheaply-clonable snapshot of a choice tree. `segments` is
/// shared behind one outer `Arc`; each individual segment is itself
/// `Arc`-shared so [`Tree::with_segments`] can replace a handful of entries
/// without copying the untouched segments.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    segments: Arc<Vec<Segment>>,
}

impl Tree {
    pub fn empty() -> Self {
        Self {
            segments: Arc::new(Vec::new()),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// A functional update: returns a new `Tree` with `segments` replaced
    /// wholesale.
    pub fn with_segments(&self, segments: Vec<Segment>) -> Self {
        Self {
            segments: Arc::new(segments),
        }
    }

    /// Finds the first record in `segment` whose generator name satisfies
    /// `predicate`, returning it alongside a copy of the segment with that
    /// record removed. Used by [`crate::driver::Driver::pick`] to match a
    /// preset entry by generator name.
    pub fn find_and_remove_matching(
        segment: &Segment,
        mut predicate: impl FnMut(&str) -> bool,
    ) -> Option<(GeneratedValue, Segment)> {
        let index = segment
            .iter()
            .position(|entry| predicate(entry.generator_name))?;
        let found = segment[index].clone();
        let mut rest = (**segment).clone();
        rest.remove(index);
        Some((found, Arc::new(rest)))
    }

    /// Sum of `generator.size(representation)` over every entry in every
    /// segment (spec.md §4.5).
    pub fn size(&self) -> Size {
        self.segments
            .iter()
            .flat_map(|segment| segment.iter())
            .map(|entry| entry.size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lazy_seq::LazySeq, random::Random};

    #[derive(Clone)]
    struct Fixed(i64);
    impl Generator for Fixed {
        type Item = i64;
        type Repr = i64;

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn random(&self, _random: &mut Random, _size: f64) -> i64 {
            self.0
        }

        fn enumerate(&self, _depth: usize) -> LazySeq<i64> {
            crate::lazy_seq::singleton(self.0)
        }

        fn shrink(&self, _repr: &i64) -> LazySeq<i64> {
            crate::lazy_seq::empty()
        }

        fn rvalue(&self, repr: &i64) -> Option<i64> {
            Some(*repr)
        }

        fn size(&self, repr: &i64) -> Size {
            Size::from(repr.unsigned_abs())
        }
    }

    #[test]
    fn mutable_tree_groups_by_segment() {
        let mut tree = MutableTree::new();
        let generator = Fixed(3);
        tree.append_to_current_segment(GeneratedValue::new(&generator, 3));
        tree.new_segment();
        tree.append_to_current_segment(GeneratedValue::new(&generator, 7));
        let immutable = tree.into_immutable();
        assert_eq!(immutable.segment_count(), 2);
        assert_eq!(immutable.segments()[0].len(), 1);
        assert_eq!(immutable.segments()[1].len(), 1);
    }

    #[test]
    fn size_sums_every_entry() {
        let mut tree = MutableTree::new();
        let generator = Fixed(0);
        tree.append_to_current_segment(GeneratedValue::new(&generator, 3));
        tree.append_to_current_segment(GeneratedValue::new(&generator, 4));
        let immutable = tree.into_immutable();
        assert_eq!(immutable.size(), Size::from(7u64));
    }

    #[test]
    fn find_and_remove_matching_removes_one_entry() {
        let generator = Fixed(0);
        let segment: Segment = Arc::new(vec![
            GeneratedValue::new(&generator, 1),
            GeneratedValue::new(&generator, 2),
        ]);
        let (found, rest) = Tree::find_and_remove_matching(&segment, |name| name == "fixed")
            .expect("entry found");
        assert_eq!(*found.representation.downcast_ref::<i64>().unwrap(), 1);
        assert_eq!(rest.len(), 1);
        assert_eq!(*rest[0].representation.downcast_ref::<i64>().unwrap(), 2);
    }
}
