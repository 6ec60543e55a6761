//! Shrinking a failing choice tree down to a smaller failing one (spec.md
//! §4.8). Deadline-bounded, anytime: returns the best candidate found so far
//! if the deadline expires before a fixpoint is reached.

use crate::choice_tree::{GeneratedValue, Segment, Tree};
use std::{sync::Arc, time::Instant};

/// Re-runs the test body with `preset` as the driver's source, returning the
/// resulting tree and whether that run failed. Supplied by a [`crate::
/// Runner`] so this module never has to know how a body is invoked, caught,
/// or turned into pass/fail.
pub trait RunWith {
    fn run_with(&mut self, preset: Tree) -> (Tree, bool);
}

impl<F: FnMut(Tree) -> (Tree, bool)> RunWith for F {
    fn run_with(&mut self, preset: Tree) -> (Tree, bool) {
        (self)(preset)
    }
}

/// Shrinks `failing` towards a smaller failing tree, honouring `deadline`.
/// Termination follows spec.md invariant 1: every accepted candidate
/// strictly decreases [`Tree::size`], a well-founded measure, so the loop
/// cannot run forever even without a deadline.
pub fn run(failing: Tree, deadline: Instant, mut run_with: impl RunWith) -> Tree {
    let mut current = failing;
    loop {
        let mut improved = false;
        for candidate in shrink_candidates(&current) {
            if Instant::now() >= deadline {
                return current;
            }
            let (tree, failed) = run_with.run_with(candidate);
            if failed && tree.size() < current.size() {
                current = tree;
                improved = true;
                break;
            }
        }
        if !improved {
            break;
        }
    }
    current
}

/// Tail-biased drops of whole segments, followed by one-element-style
/// refinements within a single segment (spec.md §4.8: `shrinkListTail
/// (segments(t), shrinkSegment)`). Earlier segments are preserved for as
/// long as possible, matching the test's earlier decisions being the most
/// expensive to lose.
fn shrink_candidates(tree: &Tree) -> Vec<Tree> {
    let segments = tree.segments();
    let mut candidates: Vec<Tree> = crate::list_shrink::shrink_list_tail(segments)
        .into_iter()
        .map(|shorter| tree.with_segments(shorter))
        .collect();
    for (index, segment) in segments.iter().enumerate() {
        for variant in shrink_segment(segment) {
            let mut replaced = segments.to_vec();
            replaced[index] = variant;
            candidates.push(tree.with_segments(replaced));
        }
    }
    candidates
}

/// `listShrinkOne` across one segment's entries: each entry replaced, one at
/// a time, by a smaller representation drawn from its own generator's
/// `shrink`.
fn shrink_segment(segment: &Segment) -> Vec<Segment> {
    crate::list_shrink::one_element_shrinks(segment, |entry| {
        let (reprs, _) = entry.generator.shrink_any(&entry.representation).collect_with_exhaustive();
        reprs
            .into_iter()
            .map(|repr| GeneratedValue {
                generator_name: entry.generator_name,
                representation: repr,
                generator: entry.generator.clone(),
            })
            .collect()
    })
    .into_iter()
    .map(Arc::new)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        choice_tree::MutableTree,
        generator::Generator,
        lazy_seq::LazySeq,
        random::Random,
        size::Size,
    };
    use std::time::Duration;

    #[derive(Clone)]
    struct SmallInt;
    impl Generator for SmallInt {
        type Item = i64;
        type Repr = i64;

        fn name(&self) -> &'static str {
            "small_int"
        }

        fn random(&self, random: &mut Random, _size: f64) -> i64 {
            use crate::random::Stream;
            random.uniform_u64(20) as i64
        }

        fn enumerate(&self, _depth: usize) -> LazySeq<i64> {
            crate::lazy_seq::empty()
        }

        fn shrink(&self, repr: &i64) -> LazySeq<i64> {
            if *repr == 0 {
                crate::lazy_seq::empty()
            } else {
                crate::lazy_seq::from_slice(vec![repr / 2, repr - 1])
            }
        }

        fn rvalue(&self, repr: &i64) -> Option<i64> {
            Some(*repr)
        }

        fn size(&self, repr: &i64) -> Size {
            Size::from(repr.unsigned_abs())
        }
    }

    fn tree_with(value: i64) -> Tree {
        let mut tree = MutableTree::new();
        tree.append_to_current_segment(GeneratedValue::new(&SmallInt, value));
        tree.into_immutable()
    }

    #[test]
    fn shrinks_towards_the_failing_threshold() {
        let failing = tree_with(19);
        let deadline = Instant::now() + Duration::from_secs(5);
        let result = run(failing, deadline, |preset: Tree| {
            let value = preset
                .segments()
                .first()
                .and_then(|segment| segment.first())
                .and_then(|entry| entry.representation.downcast_ref::<i64>())
                .copied();
            match value {
                Some(value) if value >= 10 => (preset, true),
                _ => (preset, false),
            }
        });
        let shrunk = *result.segments()[0][0].representation.downcast_ref::<i64>().unwrap();
        assert_eq!(shrunk, 10);
    }

    #[test]
    fn respects_an_already_expired_deadline() {
        let failing = tree_with(19);
        let deadline = Instant::now();
        let result = run(failing, deadline, |preset: Tree| (preset, true));
        let value = *result.segments()[0][0].representation.downcast_ref::<i64>().unwrap();
        assert_eq!(value, 19, "no candidate should run past an expired deadline");
    }
}
