//! The [`Test`] context handed to a test body (spec.md §4.6), and the three
//! ways it can be driven: [`Test::random`], [`Test::exhaustive`],
//! [`Test::replay`]. The bulk of the pick bookkeeping (appending to the
//! mutable tree) is shared across all three, so — matching the teacher's own
//! habit of modeling a driving loop as one state machine rather than three
//! trait impls (`check::Checks`'s `Machine` enum) — this is one struct with
//! one enum discriminant (`Source`) rather than three separate types.

use crate::{
    choice_tree::{GeneratedValue, MutableTree, Segment, Tree},
    error::GeneratorError,
    generator::{AnyRepr, Generator},
    lazy_seq::{Cursor, Next},
    random::{Random, Stream},
};
use std::sync::Arc;

/// A dedicated, zero-sized panic payload distinguishing `Test::fail_now`'s
/// non-local exit from an ordinary panic in the test body (spec.md §5/§7).
pub(crate) struct FailNowSignal;

/// A dedicated panic payload signalling that a generator's enumeration was
/// empty at the current depth (spec.md §4.7 point 4, §7's "enumeration
/// exhausted early" category). Caught only by [`crate::smallcheck`].
pub(crate) struct EmptyIteratorSignal;

enum Source<'a> {
    Random(Random),
    Exhaustive {
        stack: &'a mut ExhaustiveStack,
        /// Caps `hasMore`'s segment count this round (spec.md §4.7 point 1:
        /// "hasMore returns true up to depth times"). Grows across outer
        /// loop iterations in [`crate::smallcheck`].
        round_cap: usize,
        /// The `depth` argument every `g.enumerate(depth)` call receives:
        /// always `config.depth`, never `round_cap`. A fixed-arity pick
        /// (no `hasMore` in sight) must see a generator's *whole* domain
        /// from the very first round, or growing `round_cap` later would
        /// force its entry to be rebuilt and restart from the first
        /// element — revisiting states already explored. Using the final
        /// depth from the start means each position enumerates its domain
        /// exactly once, however large `config.depth` is.
        enumerate_depth: usize,
        position: usize,
    },
    Replay {
        preset: Tree,
        segment_index: usize,
        fallback: Random,
    },
}

/// The context object handed to a test body.
pub struct Test<'a> {
    tree: MutableTree,
    source: Source<'a>,
    max_size: f64,
    failed: bool,
    log: String,
}

impl<'a> Test<'a> {
    pub fn random(random: Random, max_size: f64) -> Self {
        Self {
            tree: MutableTree::new(),
            source: Source::Random(random),
            max_size,
            failed: false,
            log: String::new(),
        }
    }

    pub fn exhaustive(
        stack: &'a mut ExhaustiveStack,
        round_cap: usize,
        enumerate_depth: usize,
        max_size: f64,
    ) -> Self {
        Self {
            tree: MutableTree::new(),
            source: Source::Exhaustive {
                stack,
                round_cap,
                enumerate_depth,
                position: 0,
            },
            max_size,
            failed: false,
            log: String::new(),
        }
    }

    pub fn replay(preset: Tree, fallback: Random, max_size: f64) -> Self {
        Self {
            tree: MutableTree::new(),
            source: Source::Replay {
                preset,
                segment_index: 0,
                fallback,
            },
            max_size,
            failed: false,
            log: String::new(),
        }
    }

    /// Samples, enumerates, or replays one value from `generator` and
    /// records the pick in the current segment of the mutable tree.
    pub fn pick<G: Generator>(&mut self, generator: &G) -> G::Item {
        let repr = match &mut self.source {
            Source::Random(random) => generator.random(random, self.max_size),
            Source::Exhaustive {
                stack,
                enumerate_depth,
                position,
                ..
            } => {
                let repr = stack.pick(generator, *position, *enumerate_depth);
                *position += 1;
                repr
            }
            Source::Replay {
                preset,
                segment_index,
                fallback,
            } => {
                let segment_index = *segment_index;
                let segment = preset.segments().get(segment_index).cloned();
                let found = segment.and_then(|segment| {
                    Tree::find_and_remove_matching(&segment, |name| name == generator.name())
                });
                match found {
                    Some((found, rest)) => {
                        let mut segments: Vec<Segment> = preset.segments().to_vec();
                        segments[segment_index] = rest;
                        *preset = preset.with_segments(segments);
                        found
                            .representation
                            .downcast_ref::<G::Repr>()
                            .cloned()
                            .unwrap_or_else(|| generator.random(fallback, self.max_size))
                    }
                    None => generator.random(fallback, self.max_size),
                }
            }
        };
        self.tree
            .append_to_current_segment(GeneratedValue::new(generator, repr.clone()));
        match generator.rvalue(&repr) {
            Some(item) => item,
            None => panic!(
                "{}",
                GeneratorError::Unrepairable {
                    generator: generator.name()
                }
            ),
        }
    }

    /// Whether the test body should keep generating another round.
    pub fn has_more(&mut self) -> bool {
        match &mut self.source {
            Source::Random(random) => {
                let more = random.coin_from_probability(1.0 - 1.0 / self.max_size.max(1.0));
                if more {
                    self.tree.new_segment();
                }
                more
            }
            Source::Exhaustive {
                stack,
                round_cap,
                position,
                ..
            } => {
                // `hasMore` is independent of individual pick positions; it
                // simply caps the number of segments (rounds) at `round_cap`.
                let segments_so_far = self.tree.segment_count();
                let more = segments_so_far < *round_cap;
                if more {
                    self.tree.new_segment();
                } else {
                    // The cap, not the body's own choice, is why this round
                    // stopped: a deeper `Depth` could reach new states here.
                    stack.mark_capped();
                }
                let _ = position;
                more
            }
            Source::Replay {
                preset,
                segment_index,
                ..
            } => {
                let more = *segment_index + 1 < preset.segments().len();
                if more {
                    *segment_index += 1;
                    self.tree.new_segment();
                }
                more
            }
        }
    }

    pub fn logf(&mut self, message: impl AsRef<str>) {
        self.log.push_str(message.as_ref());
        self.log.push('\n');
    }

    pub fn errorf(&mut self, message: impl AsRef<str>) {
        self.failed = true;
        self.logf(message);
    }

    /// `errorf` only on `Err`, so a test body written against `Result<(), E>`
    /// can report failure without matching on it itself.
    pub fn accept<E: std::fmt::Debug>(&mut self, result: Result<(), E>) {
        if let Err(error) = result {
            self.errorf(format!("{error:?}"));
        }
    }

    /// Sets the failed flag and unwinds the run via [`FailNowSignal`].
    pub fn fail_now(&mut self) -> ! {
        self.failed = true;
        std::panic::panic_any(FailNowSignal);
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    /// Finishes the run, handing back the recorded tree.
    pub fn into_tree(self) -> Tree {
        self.tree.into_immutable()
    }
}

/// `fastrand`-backed probability coin, used by [`Test::has_more`]'s random
/// path (spec.md §4.6: "`1 − 1/maxSize`" boundary).
trait CoinFromProbability {
    fn coin_from_probability(&mut self, probability: f64) -> bool;
}

impl CoinFromProbability for Random {
    fn coin_from_probability(&mut self, probability: f64) -> bool {
        self.next_f64() < probability.clamp(0.0, 1.0)
    }
}

/// The stack of per-pick-position enumeration cursors shared across the
/// sequence of runs a `smallcheck` exploration performs (spec.md §4.7).
/// Positional, not name-matched: the `i`-th `pick` call of every run in the
/// exploration is assumed to be the `i`-th stack entry.
#[derive(Default)]
pub struct ExhaustiveStack {
    entries: Vec<StackEntry>,
    /// Set by [`Test::has_more`] when a round stopped strictly because
    /// `depth` was reached, not because the body chose to stop. Read by
    /// [`crate::smallcheck`] between depths: if no run ever hit the cap, a
    /// deeper `Depth` cannot discover new states, so exploration can stop for
    /// good instead of repeating the same traversal.
    capped: bool,
}

struct StackEntry {
    cursor: Box<dyn Cursor<AnyRepr>>,
    current: AnyRepr,
}

impl ExhaustiveStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            capped: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn mark_capped(&mut self) {
        self.capped = true;
    }

    pub(crate) fn is_capped(&self) -> bool {
        self.capped
    }

    pub(crate) fn reset_capped(&mut self) {
        self.capped = false;
    }

    fn pick<G: Generator>(&mut self, generator: &G, position: usize, depth: usize) -> G::Repr {
        if let Some(entry) = self.entries.get(position) {
            return entry
                .current
                .downcast_ref::<G::Repr>()
                .cloned()
                .expect("stack position's generator is stable across runs of one exploration");
        }
        debug_assert_eq!(position, self.entries.len());
        let mut cursor = generator.enumerate(depth).cursor();
        match cursor.advance() {
            Next::Value(repr) => {
                let current: AnyRepr = Arc::new(repr.clone());
                self.entries.push(StackEntry {
                    cursor: Box::new(ErasedCursor { inner: cursor }),
                    current,
                });
                repr
            }
            Next::DoneExhaustive | Next::DoneNonExhaustive => {
                std::panic::panic_any(EmptyIteratorSignal)
            }
        }
    }

    /// Advances the deepest iterator; if it is exhausted, truncates the
    /// stack at that position and recurses on the depth above
    /// (spec.md §4.7 point 2).
    pub fn advance(&mut self, mut position: isize) {
        loop {
            if position < 0 {
                self.entries.clear();
                return;
            }
            let index = position as usize;
            if index >= self.entries.len() {
                return;
            }
            match self.entries[index].cursor.advance() {
                Next::Value(repr) => {
                    self.entries[index].current = repr;
                    return;
                }
                Next::DoneExhaustive | Next::DoneNonExhaustive => {
                    self.entries.truncate(index);
                    position -= 1;
                }
            }
        }
    }
}

struct ErasedCursor<T> {
    inner: Box<dyn Cursor<T>>,
}

impl<T: Clone + Send + 'static> Cursor<AnyRepr> for ErasedCursor<T> {
    fn advance(&mut self) -> Next<AnyRepr> {
        self.inner.advance().map(|value| Arc::new(value) as AnyRepr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy_seq::LazySeq;
    use crate::size::Size;

    #[derive(Clone)]
    struct SmallInt(i64, i64);
    impl Generator for SmallInt {
        type Item = i64;
        type Repr = i64;

        fn name(&self) -> &'static str {
            "small_int"
        }

        fn random(&self, random: &mut Random, _size: f64) -> i64 {
            self.0 + random.uniform_u64((self.1 - self.0 + 1) as u64) as i64
        }

        fn enumerate(&self, _depth: usize) -> LazySeq<i64> {
            crate::lazy_seq::from_slice((self.0..=self.1).collect())
        }

        fn shrink(&self, repr: &i64) -> LazySeq<i64> {
            if *repr == 0 {
                crate::lazy_seq::empty()
            } else {
                crate::lazy_seq::singleton(repr / 2)
            }
        }

        fn rvalue(&self, repr: &i64) -> Option<i64> {
            Some(*repr)
        }

        fn size(&self, repr: &i64) -> Size {
            Size::from(repr.unsigned_abs())
        }
    }

    #[test]
    fn random_pick_records_tree() {
        let mut test = Test::random(Random::seeded(1), 1.0);
        let generator = SmallInt(0, 9);
        let value = test.pick(&generator);
        assert!((0..=9).contains(&value));
        let tree = test.into_tree();
        assert_eq!(tree.segments()[0].len(), 1);
    }

    #[test]
    fn replay_reuses_preset_entries() {
        let mut first = Test::random(Random::seeded(42), 1.0);
        let generator = SmallInt(0, 9);
        let original = first.pick(&generator);
        let preset = first.into_tree();

        let mut replay = Test::replay(preset, Random::seeded(0), 1.0);
        let replayed = replay.pick(&generator);
        assert_eq!(original, replayed);
    }

    #[test]
    fn exhaustive_stack_reuses_position_across_runs() {
        let mut stack = ExhaustiveStack::new();
        let generator = SmallInt(0, 2);
        {
            let mut test = Test::exhaustive(&mut stack, 1, 3, 1.0);
            assert_eq!(test.pick(&generator), 0);
        }
        {
            let mut test = Test::exhaustive(&mut stack, 1, 3, 1.0);
            assert_eq!(test.pick(&generator), 0, "same position replays same value");
        }
        stack.advance(0);
        {
            let mut test = Test::exhaustive(&mut stack, 1, 3, 1.0);
            assert_eq!(test.pick(&generator), 1, "advance moves to the next value");
        }
    }

    #[test]
    fn fail_now_unwinds_with_signal() {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut test = Test::random(Random::seeded(0), 1.0);
            test.fail_now();
        }));
        let error = result.expect_err("fail_now always panics");
        assert!(error.downcast_ref::<FailNowSignal>().is_some());
    }
}
