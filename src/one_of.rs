//! `oneOf`, `oneConstantOf`, `constant` and `empty` (spec.md §4.4). Grounded
//! on the teacher's `src/any.rs`/`src/constant.rs`/`src/convenient.rs` trio,
//! which split the same three ideas (pick one of several generators, pick
//! one of several constants, always the same value) into separate types
//! rather than one parameterized one.

use crate::{
    boxed::BoxedGenerator,
    generator::{AnyRepr, Generator},
    lazy_seq::LazySeq,
    random::{Random, Stream},
    size::Size,
};
use std::{marker::PhantomData, sync::Arc};

/// Uniformly samples one of `alternatives`, recording which branch was
/// picked so `shrink` only ever shrinks within that branch (spec.md §4.4:
/// "shrinking never crosses branches").
pub struct OneOf<T> {
    alternatives: Arc<Vec<BoxedGenerator<T>>>,
}

impl<T> Clone for OneOf<T> {
    fn clone(&self) -> Self {
        Self {
            alternatives: self.alternatives.clone(),
        }
    }
}

/// The representation of a [`OneOf`] pick: which branch, and that branch's
/// own erased representation.
#[derive(Clone)]
pub struct OneOfRepr {
    index: usize,
    inner: AnyRepr,
}

impl<T> OneOf<T> {
    /// # Panics
    /// if `alternatives` is empty; a `oneOf` with nothing to choose from is a
    /// construction error, not a runtime one.
    pub fn new(alternatives: Vec<BoxedGenerator<T>>) -> Self {
        assert!(
            !alternatives.is_empty(),
            "one_of requires at least one alternative"
        );
        Self {
            alternatives: Arc::new(alternatives),
        }
    }
}

impl<T: Send + Sync + 'static> Generator for OneOf<T> {
    type Item = T;
    type Repr = OneOfRepr;

    fn name(&self) -> &'static str {
        "one_of"
    }

    fn random(&self, random: &mut Random, size: f64) -> OneOfRepr {
        let index = random.uniform_u64(self.alternatives.len() as u64) as usize;
        OneOfRepr {
            index,
            inner: self.alternatives[index].random(random, size),
        }
    }

    fn enumerate(&self, depth: usize) -> LazySeq<OneOfRepr> {
        let branches: Vec<LazySeq<OneOfRepr>> = self
            .alternatives
            .iter()
            .enumerate()
            .map(|(index, generator)| {
                generator
                    .enumerate(depth)
                    .map(move |inner| OneOfRepr { index, inner })
            })
            .collect();
        let indices = crate::lazy_seq::from_slice((0..branches.len()).collect());
        let branches = Arc::new(branches);
        crate::lazy_seq::flat_map_breadth_first(indices, move |index| branches[index].clone())
    }

    fn shrink(&self, repr: &OneOfRepr) -> LazySeq<OneOfRepr> {
        let index = repr.index;
        self.alternatives[index]
            .shrink(&repr.inner)
            .map(move |inner| OneOfRepr { index, inner })
    }

    fn rvalue(&self, repr: &OneOfRepr) -> Option<T> {
        self.alternatives
            .get(repr.index)?
            .rvalue(&repr.inner)
    }

    fn size(&self, repr: &OneOfRepr) -> Size {
        self.alternatives
            .get(repr.index)
            .map(|generator| generator.size(&repr.inner))
            .unwrap_or_else(Size::zero)
    }
}

/// Uniformly samples one of a fixed set of constant values (spec.md §4.4;
/// `bool`'s generator in [`crate::primitive`] is `one_constant_of([false,
/// true])`). Shrinks towards the front of `values`, so listing the simplest
/// value first produces the expected shrink direction.
pub struct OneConstantOf<T> {
    values: Arc<Vec<T>>,
}

impl<T> Clone for OneConstantOf<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T> OneConstantOf<T> {
    /// # Panics
    /// if `values` is empty.
    pub fn new(values: Vec<T>) -> Self {
        assert!(!values.is_empty(), "one_constant_of requires at least one value");
        Self {
            values: Arc::new(values),
        }
    }
}

impl<T> Generator for OneConstantOf<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type Item = T;
    type Repr = T;

    fn name(&self) -> &'static str {
        "one_constant_of"
    }

    fn random(&self, random: &mut Random, _size: f64) -> T {
        let index = random.uniform_u64(self.values.len() as u64) as usize;
        self.values[index].clone()
    }

    fn enumerate(&self, depth: usize) -> LazySeq<T> {
        crate::lazy_seq::take_exhaustive(depth, crate::lazy_seq::from_slice((*self.values).clone()))
    }

    fn shrink(&self, repr: &T) -> LazySeq<T> {
        match self.values.iter().position(|value| value == repr) {
            Some(0) | None => crate::lazy_seq::empty(),
            Some(index) => crate::lazy_seq::singleton(self.values[index - 1].clone()),
        }
    }

    fn rvalue(&self, repr: &T) -> Option<T> {
        if self.values.contains(repr) {
            Some(repr.clone())
        } else {
            self.values.first().cloned()
        }
    }

    fn size(&self, repr: &T) -> Size {
        match self.values.iter().position(|value| value == repr) {
            Some(index) => Size::from(index),
            None => Size::zero(),
        }
    }
}

/// Always produces the same value, never shrinks (spec.md §4.4).
pub struct Constant<T> {
    value: Arc<T>,
}

impl<T> Clone for Constant<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T> Constant<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Generator for Constant<T> {
    type Item = T;
    type Repr = T;

    fn name(&self) -> &'static str {
        "constant"
    }

    fn random(&self, _random: &mut Random, _size: f64) -> T {
        (*self.value).clone()
    }

    fn enumerate(&self, _depth: usize) -> LazySeq<T> {
        crate::lazy_seq::singleton((*self.value).clone())
    }

    fn shrink(&self, _repr: &T) -> LazySeq<T> {
        crate::lazy_seq::empty()
    }

    fn rvalue(&self, repr: &T) -> Option<T> {
        Some(repr.clone())
    }

    fn size(&self, _repr: &T) -> Size {
        Size::zero()
    }
}

/// Produces no values at all. `random` panics if ever actually sampled
/// (spec.md §4.4 lists `empty` as a construction building-block, never
/// intended to be picked from directly — combinators such as `filter` treat
/// an `empty()` fallback as "no legal value exists").
pub struct Empty<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Empty<T> {
    fn clone(&self) -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T> Default for Empty<T> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Generator for Empty<T> {
    type Item = T;
    type Repr = T;

    fn name(&self) -> &'static str {
        "empty"
    }

    fn random(&self, _random: &mut Random, _size: f64) -> T {
        panic!("empty generator has no values to sample")
    }

    fn enumerate(&self, _depth: usize) -> LazySeq<T> {
        crate::lazy_seq::empty()
    }

    fn shrink(&self, _repr: &T) -> LazySeq<T> {
        crate::lazy_seq::empty()
    }

    fn rvalue(&self, _repr: &T) -> Option<T> {
        None
    }

    fn size(&self, _repr: &T) -> Size {
        Size::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Int;

    #[test]
    fn one_constant_of_shrinks_towards_the_front() {
        let generator = OneConstantOf::new(vec!["a", "b", "c"]);
        let (values, _) = generator.shrink(&"c").collect_with_exhaustive();
        assert_eq!(values, vec!["b"]);
    }

    #[test]
    fn one_constant_of_shrink_of_first_is_empty() {
        let generator = OneConstantOf::new(vec![false, true]);
        let (values, _) = generator.shrink(&false).collect_with_exhaustive();
        assert!(values.is_empty());
    }

    #[test]
    fn constant_never_shrinks() {
        let generator = Constant::new(5);
        let (values, exhaustive) = generator.shrink(&5).collect_with_exhaustive();
        assert!(values.is_empty());
        assert!(exhaustive);
    }

    #[test]
    fn one_of_random_picks_a_branch_and_records_it() {
        let generator = OneOf::new(vec![
            BoxedGenerator::new(Int::new(0, 0)),
            BoxedGenerator::new(Int::new(100, 100)),
        ]);
        let mut random = Random::seeded(1);
        let repr = generator.random(&mut random, 1.0);
        let value = generator.rvalue(&repr).unwrap();
        assert!(value == 0 || value == 100);
    }

    #[test]
    fn one_of_shrink_stays_within_the_chosen_branch() {
        let generator = OneOf::new(vec![
            BoxedGenerator::new(Int::new(0, 10)),
            BoxedGenerator::new(Int::new(1000, 1010)),
        ]);
        let repr = OneOfRepr {
            index: 1,
            inner: Arc::new(1010i64),
        };
        let (shrunk, _) = generator.shrink(&repr).collect_with_exhaustive();
        for candidate in &shrunk {
            assert_eq!(candidate.index, 1);
            let value = generator.rvalue(candidate).unwrap();
            assert!((1000..=1010).contains(&value));
        }
    }
}
