//! `zip(a, b, combine)` (spec.md §4.2): an independent pair, unlike
//! [`crate::flatten::FlatMap`] where `b` depends on `a`'s repaired value.
//! Grounded on the teacher's own `src/convert.rs`/tuple-`Generate` impls,
//! which compose two independent generators the same way.

use crate::{generator::Generator, lazy_seq::LazySeq, random::Random, size::Size};
use std::sync::Arc;

pub struct Zip<A, B, F> {
    a: A,
    b: B,
    combine: Arc<F>,
}

impl<A: Clone, B: Clone, F> Clone for Zip<A, B, F> {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            b: self.b.clone(),
            combine: self.combine.clone(),
        }
    }
}

impl<A: Generator, B: Generator, F> Zip<A, B, F> {
    pub fn new(a: A, b: B, combine: F) -> Self {
        Self {
            a,
            b,
            combine: Arc::new(combine),
        }
    }
}

impl<A, B, F, U> Generator for Zip<A, B, F>
where
    A: Generator,
    B: Generator,
    F: Fn(A::Item, B::Item) -> U + Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    type Item = U;
    type Repr = (A::Repr, B::Repr);

    fn name(&self) -> &'static str {
        "zip"
    }

    fn random(&self, random: &mut Random, size: f64) -> (A::Repr, B::Repr) {
        (self.a.random(random, size), self.b.random(random, size))
    }

    fn enumerate(&self, depth: usize) -> LazySeq<(A::Repr, B::Repr)> {
        let b = self.b.clone();
        crate::lazy_seq::flat_map(self.a.enumerate(depth), move |a_repr| {
            let a_repr = a_repr.clone();
            b.enumerate(depth).map(move |b_repr| (a_repr.clone(), b_repr))
        })
    }

    /// Shrinks `a` with `b` held fixed, then `b` with `a` held fixed — never
    /// both at once (spec.md invariant 3).
    fn shrink(&self, repr: &(A::Repr, B::Repr)) -> LazySeq<(A::Repr, B::Repr)> {
        let (a_repr, b_repr) = repr.clone();
        let a_shrinks = {
            let b_repr = b_repr.clone();
            self.a.shrink(&a_repr).map(move |a| (a, b_repr.clone()))
        };
        let b_shrinks = self.b.shrink(&b_repr).map(move |b| (a_repr.clone(), b));
        a_shrinks.concat(b_shrinks)
    }

    fn rvalue(&self, repr: &(A::Repr, B::Repr)) -> Option<U> {
        let (a_repr, b_repr) = repr;
        let a_item = self.a.rvalue(a_repr)?;
        let b_item = self.b.rvalue(b_repr)?;
        Some((self.combine)(a_item, b_item))
    }

    fn size(&self, repr: &(A::Repr, B::Repr)) -> Size {
        let (a_repr, b_repr) = repr;
        self.a.size(a_repr) + self.b.size(b_repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Int;

    #[test]
    fn combines_both_sides_independently() {
        let generator = Zip::new(Int::new(0, 9), Int::new(0, 9), |a, b| a + b);
        assert_eq!(generator.rvalue(&(3, 4)), Some(7));
    }

    #[test]
    fn shrink_moves_one_side_at_a_time() {
        let generator = Zip::new(Int::new(0, 9), Int::new(0, 9), |a, b| (a, b));
        let repr = (9i64, 9i64);
        let (candidates, _) = generator.shrink(&repr).collect_with_exhaustive();
        for (a, b) in candidates {
            assert!(a == 9 || b == 9);
        }
    }
}
