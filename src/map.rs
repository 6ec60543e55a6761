//! `map(g, f)` (spec.md §4.2): same representation, `rvalue` post-applies
//! `f`. Grounded on the teacher's `src/map.rs`, which is this same
//! single-field wrapper.

use crate::{generator::Generator, lazy_seq::LazySeq, random::Random, size::Size};
use std::sync::Arc;

pub struct Map<G, F> {
    inner: G,
    f: Arc<F>,
}

impl<G: Clone, F> Clone for Map<G, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            f: self.f.clone(),
        }
    }
}

impl<G: Generator, F> Map<G, F> {
    pub fn new(inner: G, f: F) -> Self {
        Self {
            inner,
            f: Arc::new(f),
        }
    }
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> U + Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    type Item = U;
    type Repr = G::Repr;

    fn name(&self) -> &'static str {
        "map"
    }

    fn random(&self, random: &mut Random, size: f64) -> G::Repr {
        self.inner.random(random, size)
    }

    fn enumerate(&self, depth: usize) -> LazySeq<G::Repr> {
        self.inner.enumerate(depth)
    }

    fn shrink(&self, repr: &G::Repr) -> LazySeq<G::Repr> {
        self.inner.shrink(repr)
    }

    fn rvalue(&self, repr: &G::Repr) -> Option<U> {
        self.inner.rvalue(repr).map(|item| (self.f)(item))
    }

    fn size(&self, repr: &G::Repr) -> Size {
        self.inner.size(repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Int;

    #[test]
    fn map_transforms_the_repaired_value_only() {
        let generator = Map::new(Int::new(0, 9), |value| value * 10);
        assert_eq!(generator.rvalue(&3), Some(30));
        assert_eq!(generator.size(&3), Int::new(0, 9).size(&3));
    }
}
