//! `filterMap(g, h)` (spec.md §4.2): `filter` followed by `map`, fused into
//! one combinator the same way [`crate::filter::Filter`] is — `h` returning
//! `None` plays the role of the predicate failing.

use crate::{
    error::GeneratorError,
    generator::Generator,
    lazy_seq::LazySeq,
    random::Random,
    size::Size,
};
use std::sync::Arc;

const RETRY_BUDGET: usize = 1000;

pub struct FilterMap<G, F> {
    inner: G,
    f: Arc<F>,
}

impl<G: Clone, F> Clone for FilterMap<G, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            f: self.f.clone(),
        }
    }
}

impl<G: Generator, F> FilterMap<G, F> {
    pub fn new(inner: G, f: F) -> Self {
        Self {
            inner,
            f: Arc::new(f),
        }
    }
}

impl<G, F, U> Generator for FilterMap<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> Option<U> + Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    type Item = U;
    type Repr = G::Repr;

    fn name(&self) -> &'static str {
        "filter_map"
    }

    fn random(&self, random: &mut Random, size: f64) -> G::Repr {
        let mut last = self.inner.random(random, size);
        for _ in 0..RETRY_BUDGET {
            if self.repaired(&last).is_some() {
                return last;
            }
            last = self.inner.random(random, size);
        }
        last
    }

    fn enumerate(&self, depth: usize) -> LazySeq<G::Repr> {
        let this_f = self.f.clone();
        let inner = self.inner.clone();
        self.inner.enumerate(depth).filter(move |repr| {
            inner.rvalue(repr).and_then(|item| (this_f)(item)).is_some()
        })
    }

    fn shrink(&self, repr: &G::Repr) -> LazySeq<G::Repr> {
        let this_f = self.f.clone();
        let inner = self.inner.clone();
        self.inner.shrink(repr).filter(move |candidate| {
            inner
                .rvalue(candidate)
                .and_then(|item| (this_f)(item))
                .is_some()
        })
    }

    fn rvalue(&self, repr: &G::Repr) -> Option<U> {
        match self.repaired(repr) {
            Some(value) => Some(value),
            None => panic!(
                "{}",
                GeneratorError::FilterExhausted {
                    generator: "filter_map",
                    retries: RETRY_BUDGET,
                }
            ),
        }
    }

    fn size(&self, repr: &G::Repr) -> Size {
        self.inner.size(repr)
    }
}

impl<G, F, U> FilterMap<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> Option<U> + Send + Sync + 'static,
{
    fn repaired(&self, repr: &G::Repr) -> Option<U> {
        self.inner.rvalue(repr).and_then(|item| (self.f)(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Int;

    #[test]
    fn keeps_only_values_where_f_returns_some() {
        let generator = FilterMap::new(Int::new(0, 20), |value: i64| {
            if value % 4 == 0 { Some(value / 4) } else { None }
        });
        let mut random = Random::seeded(5);
        for _ in 0..50 {
            let repr = generator.random(&mut random, 1.0);
            assert!(generator.rvalue(&repr).is_some());
        }
    }

    #[test]
    #[should_panic(expected = "failed to satisfy its filter")]
    fn rvalue_panics_when_f_never_matches() {
        let generator = FilterMap::new(Int::new(0, 9), |_: i64| None::<i64>);
        generator.rvalue(&3);
    }
}
