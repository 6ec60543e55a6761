//! `flatMap(g, h)` (spec.md §4.2): the representation is a pair `{outer,
//! inner}`; `random` draws `outer` then builds the inner generator from
//! `h(rvalue(outer))`; `shrink` shrinks one side with the other held fixed;
//! enumeration is a depth-first cross product. Grounded on the teacher's
//! `src/flatten.rs` for the "one field per side of the pair" shape, though
//! the teacher's own flatMap nests `Generate` output directly rather than
//! re-deriving the inner generator from a repaired value each time.

use crate::{generator::Generator, lazy_seq::LazySeq, random::Random, size::Size};
use std::{marker::PhantomData, sync::Arc};

pub struct FlatMap<G, H, H2> {
    outer: G,
    make_inner: Arc<H>,
    _marker: PhantomData<fn(G) -> H2>,
}

impl<G: Clone, H, H2> Clone for FlatMap<G, H, H2> {
    fn clone(&self) -> Self {
        Self {
            outer: self.outer.clone(),
            make_inner: self.make_inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<G: Generator, H, H2> FlatMap<G, H, H2>
where
    H: Fn(G::Item) -> H2 + Send + Sync + 'static,
    H2: Generator,
{
    pub fn new(outer: G, make_inner: H) -> Self {
        Self {
            outer,
            make_inner: Arc::new(make_inner),
            _marker: PhantomData,
        }
    }
}

impl<G, H, H2> Generator for FlatMap<G, H, H2>
where
    G: Generator,
    H: Fn(G::Item) -> H2 + Send + Sync + 'static,
    H2: Generator,
{
    type Item = H2::Item;
    type Repr = (G::Repr, H2::Repr);

    fn name(&self) -> &'static str {
        "flat_map"
    }

    fn random(&self, random: &mut Random, size: f64) -> (G::Repr, H2::Repr) {
        let outer_repr = self.outer.random(random, size);
        let outer_item = self
            .outer
            .rvalue(&outer_repr)
            .expect("flat_map's outer generator produced an unrepairable representation");
        let inner_gen = (self.make_inner)(outer_item);
        let inner_repr = inner_gen.random(random, size);
        (outer_repr, inner_repr)
    }

    fn enumerate(&self, depth: usize) -> LazySeq<(G::Repr, H2::Repr)> {
        let make_inner = self.make_inner.clone();
        let outer_gen = self.outer.clone();
        crate::lazy_seq::flat_map(self.outer.enumerate(depth), move |outer_repr| {
            match outer_gen.rvalue(&outer_repr) {
                Some(item) => {
                    let inner_gen = (make_inner)(item);
                    let outer_repr = outer_repr.clone();
                    inner_gen
                        .enumerate(depth)
                        .map(move |inner_repr| (outer_repr.clone(), inner_repr))
                }
                None => crate::lazy_seq::empty(),
            }
        })
    }

    /// Shrinks `outer` with `inner` held fixed, then `inner` (rebuilt from
    /// the current `outer`) with `outer` held fixed — never both at once
    /// (spec.md invariant 3).
    fn shrink(&self, repr: &(G::Repr, H2::Repr)) -> LazySeq<(G::Repr, H2::Repr)> {
        let (outer_repr, inner_repr) = repr.clone();
        let outer_shrinks = {
            let inner_repr = inner_repr.clone();
            self.outer
                .shrink(&outer_repr)
                .map(move |new_outer| (new_outer, inner_repr.clone()))
        };
        let inner_shrinks = match self.outer.rvalue(&outer_repr) {
            Some(item) => {
                let inner_gen = (self.make_inner)(item);
                let outer_repr = outer_repr.clone();
                inner_gen
                    .shrink(&inner_repr)
                    .map(move |new_inner| (outer_repr.clone(), new_inner))
            }
            None => crate::lazy_seq::empty(),
        };
        outer_shrinks.concat(inner_shrinks)
    }

    fn rvalue(&self, repr: &(G::Repr, H2::Repr)) -> Option<H2::Item> {
        let (outer_repr, inner_repr) = repr;
        let outer_item = self.outer.rvalue(outer_repr)?;
        let inner_gen = (self.make_inner)(outer_item);
        inner_gen.rvalue(inner_repr)
    }

    fn size(&self, repr: &(G::Repr, H2::Repr)) -> Size {
        let (outer_repr, inner_repr) = repr;
        let outer_size = self.outer.size(outer_repr);
        let inner_size = match self.outer.rvalue(outer_repr) {
            Some(item) => (self.make_inner)(item).size(inner_repr),
            None => Size::zero(),
        };
        outer_size + inner_size
    }
}
