//! Type-erased generators (spec.md §4.4's `oneOf`/`oneConstantOf` need to
//! hold alternatives of differing concrete `Generator` types behind one
//! `Item`). Grounded on the teacher's own `src/boxed.rs`, which exists for
//! exactly this reason — `Any`/`Convert`-style generators need to store
//! heterogeneous inner generators — though the erasure target here is
//! `Repr`, not the whole `Generate` impl, since [`crate::choice_tree`] needs
//! the erased `Repr` anyway.

use crate::{
    generator::{AnyRepr, Generator},
    lazy_seq::LazySeq,
    random::Random,
    size::Size,
};
use std::sync::Arc;

trait ErasedGenerator<T>: Send + Sync {
    fn name(&self) -> &'static str;
    fn random(&self, random: &mut Random, size: f64) -> AnyRepr;
    fn enumerate(&self, depth: usize) -> LazySeq<AnyRepr>;
    fn shrink(&self, repr: &AnyRepr) -> LazySeq<AnyRepr>;
    fn rvalue(&self, repr: &AnyRepr) -> Option<T>;
    fn size(&self, repr: &AnyRepr) -> Size;
}

impl<G: Generator> ErasedGenerator<G::Item> for G {
    fn name(&self) -> &'static str {
        Generator::name(self)
    }

    fn random(&self, random: &mut Random, size: f64) -> AnyRepr {
        Arc::new(Generator::random(self, random, size))
    }

    fn enumerate(&self, depth: usize) -> LazySeq<AnyRepr> {
        Generator::enumerate(self, depth).map(|repr| Arc::new(repr) as AnyRepr)
    }

    fn shrink(&self, repr: &AnyRepr) -> LazySeq<AnyRepr> {
        match repr.downcast_ref::<G::Repr>() {
            Some(repr) => Generator::shrink(self, repr).map(|repr| Arc::new(repr) as AnyRepr),
            None => crate::lazy_seq::empty(),
        }
    }

    fn rvalue(&self, repr: &AnyRepr) -> Option<G::Item> {
        repr.downcast_ref::<G::Repr>()
            .and_then(|repr| Generator::rvalue(self, repr))
    }

    fn size(&self, repr: &AnyRepr) -> Size {
        match repr.downcast_ref::<G::Repr>() {
            Some(repr) => Generator::size(self, repr),
            None => Size::zero(),
        }
    }
}

/// A generator whose concrete type has been erased behind `Arc<dyn ...>`,
/// keeping `Item` but replacing `Repr` with [`AnyRepr`]. Used wherever a
/// collection of alternatives must share one `Generator` type despite
/// differing concrete generators (`oneOf`), or where a generator must refer
/// to itself (recursive structures), neither of which Rust's generics allow
/// directly.
pub struct BoxedGenerator<T> {
    inner: Arc<dyn ErasedGenerator<T>>,
}

impl<T> Clone for BoxedGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> BoxedGenerator<T> {
    pub fn new<G: Generator<Item = T>>(generator: G) -> Self {
        Self {
            inner: Arc::new(generator),
        }
    }
}

impl<T: Send + Sync + 'static> Generator for BoxedGenerator<T> {
    type Item = T;
    type Repr = AnyRepr;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn random(&self, random: &mut Random, size: f64) -> AnyRepr {
        self.inner.random(random, size)
    }

    fn enumerate(&self, depth: usize) -> LazySeq<AnyRepr> {
        self.inner.enumerate(depth)
    }

    fn shrink(&self, repr: &AnyRepr) -> LazySeq<AnyRepr> {
        self.inner.shrink(repr)
    }

    fn rvalue(&self, repr: &AnyRepr) -> Option<T> {
        self.inner.rvalue(repr)
    }

    fn size(&self, repr: &AnyRepr) -> Size {
        self.inner.size(repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn boxed_random_round_trips_through_any() {
        let boxed = BoxedGenerator::new(Fixed(9));
        let mut random = Random::seeded(0);
        let repr = boxed.random(&mut random, 1.0);
        assert_eq!(boxed.rvalue(&repr), Some(9));
    }

    #[test]
    fn boxed_clone_shares_the_inner_generator() {
        let boxed = BoxedGenerator::new(Fixed(4));
        let cloned = boxed.clone();
        assert_eq!(cloned.name(), "fixed");
    }
}
