//! The central [`Generator`] abstraction (spec.md §3/§4.2) and its
//! object-safe façade [`UntypedGenerator`], used wherever representations
//! must be stored heterogeneously (the [`crate::choice_tree`]).
//!
//! Grounded on the teacher's own `Generate`/`Shrink` split (`src/generate.rs`,
//! `src/shrink.rs`): there, one `Generate` produces one recursively-shrinking
//! `Shrink` value. Here the shape is different because the choice tree needs
//! to *record* and *replay* individual picks rather than shrink one nested
//! value tree, so `random`/`enumerate`/`shrink`/`rvalue`/`size` are five
//! separate operations on an internal representation `Repr`, matching
//! spec.md §3's `R`/`T` split exactly. The blanket impls for `&G`/`&mut G`
//! below are copied verbatim in spirit from the teacher's
//! `impl<G: Generate + ?Sized> Generate for &G`.

use crate::{lazy_seq::LazySeq, random::Random, size::Size};
use std::{any::Any, sync::Arc};

/// A representation erased behind `Arc<dyn Any + Send + Sync>`. `Arc` (not
/// `Box`) because [`crate::choice_tree::Tree`] snapshots share entries
/// across many shrink candidates without cloning the underlying value.
pub type AnyRepr = Arc<dyn Any + Send + Sync>;

/// Six operations of spec.md §3's generator contract, plus a stable [`name`]
/// used to match preset entries during replay.
#[must_use = "generators do nothing until sampled, enumerated or replayed"]
pub trait Generator: Clone + Send + Sync + 'static {
    /// The user-facing value type.
    type Item;
    /// The internal, shrinkable representation. Not required to be `Debug`:
    /// erasure combinators ([`crate::boxed::BoxedGenerator`], [`crate::one_of
    /// ::OneOf`]) use [`AnyRepr`] itself as a `Repr`, and `dyn Any` carries no
    /// such bound.
    type Repr: Clone + Send + Sync + 'static;

    /// A stable identifier used when matching preset values during replay
    /// (spec.md §4.6).
    fn name(&self) -> &'static str;

    /// Samples a representation with a size budget in `[0.0, 1.0]` (a soft
    /// upper bound on the generated magnitude/length).
    fn random(&self, random: &mut Random, size: f64) -> Self::Repr;

    /// Lazily, deterministically enumerates representations up to `depth`.
    fn enumerate(&self, depth: usize) -> LazySeq<Self::Repr>;

    /// Strictly smaller representations (invariant 1: every element is
    /// smaller, by [`Generator::size`], than `repr`).
    fn shrink(&self, repr: &Self::Repr) -> LazySeq<Self::Repr>;

    /// Fallibly repairs a representation into a value. `None` signals that
    /// `repr` cannot be repaired into a legal value; callers other than
    /// `filter`'s predicate probe treat this as a fatal internal error.
    fn rvalue(&self, repr: &Self::Repr) -> Option<Self::Item>;

    /// A non-negative complexity measure.
    fn size(&self, repr: &Self::Repr) -> Size;
}

/// Object-safe façade over [`Generator`], erasing `Item`/`Repr` behind
/// [`AnyRepr`]. Every [`GeneratedValue`](crate::choice_tree::GeneratedValue)
/// in a [`crate::choice_tree::ChoiceTree`] carries one of these so that
/// [`crate::shrink_search::ShrinkSearch`] can shrink entries it did not
/// originally produce, without knowing their concrete `Item`/`Repr` types.
pub trait UntypedGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    fn random_any(&self, random: &mut Random, size: f64) -> AnyRepr;
    fn shrink_any(&self, repr: &AnyRepr) -> LazySeq<AnyRepr>;
    fn size_any(&self, repr: &AnyRepr) -> Size;
}

impl<G: Generator> UntypedGenerator for G {
    fn name(&self) -> &'static str {
        Generator::name(self)
    }

    fn random_any(&self, random: &mut Random, size: f64) -> AnyRepr {
        Arc::new(Generator::random(self, random, size))
    }

    fn shrink_any(&self, repr: &AnyRepr) -> LazySeq<AnyRepr> {
        match repr.downcast_ref::<G::Repr>() {
            Some(repr) => Generator::shrink(self, repr).map(|repr| Arc::new(repr) as AnyRepr),
            None => crate::lazy_seq::empty(),
        }
    }

    fn size_any(&self, repr: &AnyRepr) -> Size {
        match repr.downcast_ref::<G::Repr>() {
            Some(repr) => Generator::size(self, repr),
            None => Size::zero(),
        }
    }
}
