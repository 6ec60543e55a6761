//! The reflection-based generator builder (spec.md §4.4). Grounded on the
//! teacher's `generate::FullGenerate` — a trait giving a type its own
//! canonical, parameter-free generator — renamed `Reflect` here since this
//! crate's `Generator` trait already means something different from the
//! teacher's `Generate`.
//!
//! Rust has no runtime type introspection, so the "registry of matchers
//! tried in reverse-registration order" of spec.md §4.4 is realized per
//! spec.md §9's own prescription: an explicit builder façade. The built-in
//! matchers (bool, integer, string, slice-of-T) are blanket [`Reflect`]
//! impls rather than runtime-dispatched closures; [`Registry`] exists for
//! the one thing Rust genuinely cannot do statically — letting a caller
//! *override* a type's canonical generator, or register a fallible
//! constructor, and have that override picked up by every nested place the
//! type is reflected — which is why it is keyed by `TypeId` and consulted
//! before falling back to the blanket impl.

use crate::{
    boxed::BoxedGenerator,
    collection::Slice,
    filter_map::FilterMap,
    generator::Generator,
    one_of::Constant,
    primitive::{bool_generator, Int, Str},
    zip::Zip,
};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

/// A type with a canonical, parameter-free generator. Implement this for a
/// record type the way spec.md §4.4 describes a record matcher: zip the
/// field generators in declaration order and build `Self` from the result;
/// a zero-field record is `Constant::new(Self)`.
pub trait Reflect: Sized + Send + Sync + 'static {
    type Generator: Generator<Item = Self>;
    fn reflect() -> Self::Generator;
}

impl Reflect for bool {
    type Generator = crate::one_of::OneConstantOf<bool>;
    fn reflect() -> Self::Generator {
        bool_generator()
    }
}

/// The "default integer" matcher (spec.md §4.4): the full `i64` range.
impl Reflect for i64 {
    type Generator = Int;
    fn reflect() -> Self::Generator {
        Int::full()
    }
}

impl Reflect for String {
    type Generator = crate::map::Map<Str, fn(String) -> String>;
    fn reflect() -> Self::Generator {
        crate::map::Map::new(Str::default_alphabet(), |value| value)
    }
}

/// The "slice-of-T, recursively" matcher (spec.md §4.4).
impl<T: Reflect> Reflect for Vec<T> {
    type Generator = Slice<T::Generator>;
    fn reflect() -> Self::Generator {
        Slice::new(T::reflect())
    }
}

type ErasedFactory = Arc<dyn Any + Send + Sync>;

/// Holds overrides keyed by `TypeId`: a type not present here falls back to
/// its [`Reflect`] impl. Treated as read-only once built (spec.md §5: "the
/// reflection registry is treated as read-only after construction").
#[derive(Default)]
pub struct Registry {
    overrides: HashMap<TypeId, ErasedFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator factory for `T`, overriding its [`Reflect`]
    /// impl (and any earlier override) wherever `T` is subsequently
    /// resolved through this registry — spec.md §4.4's "matchers tried in
    /// reverse-registration order" collapses to "last registration wins"
    /// once there is only ever at most one override per type.
    pub fn register<T: Send + Sync + 'static>(
        &mut self,
        make: impl Fn() -> BoxedGenerator<T> + Send + Sync + 'static,
    ) {
        let factory: Arc<dyn Fn() -> BoxedGenerator<T> + Send + Sync> = Arc::new(make);
        self.overrides.insert(TypeId::of::<T>(), Arc::new(factory));
    }

    /// Registers a fallible one-argument constructor: `build(a)` replaces
    /// `T`'s generator with `A::reflect().filter_map(build)` (spec.md §4.4:
    /// "discarding draws whose optional error is non-nil via `filterMap`").
    pub fn constructor1<A, T, E>(&mut self, build: impl Fn(A) -> Result<T, E> + Send + Sync + 'static)
    where
        A: Reflect,
        T: Send + Sync + 'static,
    {
        let generator = FilterMap::new(A::reflect(), move |a| build(a).ok());
        self.register(move || BoxedGenerator::new(generator.clone()));
    }

    /// Registers a fallible two-argument constructor: the zip of `A`'s and
    /// `B`'s generators, `filterMap`ped through `build`.
    pub fn constructor2<A, B, T, E>(
        &mut self,
        build: impl Fn(A, B) -> Result<T, E> + Send + Sync + 'static,
    ) where
        A: Reflect,
        B: Reflect,
        T: Send + Sync + 'static,
    {
        let zipped = Zip::new(A::reflect(), B::reflect(), |a, b| (a, b));
        let generator = FilterMap::new(zipped, move |(a, b)| build(a, b).ok());
        self.register(move || BoxedGenerator::new(generator.clone()));
    }

    /// Resolves `T`'s generator: the registered override if present,
    /// otherwise `T::reflect()` boxed.
    pub fn resolve<T: Reflect>(&self) -> BoxedGenerator<T> {
        if let Some(factory) = self.overrides.get(&TypeId::of::<T>()) {
            if let Some(factory) = factory.downcast_ref::<Arc<dyn Fn() -> BoxedGenerator<T> + Send + Sync>>() {
                return (factory)();
            }
        }
        BoxedGenerator::new(T::reflect())
    }
}

/// A zero-field record's generator (spec.md §4.4: "zero-field records yield
/// a constant").
pub fn unit_record<T: Clone + Send + Sync + 'static>(value: T) -> Constant<T> {
    Constant::new(value)
}
