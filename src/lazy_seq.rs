//! Lazy, restartable sequences with an "exhaustive" flag.
//!
//! A [`LazySeq`] is a factory: each call to [`LazySeq::cursor`] produces a
//! fresh, single-pass [`Cursor`]. This is the Rust analogue of the teacher's
//! own habit of keeping generation state out of the [`crate::generator::
//! Generator`] itself (see `src/check.rs`'s `Checks` iterator, which is
//! rebuilt from a `Checker` snapshot rather than mutated in place): here the
//! `LazySeq` is the snapshot and the `Cursor` is the one-shot iterator over
//! it, so the same enumeration or shrink sequence can be walked more than
//! once (`ShrinkSearch` restarts a shrink sequence after every accepted
//! candidate; `enumerate` is walked once per `pick`).

use std::sync::Arc;

/// One step of a [`Cursor`]. Unlike a plain `Option<T>`, the "done" case
/// distinguishes whether the underlying source was exhausted on its own
/// (`DoneExhaustive`) or whether it was cut short by a combinator such as
/// [`take`] (`DoneNonExhaustive`). See invariant 5 in the data model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next<T> {
    Value(T),
    DoneExhaustive,
    DoneNonExhaustive,
}

impl<T> Next<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Next::Value(_))
    }

    pub fn is_exhaustive_done(&self) -> bool {
        matches!(self, Next::DoneExhaustive)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Next<U> {
        match self {
            Next::Value(value) => Next::Value(f(value)),
            Next::DoneExhaustive => Next::DoneExhaustive,
            Next::DoneNonExhaustive => Next::DoneNonExhaustive,
        }
    }
}

/// A single-pass pull iterator. Combinators are small state machines that
/// each hold the cursor(s) they wrap.
pub trait Cursor<T>: Send {
    fn advance(&mut self) -> Next<T>;
}

type Factory<T> = Arc<dyn Fn() -> Box<dyn Cursor<T>> + Send + Sync>;

/// A lazy, multi-pass sequence of `T`. Cloning a `LazySeq` is cheap (it
/// clones the `Arc` factory, not any materialized data).
#[derive(Clone)]
pub struct LazySeq<T> {
    factory: Factory<T>,
}

impl<T> LazySeq<T> {
    pub fn new<F, C>(factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Cursor<T> + 'static,
    {
        LazySeq {
            factory: Arc::new(move || Box::new(factory()) as Box<dyn Cursor<T>>),
        }
    }

    pub fn cursor(&self) -> Box<dyn Cursor<T>> {
        (self.factory)()
    }

    /// Collects the sequence into a `Vec`, paired with whether it terminated
    /// exhaustively. Intended for tests and small, known-finite sequences;
    /// calling this on an infinite sequence hangs, by construction.
    pub fn collect_with_exhaustive(&self) -> (Vec<T>, bool)
    where
        T: 'static,
    {
        let mut cursor = self.cursor();
        let mut values = Vec::new();
        loop {
            match cursor.advance() {
                Next::Value(value) => values.push(value),
                Next::DoneExhaustive => return (values, true),
                Next::DoneNonExhaustive => return (values, false),
            }
        }
    }
}

impl<T: Clone + Send + 'static> LazySeq<T> {
    pub fn map<U: Send + 'static>(&self, f: impl Fn(T) -> U + Send + Sync + 'static) -> LazySeq<U> {
        map(self.clone(), f)
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> LazySeq<T> {
        filter(self.clone(), predicate)
    }

    pub fn take(&self, count: usize) -> LazySeq<T> {
        take(count, self.clone())
    }

    pub fn take_exhaustive(&self, count: usize) -> LazySeq<T> {
        take_exhaustive(count, self.clone())
    }

    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> LazySeq<T> {
        take_while(predicate, self.clone())
    }

    pub fn concat(&self, other: LazySeq<T>) -> LazySeq<T> {
        concat(self.clone(), other)
    }

    pub fn non_exhaustive(&self) -> LazySeq<T> {
        non_exhaustive(self.clone())
    }
}

/// Always `DoneExhaustive` on the first `advance`.
pub fn empty<T: Send + 'static>() -> LazySeq<T> {
    struct Empty;
    impl<T> Cursor<T> for Empty {
        fn advance(&mut self) -> Next<T> {
            Next::DoneExhaustive
        }
    }
    LazySeq::new(|| Empty)
}

/// One value, then `DoneExhaustive`.
pub fn singleton<T: Clone + Send + 'static>(value: T) -> LazySeq<T> {
    struct Singleton<T>(Option<T>);
    impl<T: Send> Cursor<T> for Singleton<T> {
        fn advance(&mut self) -> Next<T> {
            match self.0.take() {
                Some(value) => Next::Value(value),
                None => Next::DoneExhaustive,
            }
        }
    }
    let value = value;
    LazySeq::new(move || Singleton(Some(value.clone())))
}

/// Every element of `values`, in order, then `DoneExhaustive`.
pub fn from_slice<T: Clone + Send + 'static>(values: Vec<T>) -> LazySeq<T> {
    struct FromSlice<T> {
        values: Arc<[T]>,
        index: usize,
    }
    impl<T: Clone + Send> Cursor<T> for FromSlice<T> {
        fn advance(&mut self) -> Next<T> {
            match self.values.get(self.index) {
                Some(value) => {
                    self.index += 1;
                    Next::Value(value.clone())
                }
                None => Next::DoneExhaustive,
            }
        }
    }
    let values: Arc<[T]> = values.into();
    LazySeq::new(move || FromSlice {
        values: values.clone(),
        index: 0,
    })
}

/// Infinite sequence `seed, step(seed), step(step(seed)), ...`. Never
/// exhaustive.
pub fn generate<T, F>(seed: T, step: F) -> LazySeq<T>
where
    T: Clone + Send + 'static,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    struct Generate<T, F> {
        current: T,
        step: Arc<F>,
        started: bool,
    }
    impl<T: Clone + Send, F: Fn(&T) -> T + Send + Sync> Cursor<T> for Generate<T, F> {
        fn advance(&mut self) -> Next<T> {
            if self.started {
                self.current = (self.step)(&self.current);
            }
            self.started = true;
            Next::Value(self.current.clone())
        }
    }
    let step = Arc::new(step);
    LazySeq::new(move || Generate {
        current: seed.clone(),
        step: step.clone(),
        started: false,
    })
}

/// At most `n` items. Reports `DoneExhaustive` both when the source finishes
/// early *and* when the cap itself is hit: `take` is a deliberate, final
/// truncation, not a partial view (see invariant 5's `take` clause).
pub fn take<T: Clone + Send + 'static>(n: usize, source: LazySeq<T>) -> LazySeq<T> {
    struct Take<T> {
        remaining: usize,
        inner: Box<dyn Cursor<T>>,
    }
    impl<T: Send> Cursor<T> for Take<T> {
        fn advance(&mut self) -> Next<T> {
            if self.remaining == 0 {
                return Next::DoneExhaustive;
            }
            match self.inner.advance() {
                Next::Value(value) => {
                    self.remaining -= 1;
                    Next::Value(value)
                }
                Next::DoneExhaustive | Next::DoneNonExhaustive => Next::DoneExhaustive,
            }
        }
    }
    LazySeq::new(move || Take {
        remaining: n,
        inner: source.cursor(),
    })
}

/// At most `n` items, but honest about it: reports `DoneNonExhaustive` if
/// the source still had more at position `n`.
pub fn take_exhaustive<T: Clone + Send + 'static>(n: usize, source: LazySeq<T>) -> LazySeq<T> {
    struct TakeExhaustive<T> {
        remaining: usize,
        inner: Box<dyn Cursor<T>>,
    }
    impl<T: Send> Cursor<T> for TakeExhaustive<T> {
        fn advance(&mut self) -> Next<T> {
            if self.remaining == 0 {
                return match self.inner.advance() {
                    Next::Value(_) => Next::DoneNonExhaustive,
                    Next::DoneExhaustive => Next::DoneExhaustive,
                    Next::DoneNonExhaustive => Next::DoneNonExhaustive,
                };
            }
            match self.inner.advance() {
                Next::Value(value) => {
                    self.remaining -= 1;
                    Next::Value(value)
                }
                done => done,
            }
        }
    }
    LazySeq::new(move || TakeExhaustive {
        remaining: n,
        inner: source.cursor(),
    })
}

/// Stops at the first element for which `predicate` is false; always
/// reports `DoneExhaustive` on termination (the cutoff is the sequence's own
/// natural end, not a truncation).
pub fn take_while<T, F>(predicate: F, source: LazySeq<T>) -> LazySeq<T>
where
    T: Clone + Send + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    struct TakeWhile<T, F> {
        inner: Box<dyn Cursor<T>>,
        predicate: Arc<F>,
        done: bool,
    }
    impl<T: Send, F: Fn(&T) -> bool + Send + Sync> Cursor<T> for TakeWhile<T, F> {
        fn advance(&mut self) -> Next<T> {
            if self.done {
                return Next::DoneExhaustive;
            }
            match self.inner.advance() {
                Next::Value(value) if (self.predicate)(&value) => Next::Value(value),
                Next::Value(_) => {
                    self.done = true;
                    Next::DoneExhaustive
                }
                Next::DoneExhaustive | Next::DoneNonExhaustive => {
                    self.done = true;
                    Next::DoneExhaustive
                }
            }
        }
    }
    let predicate = Arc::new(predicate);
    LazySeq::new(move || TakeWhile {
        inner: source.cursor(),
        predicate: predicate.clone(),
        done: false,
    })
}

/// Preserves the exhaustiveness of `source`.
pub fn map<T, U, F>(source: LazySeq<T>, f: F) -> LazySeq<U>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    struct Map<T, U, F> {
        inner: Box<dyn Cursor<T>>,
        f: Arc<F>,
        _marker: std::marker::PhantomData<fn() -> U>,
    }
    impl<T: Send, U: Send, F: Fn(T) -> U + Send + Sync> Cursor<U> for Map<T, U, F> {
        fn advance(&mut self) -> Next<U> {
            self.inner.advance().map(|value| (self.f)(value))
        }
    }
    let f = Arc::new(f);
    LazySeq::new(move || Map {
        inner: source.cursor(),
        f: f.clone(),
        _marker: std::marker::PhantomData,
    })
}

/// Drops non-matching elements; preserves the exhaustiveness of `source`
/// (an infinite skip of non-matching elements just never terminates, same as
/// the source not terminating).
pub fn filter<T, F>(source: LazySeq<T>, predicate: F) -> LazySeq<T>
where
    T: Clone + Send + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    struct Filter<T, F> {
        inner: Box<dyn Cursor<T>>,
        predicate: Arc<F>,
    }
    impl<T: Send, F: Fn(&T) -> bool + Send + Sync> Cursor<T> for Filter<T, F> {
        fn advance(&mut self) -> Next<T> {
            loop {
                match self.inner.advance() {
                    Next::Value(value) if (self.predicate)(&value) => return Next::Value(value),
                    Next::Value(_) => continue,
                    done => return done,
                }
            }
        }
    }
    let predicate = Arc::new(predicate);
    LazySeq::new(move || Filter {
        inner: source.cursor(),
        predicate: predicate.clone(),
    })
}

/// `a` then `b`. Exhaustive iff both are.
pub fn concat<T: Clone + Send + 'static>(a: LazySeq<T>, b: LazySeq<T>) -> LazySeq<T> {
    struct Concat<T> {
        first: Box<dyn Cursor<T>>,
        second: Box<dyn Cursor<T>>,
        first_exhaustive: bool,
        in_second: bool,
    }
    impl<T: Send> Cursor<T> for Concat<T> {
        fn advance(&mut self) -> Next<T> {
            if !self.in_second {
                match self.first.advance() {
                    Next::Value(value) => return Next::Value(value),
                    Next::DoneExhaustive => {
                        self.first_exhaustive = true;
                        self.in_second = true;
                    }
                    Next::DoneNonExhaustive => {
                        self.first_exhaustive = false;
                        self.in_second = true;
                    }
                }
            }
            match self.second.advance() {
                Next::Value(value) => Next::Value(value),
                Next::DoneExhaustive if self.first_exhaustive => Next::DoneExhaustive,
                _ => Next::DoneNonExhaustive,
            }
        }
    }
    LazySeq::new(move || Concat {
        first: a.cursor(),
        second: b.cursor(),
        first_exhaustive: false,
        in_second: false,
    })
}

/// Depth-first flat-map: for each outer element, yields its inner sequence
/// in full before advancing the outer sequence. Exhaustive iff the outer
/// sequence and every inner sequence it produced are exhaustive.
pub fn flat_map<T, U, F>(source: LazySeq<T>, f: F) -> LazySeq<U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    F: Fn(T) -> LazySeq<U> + Send + Sync + 'static,
{
    struct FlatMap<T, U, F> {
        outer: Box<dyn Cursor<T>>,
        inner: Option<Box<dyn Cursor<U>>>,
        f: Arc<F>,
        outer_exhaustive: bool,
        inner_exhaustive: bool,
    }
    impl<T: Send, U: Send, F: Fn(T) -> LazySeq<U> + Send + Sync> Cursor<U> for FlatMap<T, U, F> {
        fn advance(&mut self) -> Next<U> {
            loop {
                if let Some(inner) = &mut self.inner {
                    match inner.advance() {
                        Next::Value(value) => return Next::Value(value),
                        Next::DoneExhaustive => self.inner = None,
                        Next::DoneNonExhaustive => {
                            self.inner_exhaustive = false;
                            self.inner = None;
                        }
                    }
                }
                match self.outer.advance() {
                    Next::Value(value) => {
                        self.inner = Some((self.f)(value).cursor());
                    }
                    Next::DoneExhaustive => {
                        return if self.outer_exhaustive_done(true) {
                            Next::DoneExhaustive
                        } else {
                            Next::DoneNonExhaustive
                        };
                    }
                    Next::DoneNonExhaustive => {
                        return if self.outer_exhaustive_done(false) {
                            Next::DoneExhaustive
                        } else {
                            Next::DoneNonExhaustive
                        };
                    }
                }
            }
        }
    }
    impl<T, U, F> FlatMap<T, U, F> {
        fn outer_exhaustive_done(&mut self, outer_done_exhaustive: bool) -> bool {
            self.outer_exhaustive = outer_done_exhaustive;
            self.outer_exhaustive && self.inner_exhaustive
        }
    }
    let f = Arc::new(f);
    LazySeq::new(move || FlatMap {
        outer: source.cursor(),
        inner: None,
        f: f.clone(),
        outer_exhaustive: false,
        inner_exhaustive: true,
    })
}

/// Round-robin flat-map: keeps one inner cursor open per outer element seen
/// so far and cycles through all of them, appending a new inner cursor each
/// time the outer sequence yields. Used by `one_of::enumerate` so that
/// alternative branches interleave in the enumeration instead of one branch
/// exhausting the `depth` budget before another is ever tried.
pub fn flat_map_breadth_first<T, U, F>(source: LazySeq<T>, f: F) -> LazySeq<U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    F: Fn(T) -> LazySeq<U> + Send + Sync + 'static,
{
    struct BreadthFirst<T, U, F> {
        outer: Box<dyn Cursor<T>>,
        outer_done: bool,
        outer_exhaustive: bool,
        inners: Vec<Box<dyn Cursor<U>>>,
        inner_exhaustive: Vec<bool>,
        next: usize,
        f: Arc<F>,
        _marker: std::marker::PhantomData<fn() -> T>,
    }
    impl<T: Send, U: Send, F: Fn(T) -> LazySeq<U> + Send + Sync> Cursor<U> for BreadthFirst<T, U, F> {
        fn advance(&mut self) -> Next<U> {
            loop {
                if !self.outer_done {
                    match self.outer.advance() {
                        Next::Value(value) => {
                            self.inners.push((self.f)(value).cursor());
                            self.inner_exhaustive.push(true);
                            // Point at the cursor just appended rather than
                            // wherever the cycle over the older cursors left
                            // off, or a freshly added branch would have to
                            // wait for a full cycle of the existing ones
                            // before it is ever visited once.
                            self.next = self.inners.len() - 1;
                        }
                        Next::DoneExhaustive => {
                            self.outer_done = true;
                            self.outer_exhaustive = true;
                        }
                        Next::DoneNonExhaustive => {
                            self.outer_done = true;
                            self.outer_exhaustive = false;
                        }
                    }
                }
                if self.inners.is_empty() {
                    if self.outer_done {
                        return if self.outer_exhaustive {
                            Next::DoneExhaustive
                        } else {
                            Next::DoneNonExhaustive
                        };
                    }
                    continue;
                }
                let mut attempts = 0;
                while attempts < self.inners.len() {
                    let index = self.next % self.inners.len();
                    self.next = (self.next + 1) % self.inners.len().max(1);
                    attempts += 1;
                    match self.inners[index].advance() {
                        Next::Value(value) => return Next::Value(value),
                        Next::DoneExhaustive => {
                            self.inners.remove(index);
                            self.inner_exhaustive.remove(index);
                            if !self.inners.is_empty() {
                                self.next %= self.inners.len();
                            }
                            attempts = 0;
                            continue;
                        }
                        Next::DoneNonExhaustive => {
                            self.inner_exhaustive[index] = false;
                            self.inners.remove(index);
                            self.inner_exhaustive.remove(index);
                            if !self.inners.is_empty() {
                                self.next %= self.inners.len();
                            }
                            attempts = 0;
                            continue;
                        }
                    }
                }
                if self.inners.is_empty() && !self.outer_done {
                    continue;
                }
                if self.inners.is_empty() && self.outer_done {
                    return if self.outer_exhaustive {
                        Next::DoneExhaustive
                    } else {
                        Next::DoneNonExhaustive
                    };
                }
            }
        }
    }
    let f = Arc::new(f);
    LazySeq::new(move || BreadthFirst {
        outer: source.cursor(),
        outer_done: false,
        outer_exhaustive: false,
        inners: Vec::new(),
        inner_exhaustive: Vec::new(),
        next: 0,
        f: f.clone(),
        _marker: std::marker::PhantomData,
    })
}

/// Forces `DoneNonExhaustive` regardless of whether `source` actually
/// terminated exhaustively. Used when a combinator truncates a sequence in a
/// way that isn't otherwise tracked (e.g. depth-bounded enumeration of an
/// unbounded domain).
pub fn non_exhaustive<T: Clone + Send + 'static>(source: LazySeq<T>) -> LazySeq<T> {
    struct NonExhaustive<T> {
        inner: Box<dyn Cursor<T>>,
    }
    impl<T: Send> Cursor<T> for NonExhaustive<T> {
        fn advance(&mut self) -> Next<T> {
            match self.inner.advance() {
                Next::Value(value) => Next::Value(value),
                Next::DoneExhaustive | Next::DoneNonExhaustive => Next::DoneNonExhaustive,
            }
        }
    }
    LazySeq::new(move || NonExhaustive {
        inner: source.cursor(),
    })
}
