//! The `Prove` contract a test body's return value must satisfy (kept close
//! to the teacher's `src/prove.rs`, which already is exactly the "test body
//! returns `()`, `bool`, or `Result`" abstraction this engine needs), plus
//! the error categories of spec.md §7: a disproved assertion or panic
//! (`Cause`) versus a generator-internal inconsistency (`GeneratorError`).

use core::fmt;
use std::{any::Any, borrow::Cow, error};

/// Converts a test body's return value into either a `Proof` (success) or an
/// `Error` (a disproved assertion). Implemented for `()`, `bool` and
/// `Result<T, E>` so a body can end in whichever of the three is most
/// natural to write.
pub trait Prove {
    type Proof;
    type Error;
    fn prove(self) -> Result<Self::Proof, Self::Error>;
}

impl Prove for () {
    type Proof = ();
    type Error = core::convert::Infallible;

    fn prove(self) -> Result<Self::Proof, Self::Error> {
        Ok(())
    }
}

impl Prove for bool {
    type Proof = ();
    type Error = ();

    fn prove(self) -> Result<Self::Proof, Self::Error> {
        if self { Ok(()) } else { Err(()) }
    }
}

impl<T, E> Prove for Result<T, E> {
    type Proof = T;
    type Error = E;

    fn prove(self) -> Self {
        self
    }
}

/// The cause of a failed run (spec.md §7's "user-assertion failure" and
/// "unexpected panic" categories).
#[derive(Clone, Debug)]
pub enum Cause<E> {
    /// The test body returned a disproving value (`errorf`/`Err`/`false`).
    Disprove(E),
    /// The test body panicked; the message is recovered when the payload is
    /// a string-like type.
    Panic(Option<Cow<'static, str>>),
}

impl<E: fmt::Debug> fmt::Display for Cause<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Disprove(error) => write!(f, "disproved: {error:?}"),
            Cause::Panic(Some(message)) => write!(f, "panicked: {message}"),
            Cause::Panic(None) => write!(f, "panicked"),
        }
    }
}

impl<E: fmt::Debug> error::Error for Cause<E> {}

/// The "generator internal inconsistency" category of spec.md §7: `rvalue`
/// failing on a freshly produced representation, or `filter` exhausting its
/// retry budget. This is always a bug in a generator (or a predicate that can
/// never be satisfied), never a property of the code under test, so it is
/// surfaced to the harness rather than recorded as a run failure.
#[derive(Clone, Debug)]
pub enum GeneratorError {
    /// `Generator::rvalue` returned `None` for a representation the engine
    /// itself produced (via `random`, `enumerate`, preset replay, or
    /// `shrink`).
    Unrepairable { generator: &'static str },
    /// `filter`/`filter_map` exhausted its retry budget without producing a
    /// value that satisfies the predicate.
    FilterExhausted { generator: &'static str, retries: usize },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Unrepairable { generator } => {
                write!(f, "generator `{generator}` produced an unrepairable representation")
            }
            GeneratorError::FilterExhausted { generator, retries } => write!(
                f,
                "generator `{generator}` failed to satisfy its filter after {retries} retries"
            ),
        }
    }
}

impl error::Error for GeneratorError {}

/// Downcasts a caught panic payload into a displayable message, matching the
/// teacher's `check::cast` helper exactly (same four candidate types, same
/// order).
pub(crate) fn cast(error: Box<dyn Any + Send>) -> Option<Cow<'static, str>> {
    let error = match error.downcast::<&'static str>() {
        Ok(message) => return Some(Cow::Borrowed(*message)),
        Err(error) => error,
    };
    let error = match error.downcast::<String>() {
        Ok(message) => return Some(Cow::Owned(*message)),
        Err(error) => error,
    };
    let error = match error.downcast::<Box<str>>() {
        Ok(message) => return Some(Cow::Owned(message.to_string())),
        Err(error) => error,
    };
    match error.downcast::<Cow<'static, str>>() {
        Ok(message) => Some(*message),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_always_proves() {
        assert!(().prove().is_ok());
    }

    #[test]
    fn bool_proves_iff_true() {
        assert!(true.prove().is_ok());
        assert!(false.prove().is_err());
    }

    #[test]
    fn result_passes_through() {
        let ok: Result<i32, &str> = Ok(1);
        assert_eq!(ok.prove(), Ok(1));
        let err: Result<i32, &str> = Err("no");
        assert_eq!(err.prove(), Err("no"));
    }

    #[test]
    fn cast_recovers_a_str_panic_message() {
        let result = std::panic::catch_unwind(|| panic!("boom"));
        let payload = result.expect_err("panic! always unwinds");
        assert_eq!(cast(payload).as_deref(), Some("boom"));
    }

    #[test]
    fn cast_recovers_a_string_panic_message() {
        let result = std::panic::catch_unwind(|| panic!("{}", "boom".to_string()));
        let payload = result.expect_err("panic! always unwinds");
        assert_eq!(cast(payload).as_deref(), Some("boom"));
    }

    #[test]
    fn cast_returns_none_for_a_non_string_payload() {
        let result = std::panic::catch_unwind(|| std::panic::panic_any(42i32));
        let payload = result.expect_err("panic_any always unwinds");
        assert!(cast(payload).is_none());
    }
}
