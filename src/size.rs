//! The non-negative "complexity" measure a [`crate::generator::Generator`]
//! assigns to one of its representations. [`Size::well_founded`] encodes
//! invariant 1 of the data model: every element a `shrink` produces must be
//! strictly smaller than its source.

use num_bigint::BigUint;
use std::{fmt, iter::Sum, ops::Add};

/// A non-negative, unbounded complexity measure. Backed by [`BigUint`]
/// rather than a machine integer because nested collections (a `Vec<Vec<..>
/// >>` of generated strings, say) can overflow any fixed width well before
/// they overflow memory; `size` must stay comparable regardless.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(BigUint);

impl Size {
    pub fn zero() -> Self {
        Size(BigUint::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::ZERO
    }

    /// `true` if `self` is strictly smaller than `other`, the well-founded
    /// ordering relation used to validate every `shrink` step.
    pub fn well_founded(&self, other: &Size) -> bool {
        self < other
    }
}

impl From<u64> for Size {
    fn from(value: u64) -> Self {
        Size(BigUint::from(value))
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(BigUint::from(value as u64))
    }
}

impl From<i64> for Size {
    fn from(value: i64) -> Self {
        Size(BigUint::from(value.unsigned_abs()))
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size(self.0 + rhs.0)
    }
}

impl Add<&Size> for Size {
    type Output = Size;

    fn add(self, rhs: &Size) -> Size {
        Size(self.0 + &rhs.0)
    }
}

impl Sum for Size {
    fn sum<I: Iterator<Item = Size>>(iter: I) -> Self {
        iter.fold(Size::zero(), Add::add)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_well_founded() {
        let small = Size::from(1u64);
        let large = Size::from(2u64);
        assert!(small.well_founded(&large));
        assert!(!large.well_founded(&small));
    }

    #[test]
    fn sum_folds_from_zero() {
        let total: Size = vec![Size::from(1u64), Size::from(2u64), Size::from(3u64)]
            .into_iter()
            .sum();
        assert_eq!(total, Size::from(6u64));
    }
}
