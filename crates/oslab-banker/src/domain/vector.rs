//! Resource Vectors - Foundation for All Resource Accounting
//!
//! A [`ResourceVector`] is an ordered sequence of non-negative resource
//! amounts, one per resource type. Its length is fixed for the lifetime
//! of a simulation run; every vector flowing through a
//! [`crate::domain::registry::ProcessRegistry`] has the same length.
//!
//! # Design Notes
//!
//! Amounts are `u64`, not a signed type. Raw caller input (`&[i64]`) is
//! sign-checked at the registry boundary before a vector is ever
//! constructed, so a negative amount is unrepresentable past that
//! boundary. Subtraction is only exposed in `checked` and `saturating`
//! forms; a plain `-` that could underflow does not exist on this type.

use std::fmt;
use std::ops::{AddAssign, Index};

use serde::{Deserialize, Serialize};

/// An ordered, fixed-length sequence of non-negative resource amounts.
///
/// Index `i` holds the amount of resource type `i`. Element-wise
/// comparison and arithmetic require both operands to have the same
/// length; mismatched lengths are a caller defect, not a runtime
/// condition, and are rejected with `debug_assert!`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u64>);

impl ResourceVector {
    /// Create a vector from already-validated amounts.
    pub fn new(amounts: Vec<u64>) -> Self {
        Self(amounts)
    }

    /// All-zero vector with `len` resource types.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Number of resource types.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no resource types.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount of resource type `index`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    /// Borrow the underlying amounts.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Iterate over `(resource index, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Element-wise `self[i] <= other[i]` for every resource type.
    ///
    /// This is the satisfiability test of the safety algorithm:
    /// `need.fits_within(work)` means the process can run to completion
    /// with the resources currently on hand.
    pub fn fits_within(&self, other: &Self) -> bool {
        debug_assert_eq!(self.len(), other.len(), "vector length mismatch");
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Element-wise subtraction, `None` if any element would go
    /// negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        debug_assert_eq!(self.len(), other.len(), "vector length mismatch");
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<u64>>>()
            .map(Self)
    }

    /// Element-wise subtraction clamped at zero.
    ///
    /// Display-only derivation: admission invariants guarantee the
    /// subtraction never actually saturates, but a clamped value can
    /// never leak a bogus amount to a presentation layer.
    pub fn saturating_sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len(), "vector length mismatch");
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a.saturating_sub(*b))
                .collect(),
        )
    }

    /// First resource index at which both `self` and `other` are
    /// strictly positive.
    ///
    /// Used by the wait-for graph builder: the earliest resource type
    /// that one process needs while another holds it.
    pub fn first_common_positive(&self, other: &Self) -> Option<usize> {
        debug_assert_eq!(self.len(), other.len(), "vector length mismatch");
        self.0
            .iter()
            .zip(&other.0)
            .position(|(a, b)| *a > 0 && *b > 0)
    }
}

/// Element-wise accumulation; models a finished process releasing its
/// allocation back into `work`.
impl AddAssign<&ResourceVector> for ResourceVector {
    fn add_assign(&mut self, other: &ResourceVector) {
        debug_assert_eq!(self.len(), other.len(), "vector length mismatch");
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a += b;
        }
    }
}

impl Index<usize> for ResourceVector {
    type Output = u64;

    #[inline(always)]
    fn index(&self, index: usize) -> &u64 {
        &self.0[index]
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, amount) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", amount)?;
        }
        Ok(())
    }
}

impl From<Vec<u64>> for ResourceVector {
    fn from(amounts: Vec<u64>) -> Self {
        Self(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within_is_elementwise() {
        let need = ResourceVector::new(vec![1, 2, 2]);
        let work = ResourceVector::new(vec![3, 3, 2]);

        assert!(need.fits_within(&work));
        // One element over is enough to fail the whole test
        assert!(!ResourceVector::new(vec![1, 4, 0]).fits_within(&work));
    }

    #[test]
    fn test_checked_sub_detects_underflow() {
        let total = ResourceVector::new(vec![10, 5, 7]);
        let allocated = ResourceVector::new(vec![7, 2, 5]);

        assert_eq!(
            total.checked_sub(&allocated),
            Some(ResourceVector::new(vec![3, 3, 2]))
        );
        assert_eq!(allocated.checked_sub(&total), None);
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        let a = ResourceVector::new(vec![2, 0]);
        let b = ResourceVector::new(vec![1, 3]);

        assert_eq!(a.saturating_sub(&b), ResourceVector::new(vec![1, 0]));
    }

    #[test]
    fn test_add_assign_releases_allocation() {
        let mut work = ResourceVector::new(vec![3, 3, 2]);
        work += &ResourceVector::new(vec![2, 0, 0]);

        assert_eq!(work, ResourceVector::new(vec![5, 3, 2]));
    }

    #[test]
    fn test_first_common_positive_picks_earliest_index() {
        let need = ResourceVector::new(vec![0, 1, 1]);
        let held = ResourceVector::new(vec![1, 0, 2]);

        assert_eq!(need.first_common_positive(&held), Some(2));
        assert_eq!(
            need.first_common_positive(&ResourceVector::zeros(3)),
            None
        );
    }

    #[test]
    fn test_display_is_space_joined() {
        let v = ResourceVector::new(vec![10, 5, 7]);
        assert_eq!(v.to_string(), "10 5 7");
    }
}
