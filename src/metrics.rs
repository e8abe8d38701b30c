//! Elementwise error metrics between a reference and a candidate array.
//!
//! Both metrics reduce to a single worst-case scalar. The relative metric
//! drops positions where the division is not finite (a zero reference value),
//! which hides large deviations at zero crossings. Check `max_abs` alongside
//! it when the reference signal crosses zero.

use crate::num::Float;
use core::fmt;

/// The two arrays handed to a metric have different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatchError {
    pub reference: usize,
    pub candidate: usize,
}

impl fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reference has {} samples but candidate has {}",
            self.reference, self.candidate
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ShapeMismatchError {}

fn check_shape<T>(reference: &[T], candidate: &[T]) -> Result<(), ShapeMismatchError> {
    if reference.len() != candidate.len() {
        return Err(ShapeMismatchError {
            reference: reference.len(),
            candidate: candidate.len(),
        });
    }
    Ok(())
}

/// Maximum that lets a NaN win, like an array maximum does.
#[inline]
fn nan_max<T: Float>(acc: T, x: T) -> T {
    if acc.is_nan() || x.is_nan() {
        if acc.is_nan() {
            acc
        } else {
            x
        }
    } else if x > acc {
        x
    } else {
        acc
    }
}

/// `max |reference[i] - candidate[i]|`.
///
/// Empty inputs give zero. A NaN difference propagates into the result.
pub fn max_abs_error<T: Float>(
    reference: &[T],
    candidate: &[T],
) -> Result<T, ShapeMismatchError> {
    check_shape(reference, candidate)?;
    Ok(reference
        .iter()
        .zip(candidate)
        .map(|(&r, &c)| (r - c).abs())
        .fold(T::zero(), nan_max))
}

/// `max |(reference[i] - candidate[i]) / reference[i]|`.
///
/// Positions where the quotient is NaN or infinite contribute zero.
pub fn max_rel_error<T: Float>(
    reference: &[T],
    candidate: &[T],
) -> Result<T, ShapeMismatchError> {
    check_shape(reference, candidate)?;
    Ok(reference
        .iter()
        .zip(candidate)
        .map(|(&r, &c)| {
            let rel = ((r - c) / r).abs();
            if rel.is_finite() {
                rel
            } else {
                T::zero()
            }
        })
        .fold(T::zero(), nan_max))
}

/// Worst-case absolute and relative error of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport<T: Float> {
    pub max_abs: T,
    pub max_rel: T,
}

impl<T: Float> ErrorReport<T> {
    /// `true` when neither metric exceeds its limit. A `None` limit is not
    /// checked; a NaN metric never passes a checked limit.
    pub fn within(&self, max_abs: Option<T>, max_rel: Option<T>) -> bool {
        let ok = |value: T, limit: Option<T>| match limit {
            Some(limit) => value <= limit,
            None => true,
        };
        ok(self.max_abs, max_abs) && ok(self.max_rel, max_rel)
    }
}

impl<T: Float> fmt::Display for ErrorReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max abs error {}, max rel error {}",
            self.max_abs, self.max_rel
        )
    }
}

/// Compute both metrics at once.
pub fn compare<T: Float>(
    reference: &[T],
    candidate: &[T],
) -> Result<ErrorReport<T>, ShapeMismatchError> {
    Ok(ErrorReport {
        max_abs: max_abs_error(reference, candidate)?,
        max_rel: max_rel_error(reference, candidate)?,
    })
}

/// `true` when both arrays have the same length and compare equal elementwise.
pub fn identical<T: Float>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}


#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_self_comparison_is_zero(x in proptest::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
            prop_assert_eq!(max_abs_error(&x, &x).unwrap(), 0.0);
            prop_assert_eq!(max_rel_error(&x, &x).unwrap(), 0.0);
        }

        #[test]
        fn prop_abs_error_symmetric(pairs in proptest::collection::vec((-1.0e3f32..1.0e3, -1.0e3f32..1.0e3), 0..64)) {
            let (a, b): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();
            prop_assert_eq!(max_abs_error(&a, &b).unwrap(), max_abs_error(&b, &a).unwrap());
        }

        #[test]
        fn prop_rel_error_is_finite_and_non_negative(pairs in proptest::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 0..64)) {
            let (mut a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            if let Some(first) = a.first_mut() {
                *first = 0.0;
            }
            let rel = max_rel_error(&a, &b).unwrap();
            prop_assert!(rel.is_finite());
            prop_assert!(rel >= 0.0);
        }
    }
}
