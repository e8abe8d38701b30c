//! Cascaded second-order sections (biquads).
//!
//! Coefficients are stored in SciPy order, `b0 b1 b2 a0 a1 a2`, and every
//! section runs in transposed direct form II, the same structure
//! `arm_biquad_cascade_df2T_f32` uses on the device.
//!
//! CMSIS stores five values per section, `b0 b1 b2 -a1 -a2`, normalised so
//! that `a0 = 1`. [`Sos::from_cmsis`] and [`Sos::to_cmsis`] convert between the
//! two layouts.

use crate::num::Float;
use alloc::vec::Vec;
use core::fmt;

/// Errors raised when building a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosError {
    /// The cascade has no sections.
    NoSections,
    /// `a0` of the given section is zero, so it cannot be normalised.
    ZeroLeadingCoefficient { section: usize },
}

impl fmt::Display for SosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SosError::NoSections => write!(f, "filter has no second-order sections"),
            SosError::ZeroLeadingCoefficient { section } => {
                write!(f, "section {} has a0 = 0", section)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SosError {}

/// One biquad section in SciPy order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos<T: Float> {
    pub b: [T; 3],
    pub a: [T; 3],
}

impl<T: Float> Sos<T> {
    pub fn new(b: [T; 3], a: [T; 3]) -> Self {
        Self { b, a }
    }

    /// Build a section from one SciPy `sos` row, `[b0, b1, b2, a0, a1, a2]`.
    pub fn from_row(row: [T; 6]) -> Self {
        Self {
            b: [row[0], row[1], row[2]],
            a: [row[3], row[4], row[5]],
        }
    }

    /// Build a section from the CMSIS layout `[b0, b1, b2, -a1, -a2]`.
    pub fn from_cmsis(coeffs: [T; 5]) -> Self {
        Self {
            b: [coeffs[0], coeffs[1], coeffs[2]],
            a: [T::one(), -coeffs[3], -coeffs[4]],
        }
    }

    /// Convert to the CMSIS layout, normalising by `a0`.
    ///
    /// A lone section has no position in a cascade, so a zero `a0` is
    /// reported as section 0.
    pub fn to_cmsis(&self) -> Result<[T; 5], SosError> {
        let a0 = self.a[0];
        if a0 == T::zero() {
            return Err(SosError::ZeroLeadingCoefficient { section: 0 });
        }
        Ok([
            self.b[0] / a0,
            self.b[1] / a0,
            self.b[2] / a0,
            -self.a[1] / a0,
            -self.a[2] / a0,
        ])
    }
}

/// Normalised coefficients plus the two delay registers of one section.
#[derive(Debug, Clone, Copy)]
struct Stage<T: Float> {
    b: [T; 3],
    a1: T,
    a2: T,
    z1: T,
    z2: T,
}

impl<T: Float> Stage<T> {
    #[inline(always)]
    fn step(&mut self, x: T) -> T {
        let y = self.b[0] * x + self.z1;
        self.z1 = self.b[1] * x - self.a1 * y + self.z2;
        self.z2 = self.b[2] * x - self.a2 * y;
        y
    }
}

/// A stateful biquad cascade.
///
/// State persists between calls, so feeding a signal one sample at a time
/// gives the same output as filtering it in a single block.
#[derive(Debug, Clone)]
pub struct SosFilter<T: Float> {
    stages: Vec<Stage<T>>,
}

impl<T: Float> SosFilter<T> {
    pub fn new(sections: &[Sos<T>]) -> Result<Self, SosError> {
        if sections.is_empty() {
            return Err(SosError::NoSections);
        }
        let stages = sections
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let a0 = s.a[0];
                if a0 == T::zero() {
                    return Err(SosError::ZeroLeadingCoefficient { section: idx });
                }
                Ok(Stage {
                    b: [s.b[0] / a0, s.b[1] / a0, s.b[2] / a0],
                    a1: s.a[1] / a0,
                    a2: s.a[2] / a0,
                    z1: T::zero(),
                    z2: T::zero(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }

    pub fn sections(&self) -> usize {
        self.stages.len()
    }

    /// Filter a single sample.
    pub fn step(&mut self, x: T) -> T {
        self.stages.iter_mut().fold(x, |acc, stage| stage.step(acc))
    }

    /// Filter a block of samples.
    pub fn process(&mut self, input: &[T]) -> Vec<T> {
        input.iter().map(|&x| self.step(x)).collect()
    }

    /// Clear the delay registers.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.z1 = T::zero();
            stage.z2 = T::zero();
        }
    }
}

/// Filter `input` through `sections` starting from zero state.
pub fn sosfilt<T: Float>(sections: &[Sos<T>], input: &[T]) -> Result<Vec<T>, SosError> {
    Ok(SosFilter::new(sections)?.process(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    // First-order Butterworth band-pass, 3..12 Hz at fs = 50 Hz.
    const BANDPASS: [f64; 6] = [
        0.388_236_758_551_425_4,
        0.0,
        -0.388_236_758_551_425_4,
        1.0,
        -0.851_767_187_504_337_7,
        0.223_526_482_897_149_2,
    ];

    #[test]
    fn passthrough_section_is_identity() {
        let s = Sos::new([1.0f32, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let x = [1.0f32, -2.0, 3.5, 0.25];
        assert_eq!(sosfilt(&[s], &x).unwrap(), x.to_vec());
    }

    #[test]
    fn impulse_response_of_one_pole() {
        // y[n] = x[n] + 0.5 y[n-1]
        let s = Sos::new([1.0f64, 0.0, 0.0], [1.0, -0.5, 0.0]);
        let y = sosfilt(&[s], &[1.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(y, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn coefficients_are_normalised_by_a0() {
        let scaled = Sos::new([2.0f64, 0.0, 0.0], [2.0, -1.0, 0.0]);
        let unit = Sos::new([1.0f64, 0.0, 0.0], [1.0, -0.5, 0.0]);
        let x = [1.0, 2.0, -1.0, 0.5];
        assert_eq!(sosfilt(&[scaled], &x).unwrap(), sosfilt(&[unit], &x).unwrap());
    }

    #[test]
    fn sample_by_sample_matches_block() {
        let s = Sos::from_row(BANDPASS);
        let x: Vec<f64> = (0..64).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
        let block = sosfilt(&[s, s], &x).unwrap();
        let mut filter = SosFilter::new(&[s, s]).unwrap();
        let stepped: Vec<f64> = x.iter().map(|&v| filter.step(v)).collect();
        assert_eq!(block, stepped);
        filter.reset();
        assert_eq!(filter.process(&x), block);
        assert_eq!(filter.sections(), 2);
    }

    #[test]
    fn bandpass_blocks_dc() {
        let s = Sos::from_row(BANDPASS);
        let y = sosfilt(&[s], &[1.0f64; 400]).unwrap();
        assert!(y[399].abs() < 1e-9, "{}", y[399]);
    }

    #[test]
    fn cmsis_layout_round_trip() {
        let s = Sos::from_row(BANDPASS);
        let cmsis = s.to_cmsis().unwrap();
        assert_eq!(cmsis[3], 0.851_767_187_504_337_7);
        assert_eq!(cmsis[4], -0.223_526_482_897_149_2);
        assert_eq!(Sos::from_cmsis(cmsis), s);
    }

    #[test]
    fn rejects_empty_and_degenerate_sections() {
        assert_eq!(
            sosfilt::<f32>(&[], &[1.0]).unwrap_err(),
            SosError::NoSections
        );
        let ok = Sos::new([1.0f32, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let bad = Sos::new([1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(
            SosFilter::new(&[ok, bad]).unwrap_err(),
            SosError::ZeroLeadingCoefficient { section: 1 }
        );
        assert_eq!(
            bad.to_cmsis().unwrap_err(),
            SosError::ZeroLeadingCoefficient { section: 0 }
        );
    }
}

#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Noise through a cascade obeys superposition.
    #[test]
    fn cascade_is_linear() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = Sos::new([0.2f64, 0.4, 0.2], [1.0, -0.6, 0.2]);
        let x: Vec<f64> = (0..256).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let w: Vec<f64> = (0..256).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let sum: Vec<f64> = x.iter().zip(&w).map(|(a, b)| a + 3.0 * b).collect();
        let yx = sosfilt(&[s, s], &x).unwrap();
        let yw = sosfilt(&[s, s], &w).unwrap();
        let ysum = sosfilt(&[s, s], &sum).unwrap();
        for i in 0..256 {
            assert!((ysum[i] - (yx[i] + 3.0 * yw[i])).abs() < 1e-9);
        }
    }
}
