//! CMSIS real-FFT output unpacking.
//!
//! `arm_rfft_fast_f32` writes an `N`-point real FFT into `N` floats:
//! `[re(0), re(N/2), re(1), im(1), re(2), im(2), ...]`. The DC and Nyquist
//! bins are purely real, so their imaginary parts are not stored and the
//! Nyquist real part is folded into slot 1.

use crate::num::{Complex, Float};
use alloc::vec::Vec;
use core::fmt;

/// Errors for malformed packed spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumError {
    /// Fewer than the two slots holding the DC and Nyquist bins.
    TooShort { len: usize },
    /// Packed data must hold whole `(re, im)` pairs.
    OddLength { len: usize },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumError::TooShort { len } => {
                write!(f, "packed spectrum needs at least 2 values, got {}", len)
            }
            SpectrumError::OddLength { len } => {
                write!(f, "packed spectrum length {} is not even", len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SpectrumError {}

/// Expand a packed `N`-point real FFT into its `N/2 + 1` complex bins,
/// ordered from DC to Nyquist.
pub fn unpack_cmsis_rfft<T: Float>(packed: &[T]) -> Result<Vec<Complex<T>>, SpectrumError> {
    if packed.len() < 2 {
        return Err(SpectrumError::TooShort { len: packed.len() });
    }
    if packed.len() % 2 != 0 {
        return Err(SpectrumError::OddLength { len: packed.len() });
    }
    let mut bins = Vec::with_capacity(packed.len() / 2 + 1);
    bins.push(Complex::new(packed[0], T::zero()));
    bins.extend(
        packed[2..]
            .chunks_exact(2)
            .map(|pair| Complex::new(pair[0], pair[1])),
    );
    bins.push(Complex::new(packed[1], T::zero()));
    Ok(bins)
}

/// Magnitude of every bin.
pub fn magnitudes<T: Float>(bins: &[Complex<T>]) -> Vec<T> {
    bins.iter().map(|c| c.norm()).collect()
}

/// Phase of every bin in radians.
pub fn phases<T: Float>(bins: &[Complex<T>]) -> Vec<T> {
    bins.iter().map(|c| c.arg()).collect()
}
