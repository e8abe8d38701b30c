//! End-to-end checks of device output against a reference computation.
//!
//! Device buffers are `f32`; references are computed and compared in `f64`
//! so the reference itself adds no rounding of note.

use crate::hexdump::{self, FormatError};
use crate::metrics::{self, ErrorReport, ShapeMismatchError};
use crate::num::{Complex, Float};
use crate::sos::{self, Sos, SosError};
use crate::spectrum::{self, SpectrumError};
use alloc::vec::Vec;
use core::fmt;

/// Any failure of a verification step.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyError {
    Format(FormatError),
    Shape(ShapeMismatchError),
    Spectrum(SpectrumError),
    Filter(SosError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Format(e) => write!(f, "malformed hexdump: {}", e),
            VerifyError::Shape(e) => write!(f, "shape mismatch: {}", e),
            VerifyError::Spectrum(e) => write!(f, "bad spectrum: {}", e),
            VerifyError::Filter(e) => write!(f, "bad filter: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Format(e) => Some(e),
            VerifyError::Shape(e) => Some(e),
            VerifyError::Spectrum(e) => Some(e),
            VerifyError::Filter(e) => Some(e),
        }
    }
}

impl From<FormatError> for VerifyError {
    fn from(e: FormatError) -> Self {
        VerifyError::Format(e)
    }
}

impl From<ShapeMismatchError> for VerifyError {
    fn from(e: ShapeMismatchError) -> Self {
        VerifyError::Shape(e)
    }
}

impl From<SpectrumError> for VerifyError {
    fn from(e: SpectrumError) -> Self {
        VerifyError::Spectrum(e)
    }
}

impl From<SosError> for VerifyError {
    fn from(e: SosError) -> Self {
        VerifyError::Filter(e)
    }
}

/// Magnitude and phase errors of one spectrum comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumReport<T: Float> {
    pub magnitude: ErrorReport<T>,
    pub phase: ErrorReport<T>,
}

/// Promote device samples to `f64`.
pub fn widen(samples: &[f32]) -> Vec<f64> {
    samples.iter().map(|&x| x as f64).collect()
}

/// Decode two hexdumps and compare them, the first one being the reference.
pub fn compare_hexdumps(
    reference: &str,
    candidate: &str,
) -> Result<ErrorReport<f32>, VerifyError> {
    let reference = hexdump::decode_f32(reference)?;
    let candidate = hexdump::decode_f32(candidate)?;
    #[cfg(feature = "verbose-logging")]
    log::debug!(
        "decoded {} reference and {} candidate samples",
        reference.len(),
        candidate.len()
    );
    Ok(metrics::compare(&reference, &candidate)?)
}

/// Filter `input` with `sections` in `f64` and compare the device's filtered
/// output against the result.
pub fn verify_filter(
    input: &[f32],
    sections: &[Sos<f64>],
    candidate: &[f32],
) -> Result<ErrorReport<f64>, VerifyError> {
    let reference = sos::sosfilt(sections, &widen(input))?;
    let report = metrics::compare(&reference, &widen(candidate))?;
    #[cfg(feature = "verbose-logging")]
    log::debug!(
        "filter check over {} samples through {} sections: {}",
        input.len(),
        sections.len(),
        report
    );
    Ok(report)
}

/// Compare a packed CMSIS real FFT against reference bins `0..=N/2`.
pub fn verify_spectrum(
    reference: &[Complex<f64>],
    packed_candidate: &[f32],
) -> Result<SpectrumReport<f64>, VerifyError> {
    let candidate: Vec<Complex<f64>> = spectrum::unpack_cmsis_rfft(packed_candidate)?
        .into_iter()
        .map(|c| c.cast::<f64>())
        .collect();
    let magnitude = metrics::compare(
        &spectrum::magnitudes(reference),
        &spectrum::magnitudes(&candidate),
    )?;
    let phase = metrics::compare(&spectrum::phases(reference), &spectrum::phases(&candidate))?;
    #[cfg(feature = "verbose-logging")]
    log::debug!(
        "spectrum check over {} bins: magnitude {}, phase {}",
        reference.len(),
        magnitude,
        phase
    );
    Ok(SpectrumReport { magnitude, phase })
}
