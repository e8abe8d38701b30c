//! Multi-tone test signal, the input both the device and the reference
//! computation consume.

use crate::num::Float;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Errors for invalid signal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The sample rate was non-positive or non-finite.
    InvalidSampleRate,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::InvalidSampleRate => {
                write!(f, "sample rate must be finite and positive")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignalError {}

/// One sine component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone<T: Float> {
    /// Frequency in Hz.
    pub freq: T,
    /// Peak amplitude.
    pub amp: T,
}

impl<T: Float> Tone<T> {
    pub fn new(freq: T, amp: T) -> Self {
        Self { freq, amp }
    }
}

fn check_rate<T: Float>(fs: T) -> Result<(), SignalError> {
    if !fs.is_finite() || fs <= T::zero() {
        return Err(SignalError::InvalidSampleRate);
    }
    Ok(())
}

/// `amp * sin(2*pi*freq*k/fs)` for `k` in `0..n`.
pub fn sine_wave<T: Float>(n: usize, freq: T, amp: T, fs: T) -> Result<Vec<T>, SignalError> {
    check_rate(fs)?;
    let two_pi = T::pi() + T::pi();
    Ok((0..n)
        .map(|k| amp * (two_pi * freq * T::from_f64(k as f64) / fs).sin())
        .collect())
}

/// Sum of several sine waves sampled at `fs`.
pub fn sum_of_tones<T: Float>(n: usize, tones: &[Tone<T>], fs: T) -> Result<Vec<T>, SignalError> {
    check_rate(fs)?;
    let mut out = vec![T::zero(); n];
    for tone in tones {
        let wave = sine_wave(n, tone.freq, tone.amp, fs)?;
        for (acc, x) in out.iter_mut().zip(wave) {
            *acc = *acc + x;
        }
    }
    Ok(out)
}
