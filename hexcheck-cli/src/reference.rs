//! Host-side reference computations.

use hexcheck::num::Complex64;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Real FFT of `input` over `size` points, bins `0..=size/2`.
///
/// The input is zero-padded or truncated to `size`, matching a fixed-length
/// device transform.
pub fn rfft(input: &[f32], size: usize) -> Vec<Complex64> {
    let mut buffer: Vec<Complex<f64>> = (0..size)
        .map(|i| Complex::new(input.get(i).map_or(0.0, |&x| x as f64), 0.0))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(size);
    fft.process(&mut buffer);
    buffer
        .iter()
        .take(size / 2 + 1)
        .map(|c| Complex64::new(c.re, c.im))
        .collect()
}
