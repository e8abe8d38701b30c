//! # hexcheck - validate CMSIS-DSP output dumps against reference math
//!
//! Microcontroller DSP code is usually checked by logging its buffers as hexdumps
//! and comparing them with a reference computed on the host. This crate covers
//! the host side of that loop.
//!
//! ## Features
//!
//! - **Hexdump codec**: decode device log dumps into `f32` arrays, and encode arrays
//!   back into the same layout
//! - **Error metrics**: maximum absolute and relative error with a defined policy
//!   for division by zero
//! - **Reference math**: biquad cascades (`sosfilt`), CMSIS packed real-FFT
//!   unpacking, multi-tone test signals
//! - **`no_std` + `alloc`**: runs wherever the device-side test harness runs
//!
//! ## Cargo Features
//!
//! - `std` (default): implement `std::error::Error` for the error types
//! - `verbose-logging`: emit `log` debug records from the [`verify`] helpers
//! - `internal-tests`: property-based test suites (pulls in `proptest`)
//!
//! ## Example
//!
//! ```
//! use hexcheck::hexdump::decode_f32;
//! use hexcheck::metrics::compare;
//!
//! let device = decode_f32("00 00 80 3f 00 00 20 40 |...?... @").unwrap();
//! let report = compare(&[1.0f32, 2.0], &device).unwrap();
//! assert_eq!(report.max_abs, 0.5);
//! ```
//!
//! ## Relative error and zero crossings
//!
//! A position whose reference value is zero divides by zero. The resulting NaN
//! or infinity counts as zero relative error, so large deviations exactly at zero
//! crossings only show up in the absolute error.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

/// Hexdump text codec
///
/// Parses the device logger's hexdump layout into little-endian `f32` samples
/// and writes samples back out in the same layout.
pub mod hexdump;

/// Error metrics
///
/// Maximum absolute and maximum relative elementwise error.
pub mod metrics;

/// `Float` abstraction over `f32`/`f64` and the `Complex` bin type.
pub mod num;

/// CMSIS packed real-FFT unpacking and magnitude/phase helpers.
pub mod spectrum;

/// Second-order-section (biquad cascade) filtering
///
/// Transposed direct form II, matching the device's biquad kernel, plus
/// coefficient layout conversion.
pub mod sos;

/// Multi-tone sine test signals.
pub mod signal;

/// Reference-versus-device checks built from the other modules.
pub mod verify;

pub use hexdump::FormatError;
pub use metrics::{ErrorReport, ShapeMismatchError};
pub use num::{Complex, Complex32, Complex64, Float};
pub use verify::VerifyError;
