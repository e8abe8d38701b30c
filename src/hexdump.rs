//! Hexdump text codec.
//!
//! The device logger prints buffers as lines of space separated hex bytes
//! followed by an ASCII sidebar:
//!
//! ```text
//! 00 00 00 00 4d 47 9b 43  4e a3 5b 43 f7 2d f2 c2 |....MG.C N.[C.-..
//! ```
//!
//! Only the part before the first `|` carries data. The bytes of all lines
//! are concatenated in order and reinterpreted as little-endian `f32` values.
//! Large buffers are logged as several blocks; feeding the blocks one after
//! another yields the whole array.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

/// Separator between the hex column and the ASCII sidebar.
pub const SIDEBAR_DELIMITER: char = '|';

/// Bytes printed per line by [`encode_bytes`].
pub const BYTES_PER_LINE: usize = 16;

/// Bytes per half line; an extra space separates the two halves.
const BYTES_PER_GROUP: usize = BYTES_PER_LINE / 2;

/// Size of one encoded sample.
const SAMPLE_BYTES: usize = core::mem::size_of::<f32>();

/// Errors produced while decoding hexdump text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A character in the hex column is not a hexadecimal digit.
    InvalidDigit {
        /// 1-based line number of the offending character.
        line: usize,
        digit: char,
    },
    /// The hex column holds an odd number of digits in total.
    OddDigitCount { count: usize },
    /// The decoded byte count is not a whole number of `f32` samples.
    Misaligned { bytes: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidDigit { line, digit } => {
                write!(f, "invalid hex digit {:?} on line {}", digit, line)
            }
            FormatError::OddDigitCount { count } => {
                write!(f, "hexdump holds an odd number of hex digits ({})", count)
            }
            FormatError::Misaligned { bytes } => write!(
                f,
                "{} bytes is not a multiple of the {}-byte sample size",
                bytes, SAMPLE_BYTES
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

/// Return the data-carrying part of one hexdump line, i.e. everything before
/// the first `|`.
pub fn payload(line: &str) -> &str {
    match line.find(SIDEBAR_DELIMITER) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn nibble(digit: char) -> Option<u8> {
    digit.to_digit(16).map(|d| d as u8)
}

/// Decode hexdump text into raw bytes.
///
/// Whitespace inside the hex column is ignored and the digits of all lines
/// are read as one stream, so `"0 1 2"` is three digits and gets rejected.
///
/// # Errors
///
/// [`FormatError::InvalidDigit`] for any non-hex character in a hex column,
/// [`FormatError::OddDigitCount`] if the digits do not pair up.
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, FormatError> {
    let mut bytes = Vec::new();
    let mut high: Option<u8> = None;
    let mut count = 0usize;

    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        for digit in payload(line).chars().filter(|c| !c.is_whitespace()) {
            let value = nibble(digit).ok_or(FormatError::InvalidDigit {
                line: idx + 1,
                digit,
            })?;
            count += 1;
            match high.take() {
                Some(h) => bytes.push((h << 4) | value),
                None => high = Some(value),
            }
        }
    }

    if high.is_some() {
        return Err(FormatError::OddDigitCount { count });
    }
    Ok(bytes)
}

/// Decode hexdump text into little-endian `f32` samples.
///
/// The result holds exactly `bytes / 4` values, in the order the bytes appear.
///
/// # Errors
///
/// Everything [`decode_bytes`] reports, plus [`FormatError::Misaligned`] when
/// the byte count is not a multiple of four.
pub fn decode_f32(text: &str) -> Result<Vec<f32>, FormatError> {
    let bytes = decode_bytes(text)?;
    if bytes.len() % SAMPLE_BYTES != 0 {
        return Err(FormatError::Misaligned { bytes: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn sidebar_char(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

/// Encode raw bytes in the device logger's hexdump layout.
///
/// Every line carries up to [`BYTES_PER_LINE`] bytes. A short last line is
/// padded so the sidebar delimiter stays in the same column.
pub fn encode_bytes(bytes: &[u8]) -> String {
    // "xx " per byte plus the extra space between groups
    let hex_width = BYTES_PER_LINE * 3 + 1;
    let mut out = String::new();
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        let mut hex = String::with_capacity(hex_width);
        let mut ascii = String::with_capacity(BYTES_PER_LINE + 1);
        for (i, &b) in chunk.iter().enumerate() {
            if i == BYTES_PER_GROUP {
                hex.push(' ');
                ascii.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = write!(hex, "{:02x} ", b);
            ascii.push(sidebar_char(b));
        }
        let _ = writeln!(
            out,
            "{:<width$}{}{}",
            hex,
            SIDEBAR_DELIMITER,
            ascii,
            width = hex_width
        );
    }
    out
}

/// Encode `f32` samples as a little-endian hexdump.
pub fn encode_f32(samples: &[f32]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    encode_bytes(&bytes)
}


#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_length_is_byte_count_over_four(words in proptest::collection::vec(any::<u32>(), 0..64)) {
            let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
            let text = encode_bytes(&bytes);
            let digits = text
                .lines()
                .map(|l| payload(l).chars().filter(|c| c.is_ascii_hexdigit()).count())
                .sum::<usize>();
            let decoded = decode_f32(&text).unwrap();
            prop_assert_eq!(decoded.len() * 4, digits / 2);
            prop_assert_eq!(decoded.len(), words.len());
        }

        #[test]
        fn prop_decoding_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let text = encode_bytes(&bytes);
            prop_assert_eq!(decode_bytes(&text), decode_bytes(&text));
            prop_assert_eq!(decode_bytes(&text).unwrap(), bytes);
        }
    }
}
