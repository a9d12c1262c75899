//! Byte-string ↔ text codec: base64 and base64url.
//!
//! Encoding takes anything byte-like (`&str` is encoded as its UTF-8 bytes).
//! Decoding is lenient the way browser `atob` is: ASCII whitespace is
//! ignored and trailing padding is optional.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const PADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Error returned when text is not valid base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError(base64::DecodeError);

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid base64: {}", self.0)
    }
}

impl core::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Encode bytes as padded, standard-alphabet base64.
pub fn encode_base64(input: impl AsRef<[u8]>) -> String {
    PADDED.encode(input)
}

/// Encode bytes as unpadded, URL-safe base64 (`-` and `_` instead of `+` and `/`).
pub fn encode_base64_url(input: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(input)
}

/// Decode standard-alphabet base64.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    PADDED.decode(strip_whitespace(encoded)).map_err(DecodeError)
}

/// Decode base64url. Standard-alphabet input (`+`, `/`) is accepted too.
pub fn decode_base64_url(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let translated: String = strip_whitespace(encoded)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    URL_SAFE.decode(translated).map_err(DecodeError)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}
