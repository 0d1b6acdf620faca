//! Error types for bitmap text decoding

use thiserror::Error;

/// Errors that can occur when decoding a bitmap from its text form.
///
/// Decoded text is untrusted input, so every structural violation is an
/// error rather than a panic; no partial bitmap escapes a failed decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Error from the underlying base64 codec.
    #[error("codec: {0}")]
    Codec(#[from] bitspan_codec::Error),
    /// The decoded header describes an impossible range.
    #[error("invalid range {bitmin}..{bitmax}")]
    InvalidRange { bitmin: i32, bitmax: i32 },
    /// The decoded words carry set bits outside the claimed range.
    #[error("set bits outside claimed range")]
    StrayBits,
    /// A claimed extreme bit of a non-empty range is not actually set.
    #[error("claimed extreme bit {0} is not set")]
    Denormalized(i32),
}
