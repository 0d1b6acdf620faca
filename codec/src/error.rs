//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("unexpected \"=\"")]
    UnexpectedPadding,
    #[error("invalid symbol 0x{0:02x}")]
    InvalidSymbol(u8),
    #[error("invalid end sequence")]
    InvalidEndSequence,
}
