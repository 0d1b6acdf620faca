//! Encode and decode base64 text streams.
//!
//! # Overview
//!
//! A base64 codec designed for compact text serialization of binary
//! structures:
//! - Whole-buffer [encode] and [decode] with standard `=` padding
//! - A field-ordered [Decoder] cursor for formats that concatenate
//!   fixed- and variable-width fields with no separators
//! - A truncated 4-byte integer encoding ([encode_i32] and
//!   [Decoder::read_i32]) that omits the block's guaranteed trailing `=`
//!
//! Decoding is strict about structure: padding may only close the final
//! group, non-alphabet bytes are rejected, and a field must end on a group
//! boundary. Whitespace (space, tab, CR, LF) between symbols is skipped,
//! never rejected, so formats survive transport through line-wrapping
//! channels.
//!
//! # Example
//!
//! ```
//! use bitspan_codec::{encode, encode_i32, Decoder};
//!
//! // Encode two fields back to back.
//! let mut text = String::new();
//! encode_i32(&mut text, 1024);
//! encode(&mut text, b"payload");
//! assert_eq!(text, "AAQAAA=cGF5bG9hZA==");
//!
//! // Decode them in order.
//! let mut decoder = Decoder::new(&text);
//! assert_eq!(decoder.read_i32().unwrap(), 1024);
//! assert_eq!(decoder.read_exact(7).unwrap(), b"payload");
//! decoder.finish().unwrap();
//! ```

pub mod base64;
pub mod error;
pub mod int;

// Re-export main types and functions
pub use base64::{decode, encode, encoded_len, Decoder};
pub use error::Error;
pub use int::{encode_i32, ENCODED_I32_LEN};
