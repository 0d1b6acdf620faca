//! Truncated base64 encoding for 4-byte integers
//!
//! A 4-byte input always encodes to an 8-symbol base64 block ending in `=`
//! (the final group carries one byte, so it closes with two pads). That
//! trailing symbol carries no information, so integer fields are written as
//! the leading 7 symbols only; the decoder reinstates the eighth `=` before
//! the standard block decode. The 4 bytes are the integer's little-endian
//! representation.

use crate::{
    base64::{symbol, symbol_value, PAD},
    Decoder, Error,
};

/// Encoded length of a truncated integer field, in symbols.
pub const ENCODED_I32_LEN: usize = 7;

/// Appends the truncated encoding of `value` to `dst`: 6 data symbols
/// followed by a single `=`.
pub fn encode_i32(dst: &mut String, value: i32) {
    let bytes = value.to_le_bytes();
    let head = (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32;
    dst.push(symbol((head >> 18) as u8));
    dst.push(symbol((head >> 12) as u8));
    dst.push(symbol((head >> 6) as u8));
    dst.push(symbol(head as u8));
    dst.push(symbol(bytes[3] >> 2));
    dst.push(symbol(bytes[3] << 4));
    dst.push(PAD as char);
}

impl Decoder<'_> {
    /// Decodes a truncated integer field: seven raw symbols, the last of
    /// which must be the kept `=`, with the omitted eighth `=` implied.
    ///
    /// The field is fixed-width, so whitespace inside it is not tolerated.
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        let field = self.take_raw(ENCODED_I32_LEN)?;
        let mut values = [0u8; 6];
        for (value, &byte) in values.iter_mut().zip(&field[..6]) {
            *value = symbol_value(byte)?;
        }
        if field[6] != PAD {
            return Err(Error::InvalidEndSequence);
        }
        let head = (values[0] as u32) << 18
            | (values[1] as u32) << 12
            | (values[2] as u32) << 6
            | values[3] as u32;
        let tail = (values[4] as u32) << 6 | values[5] as u32;
        let bytes = [
            (head >> 16) as u8,
            (head >> 8) as u8,
            head as u8,
            (tail >> 4) as u8,
        ];
        Ok(i32::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_string(value: i32) -> String {
        let mut out = String::new();
        encode_i32(&mut out, value);
        out
    }

    fn decode_i32(text: &str) -> Result<i32, Error> {
        let mut decoder = Decoder::new(text);
        let value = decoder.read_i32()?;
        decoder.finish()?;
        Ok(value)
    }

    #[test]
    fn test_encode_vectors() {
        assert_eq!(encode_to_string(0), "AAAAAA=");
        assert_eq!(encode_to_string(3), "AwAAAA=");
        assert_eq!(encode_to_string(100), "ZAAAAA=");
        assert_eq!(encode_to_string(1024), "AAQAAA=");
        assert_eq!(encode_to_string(-1), "/////w=");
    }

    #[test]
    fn test_roundtrip() {
        let values = [
            0,
            1,
            3,
            63,
            64,
            100,
            255,
            256,
            1 << 20,
            i32::MAX,
            -1,
            i32::MIN,
        ];
        for value in values {
            let text = encode_to_string(value);
            assert_eq!(text.len(), ENCODED_I32_LEN);
            assert!(text.ends_with('='));
            assert_eq!(decode_i32(&text).unwrap(), value);
        }
    }

    #[test]
    fn test_fields_concatenate() {
        let mut text = String::new();
        encode_i32(&mut text, 7);
        encode_i32(&mut text, -7);
        let mut decoder = Decoder::new(&text);
        assert_eq!(decoder.read_i32().unwrap(), 7);
        assert_eq!(decoder.read_i32().unwrap(), -7);
        decoder.finish().unwrap();
    }

    #[test]
    fn test_rejects_short_field() {
        assert_eq!(decode_i32("AAAAAA").unwrap_err(), Error::EndOfBuffer);
        assert_eq!(decode_i32("").unwrap_err(), Error::EndOfBuffer);
    }

    #[test]
    fn test_rejects_missing_pad() {
        // Seven symbols, but the seventh is data rather than the kept `=`.
        assert_eq!(
            decode_i32("AAAAAAA").unwrap_err(),
            Error::InvalidEndSequence
        );
    }

    #[test]
    fn test_rejects_invalid_symbol() {
        assert_eq!(decode_i32("AA?AAA=").unwrap_err(), Error::InvalidSymbol(b'?'));
        // Whitespace is not tolerated inside the fixed-width field.
        assert_eq!(decode_i32("AA AAA=").unwrap_err(), Error::InvalidSymbol(b' '));
    }
}
