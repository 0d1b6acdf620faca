//! Base64 encoding and decoding
//!
//! This module implements the standard base64 alphabet (`A-Z a-z 0-9 + /`)
//! with `=` padding, streamed in 4-symbol-per-3-byte groups. Decoding skips
//! whitespace (space, tab, CR, LF) between symbols but rejects padding
//! outside the final group, non-alphabet bytes, and partial trailing groups.
//!
//! # References
//!
//! - RFC 4648: <https://datatracker.ietf.org/doc/html/rfc4648>

use crate::Error;

/// The 64-symbol encoding alphabet, indexed by 6-bit value.
const ALPHABET: [u8; 64] =
    *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// The padding symbol closing a partial final group.
pub(crate) const PAD: u8 = b'=';

/// Reverse lookup from ASCII byte to 6-bit value, `-1` for bytes outside
/// the alphabet.
const DECODE: [i8; 128] = {
    let mut table = [-1i8; 128];
    let mut value = 0;
    while value < 64 {
        table[ALPHABET[value] as usize] = value as i8;
        value += 1;
    }
    table
};

/// Returns the symbol for the low 6 bits of `value`.
#[inline]
pub(crate) fn symbol(value: u8) -> char {
    ALPHABET[(value & 0x3f) as usize] as char
}

/// Returns the 6-bit value of a data symbol.
#[inline]
pub(crate) fn symbol_value(byte: u8) -> Result<u8, Error> {
    let value = if byte < 128 { DECODE[byte as usize] } else { -1 };
    if value < 0 {
        return Err(Error::InvalidSymbol(byte));
    }
    Ok(value as u8)
}

#[inline]
pub(crate) const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Returns the encoded length of `bytes` input bytes: `4 * ceil(bytes / 3)`.
#[inline]
pub const fn encoded_len(bytes: usize) -> usize {
    bytes.div_ceil(3) * 4
}

/// Appends the standard base64 encoding of `src` to `dst`.
///
/// The output is `encoded_len(src.len())` symbols with `=` padding closing a
/// partial final group. No line breaks are inserted.
pub fn encode(dst: &mut String, src: &[u8]) {
    dst.reserve(encoded_len(src.len()));
    let mut groups = src.chunks_exact(3);
    for group in groups.by_ref() {
        let buf = (group[0] as u32) << 16 | (group[1] as u32) << 8 | group[2] as u32;
        dst.push(symbol((buf >> 18) as u8));
        dst.push(symbol((buf >> 12) as u8));
        dst.push(symbol((buf >> 6) as u8));
        dst.push(symbol(buf as u8));
    }
    let tail = groups.remainder();
    if !tail.is_empty() {
        let mut buf = (tail[0] as u32) << 16;
        if tail.len() == 2 {
            buf |= (tail[1] as u32) << 8;
        }
        dst.push(symbol((buf >> 18) as u8));
        dst.push(symbol((buf >> 12) as u8));
        dst.push(if tail.len() == 2 {
            symbol((buf >> 6) as u8)
        } else {
            PAD as char
        });
        dst.push(PAD as char);
    }
}

/// Decodes an entire base64 text buffer.
///
/// Whitespace anywhere in the input is skipped. Padding must close the final
/// group exactly; symbols after a padded group, misplaced `=`, non-alphabet
/// bytes, and a trailing partial group are rejected.
pub fn decode(src: &str) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    let mut machine = Machine::new();
    for &byte in src.as_bytes() {
        if is_whitespace(byte) {
            continue;
        }
        machine.feed(byte, &mut out)?;
    }
    machine.finish()?;
    Ok(out)
}

/// Accumulates symbols into 4-symbol groups and emits decoded bytes.
///
/// `end` records where padding closed the group: 1 after `XX==` (one output
/// byte), 2 after `XXX=` (two output bytes). Once set, only the second `=`
/// of a two-pad group may follow.
struct Machine {
    buf: u32,
    filled: usize,
    end: usize,
}

impl Machine {
    const fn new() -> Self {
        Self {
            buf: 0,
            filled: 0,
            end: 0,
        }
    }

    /// Feeds one non-whitespace input byte, appending completed bytes to
    /// `out`.
    fn feed(&mut self, byte: u8, out: &mut Vec<u8>) -> Result<(), Error> {
        let value = if byte == PAD {
            match (self.end, self.filled) {
                (0, 2) => self.end = 1,
                (0, 3) => self.end = 2,
                // The second `=` of a two-pad group.
                (1, 3) => {}
                _ => return Err(Error::UnexpectedPadding),
            }
            0
        } else {
            if self.end != 0 {
                return Err(Error::UnexpectedPadding);
            }
            symbol_value(byte)?
        };
        self.buf = (self.buf << 6) | value as u32;
        self.filled += 1;
        if self.filled == 4 {
            out.push((self.buf >> 16) as u8);
            if self.end != 1 {
                out.push((self.buf >> 8) as u8);
            }
            if self.end == 0 {
                out.push(self.buf as u8);
            }
            self.buf = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Confirms the input ended on a group boundary.
    fn finish(self) -> Result<(), Error> {
        if self.filled != 0 {
            return Err(Error::InvalidEndSequence);
        }
        Ok(())
    }
}

/// A cursor over base64 text that decodes concatenated fields in order.
///
/// The cursor only moves forward. Formats without separators are decoded by
/// reading each field at its known width: fixed-width integer fields via
/// [Decoder::read_i32] and length-derived byte fields via
/// [Decoder::read_exact].
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a cursor at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Returns the number of input bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Takes the next `len` raw input bytes without decoding them.
    pub(crate) fn take_raw(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::EndOfBuffer);
        }
        let field = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(field)
    }

    /// Decodes exactly `bytes` output bytes from the next
    /// `encoded_len(bytes)` data symbols, skipping interleaved whitespace.
    ///
    /// The final group's padding must match `bytes` exactly; a group that
    /// yields too few or too many bytes is rejected.
    pub fn read_exact(&mut self, bytes: usize) -> Result<Vec<u8>, Error> {
        let symbols = encoded_len(bytes);
        // Every symbol occupies at least one input byte, so a short input is
        // rejected before the output is allocated.
        if self.remaining() < symbols {
            return Err(Error::EndOfBuffer);
        }
        let mut out = Vec::with_capacity(bytes);
        let mut machine = Machine::new();
        let mut taken = 0;
        while taken < symbols {
            let Some(&byte) = self.input.get(self.pos) else {
                return Err(Error::EndOfBuffer);
            };
            self.pos += 1;
            if is_whitespace(byte) {
                continue;
            }
            machine.feed(byte, &mut out)?;
            taken += 1;
        }
        if out.len() != bytes {
            return Err(Error::InvalidEndSequence);
        }
        Ok(out)
    }

    /// Confirms nothing but whitespace remains.
    pub fn finish(self) -> Result<(), Error> {
        let extra = self.input[self.pos..]
            .iter()
            .filter(|&&byte| !is_whitespace(byte))
            .count();
        if extra > 0 {
            return Err(Error::ExtraData(extra));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_string(src: &[u8]) -> String {
        let mut out = String::new();
        encode(&mut out, src);
        out
    }

    #[test]
    fn test_encode_groups() {
        assert_eq!(encode_to_string(b""), "");
        assert_eq!(encode_to_string(b"f"), "Zg==");
        assert_eq!(encode_to_string(b"fo"), "Zm8=");
        assert_eq!(encode_to_string(b"foo"), "Zm9v");
        assert_eq!(encode_to_string(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn test_encode_appends() {
        let mut out = String::from("head:");
        encode(&mut out, b"foo");
        assert_eq!(out, "head:Zm9v");
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1), 4);
        assert_eq!(encoded_len(2), 4);
        assert_eq!(encoded_len(3), 4);
        assert_eq!(encoded_len(4), 8);
        assert_eq!(encoded_len(16), 24);
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode("").unwrap(), b"");
        assert_eq!(decode("Zg==").unwrap(), b"f");
        assert_eq!(decode("Zm8=").unwrap(), b"fo");
        assert_eq!(decode("Zm9vYmFy").unwrap(), b"foobar");
    }

    #[test]
    fn test_decode_skips_whitespace() {
        assert_eq!(decode("Zm9v\nYmFy").unwrap(), b"foobar");
        assert_eq!(decode("  Zm 9v\tYm\rFy\n").unwrap(), b"foobar");
        assert_eq!(decode(" \t\r\n").unwrap(), b"");
    }

    #[test]
    fn test_decode_rejects_invalid_symbol() {
        assert_eq!(decode("Zm9$").unwrap_err(), Error::InvalidSymbol(b'$'));
        assert_eq!(decode("Zm9_").unwrap_err(), Error::InvalidSymbol(b'_'));
    }

    #[test]
    fn test_decode_rejects_misplaced_padding() {
        // Test case 1: padding in the first or second symbol slot.
        assert_eq!(decode("=AAA").unwrap_err(), Error::UnexpectedPadding);
        assert_eq!(decode("A===").unwrap_err(), Error::UnexpectedPadding);

        // Test case 2: data symbols after a padded group.
        assert_eq!(decode("Zg==Zg==").unwrap_err(), Error::UnexpectedPadding);
        assert_eq!(decode("Zm8=A").unwrap_err(), Error::UnexpectedPadding);

        // Test case 3: padding starting a fresh group.
        assert_eq!(decode("Zg====").unwrap_err(), Error::UnexpectedPadding);
    }

    #[test]
    fn test_decode_rejects_partial_group() {
        assert_eq!(decode("Zg").unwrap_err(), Error::InvalidEndSequence);
        assert_eq!(decode("Zg=").unwrap_err(), Error::InvalidEndSequence);
        assert_eq!(decode("Zm9vY").unwrap_err(), Error::InvalidEndSequence);
    }

    #[test]
    fn test_decode_roundtrip() {
        let inputs: Vec<Vec<u8>> = vec![
            vec![],
            vec![0],
            vec![0xff; 7],
            (0..=255).collect(),
            vec![0x00, 0x10, 0x83, 0x10, 0x51, 0x87],
        ];
        for input in inputs {
            let encoded = encode_to_string(&input);
            assert_eq!(decode(&encoded).unwrap(), input);
        }
    }

    #[test]
    fn test_decoder_read_exact() {
        let mut text = String::new();
        encode(&mut text, b"foobar");
        encode(&mut text, b"baz");
        let mut decoder = Decoder::new(&text);
        assert_eq!(decoder.read_exact(6).unwrap(), b"foobar");
        assert_eq!(decoder.read_exact(3).unwrap(), b"baz");
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decoder_read_exact_whitespace() {
        let mut decoder = Decoder::new("Zm9v\n YmFy");
        assert_eq!(decoder.read_exact(6).unwrap(), b"foobar");
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decoder_read_exact_empty() {
        let mut decoder = Decoder::new("");
        assert_eq!(decoder.read_exact(0).unwrap(), b"");
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decoder_short_input() {
        let mut decoder = Decoder::new("AAAA");
        assert_eq!(decoder.read_exact(6).unwrap_err(), Error::EndOfBuffer);
    }

    #[test]
    fn test_decoder_mismatched_padding() {
        // Three bytes expected but the group closes after one.
        let mut decoder = Decoder::new("Zg==");
        assert_eq!(
            decoder.read_exact(3).unwrap_err(),
            Error::InvalidEndSequence
        );
    }

    #[test]
    fn test_decoder_finish() {
        let mut decoder = Decoder::new("Zm9v \n\t");
        assert_eq!(decoder.read_exact(3).unwrap(), b"foo");
        decoder.finish().unwrap();

        let mut decoder = Decoder::new("Zm9v xy");
        assert_eq!(decoder.read_exact(3).unwrap(), b"foo");
        assert_eq!(decoder.finish().unwrap_err(), Error::ExtraData(2));
    }

    #[test]
    fn test_decoder_remaining() {
        let mut decoder = Decoder::new("Zm9vYmFy");
        assert_eq!(decoder.remaining(), 8);
        decoder.read_exact(3).unwrap();
        assert_eq!(decoder.remaining(), 4);
    }
}
