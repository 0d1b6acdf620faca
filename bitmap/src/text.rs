//! The external text form of a bitmap.
//!
//! Three fields concatenated with no separators: `bitmin` and `bitmax` as
//! truncated 7-symbol base64 integer fields, then the word array as standard
//! base64 of the words' little-endian bytes. The empty bitmap is the
//! two-character literal `"[]"` in both directions. No field-length markers
//! exist: the integer fields are fixed-width and the word count is derived
//! from the decoded range, so decoding proceeds strictly in field order.

use crate::{
    bitmap::{Word, WORD_BITS, WORD_BYTES, WORD_MASK},
    Bitmap, Error,
};
use bitspan_codec::{encoded_len, Decoder, ENCODED_I32_LEN};
use core::{fmt, str::FromStr};

/// Canonical text form of the empty bitmap.
const EMPTY: &str = "[]";

impl Bitmap {
    /// Serializes the bitmap to its text form.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty, non-singleton bitmap claims an extreme bit
    /// that is not actually set. That can only arise from a bug in this
    /// crate, so it is treated as a fatal internal-invariant violation
    /// rather than an error.
    pub fn encode(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }
        assert!(
            self.bitmin == self.bitmax
                || (self.contains(self.bitmin) && self.contains(self.bitmax)),
            "corrupted bitmap: one of bit {} or bit {} is not set",
            self.bitmin,
            self.bitmax
        );

        let mut out = String::with_capacity(
            2 * ENCODED_I32_LEN + encoded_len(self.words.len() * WORD_BYTES),
        );
        bitspan_codec::encode_i32(&mut out, self.bitmin);
        bitspan_codec::encode_i32(&mut out, self.bitmax);
        let mut bytes = Vec::with_capacity(self.words.len() * WORD_BYTES);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bitspan_codec::encode(&mut out, &bytes);
        out
    }

    /// Deserializes a bitmap from its text form.
    ///
    /// Rejects malformed base64 and any decoded structure that violates the
    /// bitmap invariants; whitespace inside the word-array field is
    /// tolerated, trailing non-whitespace is not. A decoded all-zero
    /// single-word range is accepted as the empty sentinel even though the
    /// encoder never emits it (the canonical empty form is `"[]"`).
    pub fn decode(text: &str) -> Result<Self, Error> {
        if text == EMPTY {
            return Ok(Self::new());
        }

        let mut decoder = Decoder::new(text);
        let bitmin = decoder.read_i32()?;
        let bitmax = decoder.read_i32()?;
        if bitmin < 0 || bitmax < bitmin {
            return Err(Error::InvalidRange { bitmin, bitmax });
        }
        // Span arithmetic in i64: the range bound above leaves bitmax - origin
        // representable, but the check costs nothing and excludes overflow
        // outright.
        let span =
            ((bitmax as i64 - Self::align_down(bitmin) as i64) >> WORD_BITS.trailing_zeros()) + 1;
        let bytes = decoder.read_exact(span as usize * WORD_BYTES)?;
        decoder.finish()?;

        let words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| {
                let mut le = [0u8; WORD_BYTES];
                le.copy_from_slice(chunk);
                Word::from_le_bytes(le)
            })
            .collect();
        let bitmap = Self {
            bitmin,
            bitmax,
            words,
        };
        bitmap.validate()?;
        Ok(bitmap)
    }

    /// Checks the structural invariants of a freshly decoded bitmap.
    fn validate(&self) -> Result<(), Error> {
        // No set bit below bitmin in the first word.
        let below = self.words[0] & (Self::bit_mask(self.bitmin) - 1);
        // No set bit above bitmax in the last word; the double shift keeps
        // the shift amount below the word width.
        let last = self.words[self.words.len() - 1];
        let above = last >> (self.bitmax & WORD_MASK) as u32 >> 1;
        if below != 0 || above != 0 {
            return Err(Error::StrayBits);
        }
        if self.bitmin == self.bitmax {
            // Singleton or the empty sentinel; the stray checks above
            // already excluded every other bit.
            return Ok(());
        }
        for extreme in [self.bitmin, self.bitmax] {
            if !self.contains(extreme) {
                return Err(Error::Denormalized(extreme));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Bitmap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
