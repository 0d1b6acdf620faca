//! The bitmap store: origin-relative word addressing, growth, and
//! renormalization.
//!
//! A [Bitmap] covers the bit range `[bitmin, bitmax]` with a word array whose
//! first word starts at the word-aligned origin at or below `bitmin`. Word `i`
//! holds bits `[origin + i*64, origin + i*64 + 63]`. After every public
//! operation the representation is normalized: `bitmin` and `bitmax` are both
//! actually set, unless the bitmap is empty, in which case `bitmin == bitmax`
//! and every word is zero (the empty sentinel, not a literal singleton).

use core::fmt::{self, Formatter};

/// Type alias for the underlying word type.
pub(crate) type Word = u64;

/// Number of bits in a [Word].
pub(crate) const WORD_BITS: i32 = Word::BITS as i32;

/// Mask selecting a bit's offset within its word.
pub(crate) const WORD_MASK: i32 = WORD_BITS - 1;

/// Number of bytes in a [Word].
pub(crate) const WORD_BYTES: usize = (Word::BITS / 8) as usize;

/// A dynamically-ranged set of non-negative bit numbers, packed into words.
///
/// The covered range grows and shrinks on demand: [Bitmap::insert] widens it
/// whole-word, [Bitmap::remove] retightens it when an extreme bit is cleared,
/// and the range trims and binary operators return fresh values.
///
/// # Example
///
/// ```
/// use bitspan_bitmap::Bitmap;
///
/// let mut bitmap = Bitmap::new();
/// bitmap.insert(3);
/// bitmap.insert(100);
///
/// assert!(bitmap.contains(3));
/// assert!(!bitmap.contains(50));
/// assert_eq!(bitmap.iter().collect::<Vec<_>>(), vec![3, 100]);
/// ```
#[derive(Clone)]
pub struct Bitmap {
    /// Lowest stored bit number (inclusive).
    pub(crate) bitmin: i32,
    /// Highest stored bit number (inclusive).
    pub(crate) bitmax: i32,
    /// The packed bits, covering `[origin, bitmax]` exactly.
    pub(crate) words: Vec<Word>,
}

impl Bitmap {
    /// Creates an empty bitmap.
    #[inline]
    pub fn new() -> Self {
        Self {
            bitmin: 0,
            bitmax: 0,
            words: vec![0],
        }
    }

    /// Creates a bitmap holding exactly one bit.
    #[inline]
    pub fn singleton(bit: i32) -> Self {
        debug_assert!(bit >= 0, "negative bit number: {bit}");
        Self {
            bitmin: bit,
            bitmax: bit,
            words: vec![Self::bit_mask(bit)],
        }
    }

    /// Returns whether no bit is set.
    ///
    /// In a normalized bitmap the word holding `bitmin` is zero only in the
    /// empty sentinel state, so a single word test suffices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words[0] == 0
    }

    /// Returns the lowest set bit, or `None` if the bitmap is empty.
    ///
    /// # Panics
    ///
    /// Panics if the bitmap claims a non-empty range but the claimed minimum
    /// is not set, which indicates a corrupted representation.
    pub fn min(&self) -> Option<i32> {
        if self.words[0] & Self::bit_mask(self.bitmin) != 0 {
            return Some(self.bitmin);
        }
        assert!(
            self.bitmin == self.bitmax,
            "corrupted bitmap: bit {} claimed as minimum of {}..{} is not set",
            self.bitmin,
            self.bitmin,
            self.bitmax
        );
        None
    }

    /// Returns the highest set bit, or `None` if the bitmap is empty.
    ///
    /// # Panics
    ///
    /// Panics if the bitmap claims a non-empty range but the claimed maximum
    /// is not set, which indicates a corrupted representation.
    pub fn max(&self) -> Option<i32> {
        let index = self.word_index(self.bitmax);
        if self.words[index] & Self::bit_mask(self.bitmax) != 0 {
            return Some(self.bitmax);
        }
        assert!(
            self.bitmin == self.bitmax,
            "corrupted bitmap: bit {} claimed as maximum of {}..{} is not set",
            self.bitmax,
            self.bitmin,
            self.bitmax
        );
        None
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Tests a bit.
    ///
    /// Bits outside `[bitmin, bitmax]` read as unset; no addressing happens
    /// for them, so any `i32` is a safe argument.
    #[inline]
    pub fn contains(&self, bit: i32) -> bool {
        if bit < self.bitmin || bit > self.bitmax {
            return false;
        }
        self.words[self.word_index(bit)] & Self::bit_mask(bit) != 0
    }

    /// Sets a bit, growing the covered range if needed.
    ///
    /// Returns `true` if the bit was newly set, `false` if already present.
    /// Growth is always whole-word: the array is extended to the word-aligned
    /// boundary covering the new bit, never bit-granular.
    pub fn insert(&mut self, bit: i32) -> bool {
        debug_assert!(bit >= 0, "negative bit number: {bit}");
        if self.is_empty() {
            // The sentinel range is stale; seed the singleton directly
            // instead of widening from it.
            *self = Self::singleton(bit);
            return true;
        }
        if bit < self.bitmin || bit > self.bitmax {
            self.grow_to(bit);
        }
        let index = self.word_index(bit);
        let mask = Self::bit_mask(bit);
        let newly = self.words[index] & mask == 0;
        self.words[index] |= mask;
        newly
    }

    /// Clears a bit.
    ///
    /// Returns `true` if the bit was present. Clearing `bitmin` or `bitmax`
    /// renormalizes the store: the range is retightened to the true extreme
    /// set bits and now-empty edge words are dropped. Bits outside the
    /// covered range are a no-op.
    pub fn remove(&mut self, bit: i32) -> bool {
        if bit < self.bitmin || bit > self.bitmax {
            return false;
        }
        let index = self.word_index(bit);
        let mask = Self::bit_mask(bit);
        if self.words[index] & mask == 0 {
            return false;
        }
        self.words[index] &= !mask;
        if bit == self.bitmin || bit == self.bitmax {
            self.reduce();
        }
        true
    }

    /// Returns the first set bit at or above `from`, or `None` if no set bit
    /// remains.
    ///
    /// Scans word-at-a-time. Enumerating a whole bitmap by advancing `from`
    /// past each hit costs O(words) overall, never rescanning from the start.
    pub fn next_set_bit(&self, from: i32) -> Option<i32> {
        if self.is_empty() || from > self.bitmax {
            return None;
        }
        let start = from.max(self.bitmin);
        let origin = self.origin();
        let mut index = ((start - origin) >> WORD_BITS.trailing_zeros()) as usize;
        // Mask off bits below the starting position in the first word.
        let mut word = self.words[index] & (Word::MAX << (start & WORD_MASK) as u32);
        loop {
            if word != 0 {
                let bit = origin + (index as i32) * WORD_BITS + word.trailing_zeros() as i32;
                return (bit <= self.bitmax).then_some(bit);
            }
            index += 1;
            if index == self.words.len() {
                return None;
            }
            word = self.words[index];
        }
    }

    /// Returns a new bitmap with every bit below `min` removed.
    ///
    /// The result's range is retightened to the true lowest surviving set
    /// bit; if nothing survives, the result is empty.
    pub fn truncate_below(&self, min: i32) -> Self {
        if min <= self.bitmin {
            return self.clone();
        }
        if min > self.bitmax {
            return Self::new();
        }
        let first = self.word_index(min);
        let mut words = self.words[first..].to_vec();
        // Mask off the out-of-range bits in the partially-truncated word.
        words[0] &= Word::MAX << (min & WORD_MASK) as u32;
        let mut result = Self {
            bitmin: min,
            bitmax: self.bitmax,
            words,
        };
        result.reduce();
        result
    }

    /// Returns a new bitmap with every bit above `max` removed.
    ///
    /// The result's range is retightened to the true highest surviving set
    /// bit; if nothing survives, the result is empty.
    pub fn truncate_above(&self, max: i32) -> Self {
        if max >= self.bitmax {
            return self.clone();
        }
        if max < self.bitmin {
            return Self::new();
        }
        let last = self.word_index(max);
        let mut words = self.words[..=last].to_vec();
        // Mask off the out-of-range bits in the partially-truncated word.
        words[last] &= Word::MAX >> (WORD_MASK - (max & WORD_MASK)) as u32;
        let mut result = Self {
            bitmin: self.bitmin,
            bitmax: max,
            words,
        };
        result.reduce();
        result
    }

    /// Creates an iterator over the set bits in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bitmap: self,
            cursor: self.bitmin,
            done: self.is_empty(),
        }
    }

    // ---------- Helper Functions ----------

    /// Calculates the word-aligned origin at or below `bit`.
    #[inline(always)]
    pub(crate) fn align_down(bit: i32) -> i32 {
        bit & !WORD_MASK
    }

    /// Calculates the number of words covering `[align_down(min), max]`.
    #[inline(always)]
    pub(crate) fn word_span(min: i32, max: i32) -> usize {
        (((max - Self::align_down(min)) >> WORD_BITS.trailing_zeros()) + 1) as usize
    }

    /// Creates the mask selecting `bit` within its word.
    #[inline(always)]
    pub(crate) fn bit_mask(bit: i32) -> Word {
        1 << (bit & WORD_MASK) as u32
    }

    /// Returns this bitmap's word-aligned origin.
    #[inline(always)]
    pub(crate) fn origin(&self) -> i32 {
        Self::align_down(self.bitmin)
    }

    /// Calculates the index of the word holding `bit`.
    ///
    /// `bit` must lie within `[origin, bitmax]`.
    #[inline(always)]
    fn word_index(&self, bit: i32) -> usize {
        ((bit - self.origin()) >> WORD_BITS.trailing_zeros()) as usize
    }

    /// Returns the stored word whose lowest bit is `base`, or zero when
    /// `base` falls outside the stored span.
    ///
    /// `base` must be word-aligned. Operands of the binary operators have
    /// independent origins; this is the addressing primitive that lets a
    /// result word be composed from differently-aligned inputs.
    #[inline]
    pub(crate) fn word_at(&self, base: i32) -> Word {
        debug_assert_eq!(base & WORD_MASK, 0, "unaligned word base: {base}");
        let index = (base - self.origin()) >> WORD_BITS.trailing_zeros();
        if index < 0 || index as usize >= self.words.len() {
            return 0;
        }
        self.words[index as usize]
    }

    /// Grows the word array to cover `bit`, copying existing words to their
    /// shifted offsets and zero-filling the newly exposed words.
    ///
    /// Leaves the bitmap transiently denormalized (the widened extreme is not
    /// set yet); the caller sets the bit immediately after.
    fn grow_to(&mut self, bit: i32) {
        let new_min = self.bitmin.min(bit);
        let new_max = self.bitmax.max(bit);
        let new_len = Self::word_span(new_min, new_max);
        let offset =
            ((self.origin() - Self::align_down(new_min)) >> WORD_BITS.trailing_zeros()) as usize;
        if offset == 0 {
            self.words.resize(new_len, 0);
        } else {
            let mut words = vec![0; new_len];
            words[offset..offset + self.words.len()].copy_from_slice(&self.words);
            self.words = words;
        }
        self.bitmin = new_min;
        self.bitmax = new_max;
    }

    /// Restores the normalized invariant: retightens `bitmin`/`bitmax` to the
    /// true extreme set bits and drops all-zero words at either end. If no
    /// bit remains set, collapses to the empty sentinel.
    pub(crate) fn reduce(&mut self) {
        let first = match self.words.iter().position(|&word| word != 0) {
            Some(first) => first,
            None => {
                self.words.clear();
                self.words.push(0);
                self.bitmax = self.bitmin;
                return;
            }
        };
        let base = self.origin() + (first as i32) * WORD_BITS;
        if first > 0 {
            self.words.drain(..first);
        }
        self.bitmin = base + self.words[0].trailing_zeros() as i32;

        let mut last = self.words.len() - 1;
        while self.words[last] == 0 {
            last -= 1;
        }
        self.words.truncate(last + 1);
        self.bitmax =
            base + (last as i32) * WORD_BITS + (WORD_MASK - self.words[last].leading_zeros() as i32);
    }
}

// ---------- Constructors ----------

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<i32> for Bitmap {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        let mut bitmap = Self::new();
        bitmap.extend(iter);
        bitmap
    }
}

impl Extend<i32> for Bitmap {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        for bit in iter {
            self.insert(bit);
        }
    }
}

// ---------- Debug ----------

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // For very large bitmaps, only show a preview.
        const MAX_DISPLAY: usize = 32;

        f.write_str("Bitmap{")?;
        for (i, bit) in self.iter().take(MAX_DISPLAY).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{bit}")?;
        }
        if self.count_ones() > MAX_DISPLAY {
            f.write_str(", ...")?;
        }
        f.write_str("}")
    }
}

// ---------- Iterator ----------

/// Iterator over the set bits of a [Bitmap], in ascending order.
pub struct Iter<'a> {
    /// The bitmap being iterated over.
    bitmap: &'a Bitmap,

    /// The next bit number to probe.
    cursor: i32,

    /// Set once the scan has passed the last set bit.
    done: bool,
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.bitmap.next_set_bit(self.cursor) {
            Some(bit) => {
                // bit + 1 would overflow at the extreme of the domain.
                if bit == i32::MAX {
                    self.done = true;
                } else {
                    self.cursor = bit + 1;
                }
                Some(bit)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, Some(self.bitmap.count_ones()))
    }
}

impl<'a> IntoIterator for &'a Bitmap {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------- Arbitrary ----------

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for Bitmap {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let count = u.int_in_range(0..=512)?;
        let mut bitmap = Self::new();
        for _ in 0..count {
            bitmap.insert(u.int_in_range(0..=1 << 20)?);
        }
        Ok(bitmap)
    }
}
