//! Set operations for bitmaps.
//!
//! The two operands of a binary operator have independent, possibly
//! non-aligned origins, so each result word is composed by asking each
//! operand for its word at the result's aligned position; positions outside
//! an operand's stored span read as zero. Equality and ordering follow the
//! same discipline: raw word arrays are never compared when the ranges
//! differ, because equal sets can be padded by different origins.

use crate::{
    bitmap::{Word, WORD_BITS},
    Bitmap,
};
use core::{
    cmp::Ordering,
    ops::{BitAnd, BitOr, Sub},
};

impl Bitmap {
    /// Returns the union of two bitmaps.
    ///
    /// The result range is already tight (each extreme is set in at least
    /// one operand), so no renormalization is needed.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let bitmin = self.bitmin.min(other.bitmin);
        let bitmax = self.bitmax.max(other.bitmax);
        let result = Self::compose(bitmin, bitmax, |base| {
            self.word_at(base) | other.word_at(base)
        });
        debug_assert!(result.contains(bitmin) && result.contains(bitmax));
        result
    }

    /// Returns the intersection of two bitmaps.
    ///
    /// The naive range bound can overestimate the true bit range, so the
    /// result is renormalized after composing words.
    pub fn intersection(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::new();
        }
        let bitmin = self.bitmin.max(other.bitmin);
        let bitmax = self.bitmax.min(other.bitmax);
        if bitmin > bitmax {
            // Disjoint ranges.
            return Self::new();
        }
        let mut result = Self::compose(bitmin, bitmax, |base| {
            self.word_at(base) & other.word_at(base)
        });
        result.reduce();
        result
    }

    /// Returns the difference `self - other`.
    ///
    /// Walks `other`'s set bits with [Bitmap::next_set_bit], clearing each
    /// found bit in a copy of `self`; runs of unset bits in `other` are
    /// skipped word-at-a-time. Only bits actually found set in `other` are
    /// cleared.
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = self.clone();
        if self.is_empty() || other.is_empty() {
            return result;
        }
        let mut probe = self.bitmin.max(other.bitmin);
        while let Some(bit) = other.next_set_bit(probe) {
            if bit > self.bitmax {
                break;
            }
            result.clear_unnormalized(bit);
            if bit == self.bitmax {
                break;
            }
            probe = bit + 1;
        }
        result.reduce();
        result
    }

    /// Allocates a result covering `[bitmin, bitmax]` with each word built by
    /// `combine` from its aligned base bit.
    fn compose(bitmin: i32, bitmax: i32, combine: impl Fn(i32) -> Word) -> Self {
        let origin = Self::align_down(bitmin);
        let words = (0..Self::word_span(bitmin, bitmax))
            .map(|index| combine(origin + (index as i32) * WORD_BITS))
            .collect();
        Self {
            bitmin,
            bitmax,
            words,
        }
    }

    /// Clears a bit without renormalizing; the caller reduces once at the
    /// end of a batch.
    fn clear_unnormalized(&mut self, bit: i32) {
        if bit < self.bitmin || bit > self.bitmax {
            return;
        }
        let index = ((bit - self.origin()) >> WORD_BITS.trailing_zeros()) as usize;
        self.words[index] &= !Self::bit_mask(bit);
    }
}

// ---------- Equality ----------

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        if self.bitmin == other.bitmin && self.bitmax == other.bitmax {
            // Equal ranges imply equal origins and array lengths.
            return self.words == other.words;
        }
        // Differing ranges can only describe equal sets when both are empty;
        // bitmin == bitmax alone does not guarantee emptiness, so each side
        // is checked independently.
        self.is_empty() && other.is_empty()
    }
}

impl Eq for Bitmap {}

// ---------- Ordering ----------

impl Ord for Bitmap {
    /// Total order over the serialized text form.
    ///
    /// Unequal bitmaps compare by their encodings byte-by-byte, which yields
    /// a stable order independent of representation but carries no numeric
    /// meaning. Encoding is injective on normalized content, so the order is
    /// consistent with [PartialEq].
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.encode().cmp(&other.encode())
    }
}

impl PartialOrd for Bitmap {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------- Operators ----------

impl BitOr for &Bitmap {
    type Output = Bitmap;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for &Bitmap {
    type Output = Bitmap;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Sub for &Bitmap {
    type Output = Bitmap;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(bits: &[i32]) -> Bitmap {
        bits.iter().copied().collect()
    }

    fn bits(bitmap: &Bitmap) -> Vec<i32> {
        bitmap.iter().collect()
    }

    #[test]
    fn test_concrete_scenario() {
        let a = bitmap(&[3, 10, 100]);
        let b = bitmap(&[10, 50]);

        assert_eq!(bits(&a.union(&b)), vec![3, 10, 50, 100]);
        assert_eq!(bits(&a.intersection(&b)), vec![10]);
        assert_eq!(bits(&a.difference(&b)), vec![3, 100]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_union_identity_and_commutativity() {
        let a = bitmap(&[3, 10, 100]);
        let empty = Bitmap::new();

        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
        assert_eq!(empty.union(&empty), empty);

        let b = bitmap(&[1, 500]);
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn test_union_non_aligned_origins() {
        // Origins 0 and 192: every word of each operand lands at a
        // different offset in the result.
        let a = bitmap(&[1, 63]);
        let b = bitmap(&[200, 250]);

        let union = a.union(&b);
        assert_eq!(bits(&union), vec![1, 63, 200, 250]);
        assert_eq!(Bitmap::min(&union), Some(1));
        assert_eq!(Bitmap::max(&union), Some(250));
    }

    #[test]
    fn test_intersection_disjoint_ranges() {
        let a = bitmap(&[1, 50]);
        let b = bitmap(&[100, 200]);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_intersection_overlapping_ranges_no_common_bits() {
        // The naive range bound [50, 100] is non-empty but no bit is shared;
        // renormalization must collapse the result.
        let a = bitmap(&[1, 50, 100]);
        let b = bitmap(&[49, 51, 101]);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_intersection_renormalizes_range() {
        let a = bitmap(&[1, 70, 500]);
        let b = bitmap(&[70, 400]);

        let intersection = a.intersection(&b);
        assert_eq!(bits(&intersection), vec![70]);
        assert_eq!(Bitmap::min(&intersection), Some(70));
        assert_eq!(Bitmap::max(&intersection), Some(70));
    }

    #[test]
    fn test_difference() {
        let a = bitmap(&[3, 10, 100]);

        assert_eq!(a.difference(&Bitmap::new()), a);
        assert_eq!(Bitmap::new().difference(&a), Bitmap::new());
        assert_eq!(bits(&a.difference(&a)), Vec::<i32>::new());

        // Subtrahend bits outside the minuend's range are ignored.
        let b = bitmap(&[1, 10, 5000]);
        assert_eq!(bits(&a.difference(&b)), vec![3, 100]);
    }

    #[test]
    fn test_difference_keeps_probe_origin_bit() {
        // a.bitmin > b.bitmin and the first probed position is absent from
        // b: that bit of a must survive.
        let a = bitmap(&[10, 20]);
        let b = bitmap(&[5, 20]);
        assert_eq!(bits(&a.difference(&b)), vec![10]);
    }

    #[test]
    fn test_partition_property() {
        let a = bitmap(&[1, 64, 65, 300, 301]);
        let b = bitmap(&[64, 300, 999]);

        let partitioned = a.intersection(&b).union(&a.difference(&b));
        assert_eq!(partitioned, a);
    }

    #[test]
    fn test_equality() {
        let a = bitmap(&[3, 10]);
        let b = bitmap(&[3, 10]);
        let c = bitmap(&[3, 11]);

        assert_eq!(a, b);
        assert_ne!(a, c);

        // Empties with different sentinel positions are still equal.
        let e1 = Bitmap::new();
        let e2 = bitmap(&[500]).truncate_below(501);
        assert_eq!(e1, e2);
        assert_ne!(e1, a);
        assert_ne!(a, e1);
    }

    #[test]
    fn test_ordering_consistency() {
        let values = [
            Bitmap::new(),
            bitmap(&[0]),
            bitmap(&[3, 10, 100]),
            bitmap(&[3, 10, 101]),
            bitmap(&[500]),
        ];
        for a in &values {
            assert_eq!(a.cmp(a), Ordering::Equal);
            for b in &values {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                assert_eq!(a.cmp(b) == Ordering::Equal, a == b);
            }
        }
    }

    #[test]
    fn test_ordering_is_transitive_over_sort() {
        let mut values = vec![
            bitmap(&[500]),
            Bitmap::new(),
            bitmap(&[3, 10, 101]),
            bitmap(&[0]),
            bitmap(&[3, 10, 100]),
        ];
        values.sort();
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_operator_overloads() {
        let a = bitmap(&[3, 10, 100]);
        let b = bitmap(&[10, 50]);

        assert_eq!(&a | &b, a.union(&b));
        assert_eq!(&a & &b, a.intersection(&b));
        assert_eq!(&a - &b, a.difference(&b));
    }
}
