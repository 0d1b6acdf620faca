//! A dynamically-ranged bitmap for sets of non-negative integers.
//!
//! # Overview
//!
//! [Bitmap] stores a sparse set of `i32` bit numbers as a packed array of
//! 64-bit words addressed relative to a word-aligned origin. The covered
//! range `[bitmin, bitmax]` grows and shrinks on demand:
//! - [Bitmap::insert] and [Bitmap::remove] mutate in place, growing
//!   whole-word and renormalizing when an extreme bit is cleared
//! - [Bitmap::truncate_below] and [Bitmap::truncate_above] return trimmed
//!   copies
//! - [Bitmap::union], [Bitmap::intersection], and [Bitmap::difference]
//!   compose two bitmaps with independent origins into a fresh value (also
//!   available as `|`, `&`, and `-` on references)
//! - [Bitmap::encode] and [Bitmap::decode] convert to and from a compact
//!   base64 text form (also `Display` and `FromStr`), which doubles as the
//!   basis of the `Ord` total order
//!
//! Equality is semantic: two bitmaps holding the same bits are equal even
//! when their empty sentinels sit at different positions.
//!
//! # Example
//!
//! ```
//! use bitspan_bitmap::Bitmap;
//!
//! let a: Bitmap = [3, 10, 100].into_iter().collect();
//! let b: Bitmap = [10, 50].into_iter().collect();
//!
//! let union = &a | &b;
//! assert_eq!(union.iter().collect::<Vec<_>>(), vec![3, 10, 50, 100]);
//! assert_eq!((&a & &b).iter().collect::<Vec<_>>(), vec![10]);
//! assert_eq!((&a - &b).iter().collect::<Vec<_>>(), vec![3, 100]);
//!
//! let text = union.encode();
//! assert_eq!(Bitmap::decode(&text).unwrap(), union);
//! ```

mod bitmap;
pub mod error;
mod ops;
mod text;

// Re-export main types
pub use bitmap::{Bitmap, Iter};
pub use error::Error;
