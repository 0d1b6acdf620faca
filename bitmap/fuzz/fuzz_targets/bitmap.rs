#![no_main]

use arbitrary::Arbitrary;
use bitspan_bitmap::Bitmap;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

const MAX_BIT: i32 = 1 << 21;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(u32),
    Remove(u32),
    TruncateBelow(u32),
    TruncateAbove(u32),
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Arbitrary text must be rejected gracefully, never with a panic.
    Decode(&'a str),
    // Valid bitmaps must round-trip through the text form.
    Roundtrip(Bitmap),
    // Operators must agree with a BTreeSet reference model.
    Model { a: Vec<Op>, b: Vec<Op> },
}

fn clamp(bit: u32) -> i32 {
    (bit as i32).rem_euclid(MAX_BIT)
}

fn apply(ops: &[Op]) -> (Bitmap, BTreeSet<i32>) {
    let mut bitmap = Bitmap::new();
    let mut model = BTreeSet::new();
    for op in ops {
        match op {
            Op::Insert(bit) => {
                let bit = clamp(*bit);
                assert_eq!(bitmap.insert(bit), model.insert(bit));
            }
            Op::Remove(bit) => {
                let bit = clamp(*bit);
                assert_eq!(bitmap.remove(bit), model.remove(&bit));
            }
            Op::TruncateBelow(bit) => {
                let bit = clamp(*bit);
                bitmap = bitmap.truncate_below(bit);
                model.retain(|&kept| kept >= bit);
            }
            Op::TruncateAbove(bit) => {
                let bit = clamp(*bit);
                bitmap = bitmap.truncate_above(bit);
                model.retain(|&kept| kept <= bit);
            }
        }
    }
    assert!(bitmap.iter().eq(model.iter().copied()));
    (bitmap, model)
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Decode(text) => {
            if let Ok(bitmap) = Bitmap::decode(text) {
                // Anything accepted must re-encode and round-trip.
                let roundtripped =
                    Bitmap::decode(&bitmap.encode()).expect("Failed to decode an accepted value!");
                assert_eq!(roundtripped, bitmap);
            }
        }
        FuzzInput::Roundtrip(bitmap) => {
            let text = bitmap.encode();
            let decoded = Bitmap::decode(&text)
                .expect("Failed to decode a successfully encoded bitmap!");
            assert_eq!(decoded, bitmap);
        }
        FuzzInput::Model { a, b } => {
            let (a_bitmap, a_model) = apply(&a);
            let (b_bitmap, b_model) = apply(&b);

            let union = &a_bitmap | &b_bitmap;
            assert!(union.iter().eq(a_model.union(&b_model).copied()));

            let intersection = &a_bitmap & &b_bitmap;
            assert!(intersection
                .iter()
                .eq(a_model.intersection(&b_model).copied()));

            let difference = &a_bitmap - &b_bitmap;
            assert!(difference.iter().eq(a_model.difference(&b_model).copied()));

            // Intersection and difference partition a with respect to b.
            assert_eq!(intersection.union(&difference), a_bitmap);
            assert_eq!(a_bitmap == b_bitmap, a_model == b_model);
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
