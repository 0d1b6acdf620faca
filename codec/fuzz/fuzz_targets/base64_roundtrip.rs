#![no_main]

use arbitrary::Arbitrary;
use bitspan_codec::{decode, encode, encode_i32, encoded_len, Decoder, ENCODED_I32_LEN};
use libfuzzer_sys::fuzz_target;

fn roundtrip_bytes(data: &[u8]) {
    let mut text = String::new();
    encode(&mut text, data);
    assert_eq!(text.len(), encoded_len(data.len()));
    let decoded = decode(&text).expect("Failed to decode a successfully encoded input!");
    assert_eq!(decoded, data);
}

fn roundtrip_i32(value: i32) {
    let mut text = String::new();
    encode_i32(&mut text, value);
    assert_eq!(text.len(), ENCODED_I32_LEN);
    let mut decoder = Decoder::new(&text);
    let decoded = decoder
        .read_i32()
        .expect("Failed to decode a successfully encoded integer!");
    decoder.finish().expect("Encoded integer left trailing data!");
    assert_eq!(decoded, value);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Arbitrary text must be rejected gracefully, never with a panic.
    Decode(&'a str),
    // Valid encodings must decode back to the original input.
    RoundtripBytes(&'a [u8]),
    RoundtripI32(i32),
    // Field-ordered reads at arbitrary widths over arbitrary text.
    Fields { text: &'a str, bytes: u16 },
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Decode(text) => {
            let _ = decode(text);
        }
        FuzzInput::RoundtripBytes(data) => roundtrip_bytes(data),
        FuzzInput::RoundtripI32(value) => roundtrip_i32(value),
        FuzzInput::Fields { text, bytes } => {
            let mut decoder = Decoder::new(text);
            let _ = decoder.read_i32();
            let _ = decoder.read_exact(bytes as usize);
            let _ = decoder.finish();
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
