//! Decoder fuzz target: run every decode primitive over arbitrary bytes.
//! Decoders must not panic; they return a value or an error code.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
use acnrt::{AcnDecoder, Codec, Decoder};

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut codec = match Codec::from_bytes(data) {
        Ok(c) => c,
        Err(_) => return,
    };
    while !codec.is_at_end() {
        let _ = codec.decode_integer(Some(-1000), Some(1000), None);
        let _ = codec.dec_int_positive_integer_var_size_length_embedded();
        let _ = codec.dec_int_twos_complement_var_size_length_embedded();
        let _ = codec.dec_int_bcd_var_size_null_terminated();
        let _ = codec.dec_int_bcd_var_size_length_embedded();
        let _ = codec.dec_string_ascii_null_terminated(16, 0);
        let _ = codec.dec_string_char_index_internal_field_determinant(12, b"0123456789", 0);
        let _ = codec.dec_ia5_string_char_index_internal_field_determinant(20, 1);
        let _ = codec.dec_real_ieee754_64_little_endian();
        if codec.skip_to_byte().is_err() || codec.dec_int_positive_integer_const_size_8().is_err() {
            break;
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
