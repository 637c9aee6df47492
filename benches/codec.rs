//! Benchmark: per-field primitive cost and a full encode/decode pass over a packed
//! record mixing PER and ACN fields.

use acnrt::{AcnDecoder, AcnEncoder, Codec, Decoder, Encoder};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const RECORDS: usize = 1_000;

fn encode_records(codec: &mut Codec) {
    for i in 0..RECORDS as u64 {
        let _ = codec.encode_integer((i % 100) as i64, 0, 99, None);
        let _ = codec.enc_int_twos_complement_const_size(-(i as i64 % 2048), 12);
        let _ = codec.enc_int_positive_integer_var_size_length_embedded(i * 1_000);
        let _ = codec.enc_int_bcd_const_size(i % 10_000, 4);
        let _ = codec.enc_real_ieee754_32_big_endian(i as f32 * 0.5);
    }
}

fn decode_records(codec: &mut Codec) -> i64 {
    let mut acc = 0i64;
    for _ in 0..RECORDS {
        acc += codec.decode_integer(Some(0), Some(99), None).map(|d| d.value).unwrap_or(0);
        acc += codec.dec_int_twos_complement_const_size(12).map(|d| d.value).unwrap_or(0);
        acc += codec.dec_int_positive_integer_var_size_length_embedded().map(|d| d.value as i64).unwrap_or(0);
        acc += codec.dec_int_bcd_const_size(4).map(|d| d.value as i64).unwrap_or(0);
        acc += codec.dec_real_ieee754_32_big_endian().map(|d| d.value as i64).unwrap_or(0);
    }
    acc
}

fn bench_codec(c: &mut Criterion) {
    let mut encoded = Codec::default();
    encode_records(&mut encoded);
    let bytes = encoded.get_data_copy();
    eprintln!("{} records, {} bits", RECORDS, encoded.size_in_bits());

    c.bench_function("encode_integer_constrained", |b| {
        let mut codec = Codec::new(64).expect("codec");
        b.iter(|| {
            codec.rewind();
            black_box(codec.encode_integer(black_box(1234), -5000, 5000, None).is_ok())
        });
    });

    c.bench_function("encode_records", |b| {
        let mut codec = Codec::default();
        b.iter(|| {
            codec.reset();
            encode_records(&mut codec);
            black_box(codec.size_in_bits())
        });
    });

    c.bench_function("decode_records", |b| {
        b.iter(|| {
            let mut codec = Codec::from_bytes(black_box(&bytes)).expect("codec");
            black_box(decode_records(&mut codec))
        });
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
