//! Pure bit/byte arithmetic and constraint predicates shared by the primitives and by
//! generated message types.
//!
//! These are contract-level helpers: a caller passing nonsense (a mask wider than 64
//! bits, an inverted range) is a programming error and panics, unlike the data-dependent
//! failures the primitives report through [`CodecError`](crate::CodecError).

/// Characters 0..=127, the IA5 (ASCII) alphabet used by the IA5 char-index strings.
pub const IA5_ALPHABET: [u8; 128] = ia5_alphabet();

const fn ia5_alphabet() -> [u8; 128] {
    let mut a = [0u8; 128];
    let mut i = 0;
    while i < 128 {
        a[i] = i as u8;
        i += 1;
    }
    a
}

/// Number of significant bits in `value` (0 for 0).
pub fn bit_length(value: u64) -> u32 {
    64 - value.leading_zeros()
}

/// Width of the unsigned span `max - min`, computed without overflow.
///
/// # Panics
///
/// Panics if `max < min`.
pub fn range_span(min: i64, max: i64) -> u64 {
    assert!(min <= max, "inverted range [{}, {}]", min, max);
    (max as i128 - min as i128) as u64
}

/// Bits needed for the offset encoding of `[min, max]`; 0 when the range holds one value.
///
/// # Panics
///
/// Panics if `max < min`.
pub fn bits_needed(min: i64, max: i64) -> u32 {
    bit_length(range_span(min, max))
}

/// Bits needed to index `count` alternatives: `ceil(log2(count))`, 0 for 0 or 1.
pub fn index_bits(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        bit_length((count - 1) as u64)
    }
}

/// Minimum number of bytes holding `value` as unsigned; 0 still takes one byte.
pub fn bytes_needed_unsigned(value: u64) -> usize {
    (bit_length(value) as usize).div_ceil(8).max(1)
}

/// Minimum number of bytes whose two's-complement range contains `value`.
pub fn bytes_needed_signed(value: i64) -> usize {
    let magnitude = if value < 0 { !(value as u64) } else { value as u64 };
    (bit_length(magnitude) as usize + 1).div_ceil(8)
}

/// Low `bits` ones.
///
/// # Panics
///
/// Panics if `bits > 64`.
pub fn mask(bits: u32) -> u64 {
    assert!(bits <= 64, "mask of {} bits", bits);
    if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

pub fn fits_unsigned(value: u64, bits: u32) -> bool {
    bits >= 64 || value >> bits == 0
}

/// True if `value` lies in `[-2^(bits-1), 2^(bits-1) - 1]`. Zero bits only hold 0.
pub fn fits_signed(value: i64, bits: u32) -> bool {
    if bits == 0 {
        return value == 0;
    }
    if bits >= 64 {
        return true;
    }
    let half = 1i128 << (bits - 1);
    let v = value as i128;
    (-half..half).contains(&v)
}

pub fn in_range(value: i64, min: i64, max: i64) -> bool {
    min <= value && value <= max
}

/// Unsigned field carrying `value` in `bits`-wide two's complement (`2^bits + value` for negatives).
pub fn to_twos_complement(value: i64, bits: u32) -> u64 {
    (value as u64) & mask(bits)
}

/// Interpret the low `bits` of `raw` as two's complement.
pub fn sign_extend(raw: u64, bits: u32) -> i64 {
    if bits == 0 {
        return 0;
    }
    if bits >= 64 {
        return raw as i64;
    }
    let shift = 64 - bits;
    ((raw << shift) as i64) >> shift
}

/// Decimal digits of `value`, most significant first. 0 yields `[0]`.
pub fn decimal_digits(value: u64) -> Vec<u8> {
    let mut digits = Vec::with_capacity(20);
    let mut v = value;
    loop {
        digits.push((v % 10) as u8);
        v /= 10;
        if v == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

/// Parse a `'0'`/`'1'` string into MSB-aligned bytes. Returns `None` on any other character.
pub fn bitstring_to_bytes(bits: &str) -> Option<Vec<u8>> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, c) in bits.chars().enumerate() {
        match c {
            '0' => {}
            '1' => out[i / 8] |= 0x80 >> (i % 8),
            _ => return None,
        }
    }
    Some(out)
}

/// Render the first `nbits` bits of `bytes` as `'0'`/`'1'` text.
pub fn bytes_to_bitstring(bytes: &[u8], nbits: usize) -> String {
    (0..nbits.min(bytes.len() * 8))
        .map(|i| if bytes[i / 8] & (0x80 >> (i % 8)) != 0 { '1' } else { '0' })
        .collect()
}
