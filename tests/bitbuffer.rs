//! BitBuffer through its public API: capacity, cursor, high-water mark and extraction.

use acnrt::{BitBuffer, BitStreamError};

#[test]
fn from_bytes_counts_everything_as_used() {
    let mut buf = BitBuffer::from_bytes(&[0xC8, 0x01]).expect("buffer");
    assert_eq!(buf.capacity_bits(), 16);
    assert_eq!(buf.size_in_bits(), 16);
    assert_eq!(buf.read_bits(8).expect("read"), 200);
    assert_eq!(buf.bits_remaining(), 8);
    assert_eq!(BitBuffer::from_bytes(&[]), Err(BitStreamError::ZeroCapacity));
}

#[test]
fn capacity_not_multiple_of_eight() {
    let mut buf = BitBuffer::new(13).expect("buffer");
    buf.write_bits(0x1FFF, 13).expect("fill");
    assert!(buf.is_at_end());
    assert_eq!(buf.get_data(), &[0xFF, 0xF8]);
    assert_eq!(
        buf.write_bit(true),
        Err(BitStreamError::Overrun { requested: 1, remaining: 0 })
    );
}

#[test]
fn get_data_returns_used_prefix_only() {
    let mut buf = BitBuffer::new(1024).expect("buffer");
    assert!(buf.get_data().is_empty());
    buf.write_bits(0b101, 3).expect("write");
    assert_eq!(buf.get_data(), &[0b1010_0000]);
    buf.write_bits(0xFF, 8).expect("write");
    assert_eq!(buf.get_data_copy(), vec![0b1011_1111, 0b1110_0000]);
}

#[test]
fn rewinding_keeps_high_water_mark() {
    let mut buf = BitBuffer::new(32).expect("buffer");
    buf.write_bits(0xABCD, 16).expect("write");
    buf.set_bit_position(4).expect("seek");
    buf.write_bits(0x0, 4).expect("overwrite");
    assert_eq!(buf.size_in_bits(), 16);
    assert_eq!(buf.get_data(), &[0xA0, 0xCD]);

    buf.set_bit_position(0).expect("seek");
    assert_eq!(buf.read_bits(16).expect("read"), 0xA0CD);
}

#[test]
fn set_position_bounds() {
    let mut buf = BitBuffer::new(16).expect("buffer");
    buf.set_bit_position(16).expect("end is valid");
    assert!(buf.is_at_end());
    assert_eq!(
        buf.set_bit_position(17),
        Err(BitStreamError::PositionOutOfRange { position: 17, capacity: 16 })
    );
    assert_eq!(buf.position(), 16);
}

#[test]
fn reset_clears_contents() {
    let mut buf = BitBuffer::new(16).expect("buffer");
    buf.write_bits(0xFFFF, 16).expect("write");
    buf.reset();
    assert_eq!((buf.position(), buf.size_in_bits()), (0, 0));
    buf.write_bit(true).expect("write");
    assert_eq!(buf.get_data(), &[0x80]);
}

#[test]
fn single_bits_and_bytes_interleave() {
    let mut buf = BitBuffer::new(64).expect("buffer");
    buf.write_bit(true).expect("bit");
    buf.write_byte(0x81).expect("byte");
    buf.write_bit(false).expect("bit");
    buf.write_bytes(&[0x12, 0x34]).expect("bytes");
    assert_eq!(buf.position(), 26);

    buf.set_bit_position(0).expect("seek");
    assert!(buf.read_bit().expect("bit"));
    assert_eq!(buf.read_byte().expect("byte"), 0x81);
    assert!(!buf.read_bit().expect("bit"));
    assert_eq!(buf.read_bytes(2).expect("bytes"), vec![0x12, 0x34]);
}

#[test]
fn skip_alignment_does_not_grow_data() {
    let mut buf = BitBuffer::from_bytes(&[0xFF, 0x0F]).expect("buffer");
    buf.read_bits(3).expect("read");
    assert_eq!(buf.align_to_byte(false).expect("skip"), 5);
    assert_eq!(buf.position(), 8);
    assert_eq!(buf.align_to_byte(false).expect("aligned"), 0);
    assert_eq!(buf.read_byte().expect("byte"), 0x0F);
}

#[test]
fn clone_is_independent() {
    let mut original = BitBuffer::new(16).expect("buffer");
    original.write_bits(0xA, 4).expect("write");
    let mut branch = original.clone();
    branch.write_bits(0xF, 4).expect("write");
    assert_eq!(original.position(), 4);
    assert_eq!(original.get_data(), &[0xA0]);
    assert_eq!(branch.get_data(), &[0xAF]);
}

#[test]
fn errors_describe_the_failure() {
    let mut buf = BitBuffer::new(8).expect("buffer");
    let e = buf.write_bits(0x1FF, 8).expect_err("too wide");
    assert_eq!(e.to_string(), "value 0x1ff does not fit in 8 bits");
    let e = buf.read_bits(65).expect_err("too many");
    assert_eq!(e, BitStreamError::CountTooLarge(65));
}
