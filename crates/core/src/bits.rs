//! Bit buffer helpers
//!
//! Bits are carried as `u8` values of 0 or 1, indexed in transmission order.
//! Three octet layouts are in use around the PLCP:
//!
//! - LSB first: the order 802.11 transmits the octets of a PSDU.
//! - MSB first: bit 7 of each octet is the earlier bit.
//! - Word: the whole octet sequence is one big-endian word whose bit 0 is
//!   the first bit in time (the layout hardware memory dumps use).

/// Expand octets into bits, least significant bit of each octet first
pub fn unpack_lsb_first(octets: &[u8]) -> Vec<u8> {
    octets
        .iter()
        .flat_map(|&octet| (0..8).map(move |i| (octet >> i) & 1))
        .collect()
}

/// Expand octets into bits, most significant bit of each octet first
pub fn unpack_msb_first(octets: &[u8]) -> Vec<u8> {
    octets
        .iter()
        .flat_map(|&octet| (0..8).rev().map(move |i| (octet >> i) & 1))
        .collect()
}

/// Expand a big-endian word into bits, bit 0 of the word first
pub fn unpack_word(octets: &[u8]) -> Vec<u8> {
    octets.iter().rev().flat_map(|&octet| (0..8).map(move |i| (octet >> i) & 1)).collect()
}

/// Pack bits into octets, first bit into the least significant position.
/// A trailing partial octet is zero-filled.
pub fn pack_lsb_first(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << i))
        })
        .collect()
}

/// Pack bits into octets, first bit into the most significant position.
/// A trailing partial octet is zero-filled.
pub fn pack_msb_first(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << (7 - i)))
        })
        .collect()
}

/// Pack bits into a big-endian word with the first bit at bit 0
pub fn pack_word(bits: &[u8]) -> Vec<u8> {
    let mut octets = pack_lsb_first(bits);
    octets.reverse();
    octets
}

/// Even parity of a bit slice (1 when the number of ones is odd)
pub fn parity(bits: &[u8]) -> u8 {
    bits.iter().fold(0, |acc, &bit| acc ^ (bit & 1))
}

/// Number of positions at which two bit slices differ, plus any length difference
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    let common = a.iter().zip(b).filter(|(x, y)| (*x & 1) != (*y & 1)).count();
    common + a.len().abs_diff(b.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_unpack_layouts() {
        assert_eq!(unpack_lsb_first(&[0x04]), vec![0, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(unpack_msb_first(&[0x20]), vec![0, 0, 1, 0, 0, 0, 0, 0]);
        // 0x000C8D: first byte in time is the last octet, LSB first
        assert_eq!(
            unpack_word(&[0x00, 0x0C, 0x8D])[..12],
            [1, 0, 1, 1, 0, 0, 0, 1, 0, 0, 1, 1]
        );
    }

    #[test]
    fn test_pack_partial_octet() {
        assert_eq!(pack_lsb_first(&[1, 1]), vec![0x03]);
        assert_eq!(pack_msb_first(&[1, 1]), vec![0xC0]);
        assert_eq!(pack_word(&[1, 0, 1, 1, 0, 0, 0, 1, 0, 0, 1, 1]), vec![0x0C, 0x8D]);
    }

    #[test]
    fn test_parity_and_distance() {
        assert_eq!(parity(&[1, 0, 1, 1]), 1);
        assert_eq!(parity(&[1, 0, 1, 1, 1]), 0);
        assert_eq!(hamming_distance(&[1, 0, 1], &[1, 1, 1]), 1);
        assert_eq!(hamming_distance(&[1, 0], &[1, 0, 0, 0]), 2);
    }

    #[quickcheck]
    fn prop_lsb_roundtrip(octets: Vec<u8>) -> bool {
        pack_lsb_first(&unpack_lsb_first(&octets)) == octets
    }

    #[quickcheck]
    fn prop_word_roundtrip(octets: Vec<u8>) -> bool {
        pack_word(&unpack_word(&octets)) == octets
    }
}
