//! Verilog `$readmemb` dumps of octet tables
//!
//! Each word is written as binary digits with `_` between nibbles, most
//! significant bit first, with the last octet of the word leftmost. A
//! word built from `[0x00, 0x0C, 0x8D]` prints as
//! `1011_0001_0011_0000_0000_0000`.

use anyhow::{bail, Result};

/// Render `octets` as one `$readmemb` word
pub fn octets_to_readmemb(octets: &[u8]) -> String {
    octets
        .iter()
        .rev()
        .map(|&octet| {
            let reversed = octet.reverse_bits();
            format!("{:04b}_{:04b}", reversed >> 4, reversed & 0x0F)
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Split `octets` into words of `width` bytes, one word per line.
///
/// A trailing partial word is dropped.
pub fn table_to_readmemb(octets: &[u8], width: usize) -> Result<String> {
    if width == 0 {
        bail!("Word width must be at least one byte");
    }

    Ok(octets
        .chunks_exact(width)
        .map(octets_to_readmemb)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Print a bit vector as rows of `row_len` `0`/`1` digits; the last row may be short
pub fn bits_to_rows(bits: &[u8], row_len: usize) -> Result<String> {
    if row_len == 0 {
        bail!("Row length must be at least one bit");
    }

    Ok(bits
        .chunks(row_len)
        .map(|row| row.iter().map(|&bit| if bit & 1 == 1 { '1' } else { '0' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_octet() {
        assert_eq!(octets_to_readmemb(&[0x01]), "1000_0000");
        assert_eq!(octets_to_readmemb(&[0x8D]), "1011_0001");
        assert_eq!(octets_to_readmemb(&[]), "");
    }

    #[test]
    fn test_signal_word() {
        assert_eq!(
            table_to_readmemb(&[0x00, 0x0C, 0x8D], 3).unwrap(),
            "1011_0001_0011_0000_0000_0000"
        );
    }

    #[test]
    fn test_word_splitting() {
        let dump = table_to_readmemb(&[0x00, 0x0E, 0x7C, 0x40, 0x85, 0x8B], 3).unwrap();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines, ["0011_1110_0111_0000_0000_0000", "1101_0001_1010_0001_0000_0010"]);
    }

    #[test]
    fn test_partial_word_dropped() {
        assert_eq!(table_to_readmemb(&[0xFF, 0x00, 0x01], 2).unwrap(), "0000_0000_1111_1111");
        assert_eq!(table_to_readmemb(&[0xFF], 2).unwrap(), "");
        assert!(table_to_readmemb(&[0xFF], 0).is_err());
    }

    #[test]
    fn test_bit_rows() {
        assert_eq!(bits_to_rows(&[1, 0, 1, 1, 0], 2).unwrap(), "10\n11\n0");
        assert_eq!(bits_to_rows(&[0, 1, 1], 3).unwrap(), "011");
        assert_eq!(bits_to_rows(&[], 4).unwrap(), "");
        assert!(bits_to_rows(&[1], 0).is_err());
    }
}
