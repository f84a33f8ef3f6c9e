//! PLCP DATA scrambler and descrambler, generator polynomial x^7 + x^4 + 1

use crate::{FrameError, Result};

/// Additive scrambler over a 7-bit shift register.
///
/// Bit `k` of the register holds `x(k+1)`. Each step the feedback
/// `x7 ^ x4` is XORed onto the data bit and shifted in at `x1`, so the
/// keystream depends only on the seed and scrambling is its own inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrambler {
    state: u8,
}

impl Default for Scrambler {
    fn default() -> Self {
        Self { state: Self::DEFAULT_SEED }
    }
}

impl Scrambler {
    pub const DEFAULT_SEED: u8 = 0b111_1111;
    /// Length of the keystream before it repeats
    pub const PERIOD: usize = 127;

    /// Create a scrambler from a 7-bit seed
    pub fn new(seed: u8) -> Result<Self> {
        if seed > 0x7F {
            return Err(FrameError::InvalidSeed { seed });
        }
        Ok(Self { state: seed })
    }

    /// Create a scrambler from seed bits listed x1 first
    pub fn from_seed_bits(bits: [u8; 7]) -> Self {
        let state = bits
            .iter()
            .enumerate()
            .fold(0u8, |acc, (k, &bit)| acc | ((bit & 1) << k));
        Self { state }
    }

    /// Current register contents
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Scramble (or descramble) one bit
    pub fn step(&mut self, input_bit: u8) -> u8 {
        let feedback = ((self.state >> 6) ^ (self.state >> 3)) & 1;
        self.state = ((self.state << 1) | feedback) & 0x7F;
        (input_bit & 1) ^ feedback
    }

    /// The next `len` keystream bits
    pub fn sequence(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.step(0)).collect()
    }

    /// Scramble a bit stream, continuing from the current state
    pub fn scramble(&mut self, bits: &[u8]) -> Vec<u8> {
        bits.iter().map(|&bit| self.step(bit)).collect()
    }
}

/// Scramble `bits` with a fresh scrambler seeded with `seed`
pub fn scramble(seed: u8, bits: &[u8]) -> Result<Vec<u8>> {
    Ok(Scrambler::new(seed)?.scramble(bits))
}

/// Descramble `bits` with a fresh scrambler seeded with `seed`
pub fn descramble(seed: u8, bits: &[u8]) -> Result<Vec<u8>> {
    scramble(seed, bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    /// Keystream of the all-ones seed, one full period
    const ALL_ONES_SEQUENCE: [u8; 127] = [
        0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0,
        1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1, 1, 0, 0, 0, 0, 0,
        1, 1, 0, 0, 1, 1, 0, 1, 0, 1, 0, 0, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 0, 1, 0, 0, 0, 0,
        1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1, 1, 1, 0, 0, 0,
        1, 1, 1, 1, 1, 1, 1,
    ];

    #[test]
    fn test_all_ones_seed_sequence() {
        let mut scrambler = Scrambler::default();
        assert_eq!(scrambler.sequence(127), ALL_ONES_SEQUENCE.to_vec());
        // Back at the seed after one period
        assert_eq!(scrambler.state(), Scrambler::DEFAULT_SEED);
    }

    #[test]
    fn test_period() {
        let mut scrambler = Scrambler::new(0b101_1101).unwrap();
        let seq = scrambler.sequence(2 * Scrambler::PERIOD);
        assert_eq!(seq[..127], seq[127..]);
        // No shorter period
        for p in 1..127 {
            assert_ne!(seq[..127], seq[p..p + 127], "period {}", p);
        }
    }

    #[test]
    fn test_seed_bits_order() {
        assert_eq!(Scrambler::from_seed_bits([1; 7]), Scrambler::default());
        assert_eq!(Scrambler::from_seed_bits([1, 0, 0, 0, 0, 0, 0]).state(), 0b000_0001);
        assert_eq!(Scrambler::from_seed_bits([1, 0, 1, 1, 1, 0, 1]).state(), 0b101_1101);
    }

    #[test]
    fn test_invalid_seed() {
        assert_eq!(Scrambler::new(0x80), Err(FrameError::InvalidSeed { seed: 0x80 }));
        assert!(scramble(0xFF, &[0, 1]).is_err());
    }

    #[test]
    fn test_zero_seed_is_transparent() {
        let bits = vec![1, 0, 1, 1, 0];
        assert_eq!(scramble(0, &bits).unwrap(), bits);
    }

    #[quickcheck]
    fn prop_self_inverse(seed: u8, bits: Vec<bool>) -> bool {
        let seed = seed & 0x7F;
        let bits: Vec<u8> = bits.into_iter().map(u8::from).collect();
        let scrambled = scramble(seed, &bits).unwrap();
        descramble(seed, &scrambled).unwrap() == bits
    }
}
