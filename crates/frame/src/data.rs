//! DATA field bit preparation: SERVICE, PSDU, tail and pad bits

use crate::fec::{ConvolutionalEncoder, FecEncoder};
use crate::rate::{CodeRate, Rate};
use crate::scrambler::Scrambler;
use crate::signal::SignalField;
use crate::{FrameError, Result};
use dot11a_core::bits::unpack_lsb_first;
use tracing::debug;

/// DATA field of one PPDU before modulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    rate: Rate,
    psdu: Vec<u8>,
}

impl DataField {
    pub const SERVICE_BITS: usize = 16;
    pub const TAIL_BITS: usize = 6;
    /// Leading SERVICE bits left zero so the receiver can recover the scrambler state
    pub const SCRAMBLER_INIT_BITS: usize = 7;

    pub fn new(rate: Rate, psdu: Vec<u8>) -> Result<Self> {
        if psdu.len() > SignalField::MAX_LENGTH {
            return Err(FrameError::InvalidLength { length: psdu.len() });
        }
        Ok(Self { rate, psdu })
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn psdu(&self) -> &[u8] {
        &self.psdu
    }

    /// The SIGNAL field announcing this DATA field
    pub fn signal(&self) -> Result<SignalField> {
        SignalField::new(self.rate, self.psdu.len())
    }

    fn payload_bits(&self) -> usize {
        Self::SERVICE_BITS + 8 * self.psdu.len() + Self::TAIL_BITS
    }

    /// Number of OFDM symbols (N_SYM)
    pub fn n_sym(&self) -> usize {
        self.payload_bits().div_ceil(self.rate.params().ndbps)
    }

    /// Number of data bits after padding (N_DATA)
    pub fn n_data(&self) -> usize {
        self.n_sym() * self.rate.params().ndbps
    }

    /// Number of pad bits (N_PAD)
    pub fn n_pad(&self) -> usize {
        self.n_data() - self.payload_bits()
    }

    fn tail_start(&self) -> usize {
        Self::SERVICE_BITS + 8 * self.psdu.len()
    }

    /// Unscrambled DATA bits: SERVICE, PSDU least significant bit first, tail, pad
    pub fn bits(&self) -> Vec<u8> {
        let mut bits = Vec::with_capacity(self.n_data());
        bits.resize(Self::SERVICE_BITS, 0);
        bits.extend(unpack_lsb_first(&self.psdu));
        bits.resize(self.n_data(), 0);
        bits
    }

    /// Scrambled DATA bits with the tail bits forced back to zero
    pub fn scrambled(&self, seed: u8) -> Result<Vec<u8>> {
        let mut bits = Scrambler::new(seed)?.scramble(&self.bits());
        let tail = self.tail_start();
        bits[tail..tail + Self::TAIL_BITS].fill(0);
        Ok(bits)
    }

    /// Scrambled and convolutionally encoded DATA bits.
    ///
    /// Only the rate 1/2 rates are supported; the others need puncturing.
    pub fn encode(&self, seed: u8) -> Result<Vec<u8>> {
        let code_rate = self.rate.params().code_rate;
        if code_rate != CodeRate::HALF {
            return Err(FrameError::UnsupportedCodeRate { k: code_rate.k, n: code_rate.n });
        }

        let mut encoder = ConvolutionalEncoder::new();
        let coded = encoder.encode(&self.scrambled(seed)?)?;
        debug!(
            rate = %self.rate,
            psdu_len = self.psdu.len(),
            n_sym = self.n_sym(),
            "encoded DATA field"
        );
        Ok(coded)
    }

    /// Descramble received DATA bits, recovering the scrambler state from the
    /// first seven SERVICE bits, which are transmitted as plain keystream.
    pub fn descramble(scrambled: &[u8]) -> Result<Vec<u8>> {
        if scrambled.len() < Self::SCRAMBLER_INIT_BITS {
            return Err(FrameError::SizeMismatch {
                expected: Self::SCRAMBLER_INIT_BITS,
                actual: scrambled.len(),
            });
        }

        // After seven steps the register holds the last seven keystream bits,
        // the newest in x1
        let state = scrambled[..Self::SCRAMBLER_INIT_BITS]
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | (bit & 1));
        let mut scrambler = Scrambler::new(state)?;

        let mut bits = vec![0u8; Self::SCRAMBLER_INIT_BITS];
        bits.extend(scrambler.scramble(&scrambled[Self::SCRAMBLER_INIT_BITS..]));
        Ok(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<u8> {
        (0u8..28).map(|i| i.wrapping_mul(37) ^ 0x04).collect()
    }

    #[test]
    fn test_symbol_count_and_padding() {
        let field = DataField::new(Rate::Mbps36, vec![0; 100]).unwrap();
        assert_eq!(field.n_sym(), 6);
        assert_eq!(field.n_data(), 864);
        assert_eq!(field.n_pad(), 42);
        assert_eq!(field.bits().len(), 864);

        let empty = DataField::new(Rate::Mbps6, Vec::new()).unwrap();
        assert_eq!(empty.n_sym(), 1);
        assert_eq!(empty.n_pad(), 2);
    }

    #[test]
    fn test_bit_layout() {
        let field = DataField::new(Rate::Mbps36, payload()).unwrap();
        let bits = field.bits();
        assert!(bits[..16].iter().all(|&b| b == 0));
        // First octet 0x04, least significant bit first
        assert_eq!(bits[16..24], [0, 0, 1, 0, 0, 0, 0, 0]);
        assert!(bits[field.tail_start()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_scrambling_adds_keystream() {
        let field = DataField::new(Rate::Mbps36, payload()).unwrap();
        let seed = 0b101_1101;
        let bits = field.bits();
        let scrambled = field.scrambled(seed).unwrap();
        let keystream = Scrambler::new(seed).unwrap().sequence(bits.len());
        let tail = field.tail_start();

        for (i, ((&b, &s), &k)) in bits.iter().zip(&scrambled).zip(&keystream).enumerate() {
            if (tail..tail + DataField::TAIL_BITS).contains(&i) {
                continue;
            }
            assert_eq!(s, b ^ k, "bit {}", i);
        }
        // The zero SERVICE bits expose the keystream
        assert_eq!(scrambled[..DataField::SCRAMBLER_INIT_BITS], keystream[..DataField::SCRAMBLER_INIT_BITS]);
    }

    #[test]
    fn test_tail_zero_after_scrambling() {
        let field = DataField::new(Rate::Mbps24, vec![0xFF; 40]).unwrap();
        let scrambled = field.scrambled(0b101_1101).unwrap();
        let tail = field.tail_start();
        assert_eq!(scrambled[tail..tail + 6], [0; 6]);
        assert_ne!(scrambled[..tail], field.bits()[..tail]);
    }

    #[test]
    fn test_descramble_recovers_payload() {
        let field = DataField::new(Rate::Mbps12, payload()).unwrap();
        for seed in [0b101_1101, 0b111_1111, 0b000_0001] {
            let scrambled = field.scrambled(seed).unwrap();
            let recovered = DataField::descramble(&scrambled).unwrap();
            let tail = field.tail_start();
            assert_eq!(recovered[..tail], field.bits()[..tail]);
        }
        assert!(DataField::descramble(&[1, 0, 1]).is_err());
    }

    #[test]
    fn test_encode_rate_half_only() {
        let field = DataField::new(Rate::Mbps24, payload()).unwrap();
        let coded = field.encode(0b101_1101).unwrap();
        assert_eq!(coded.len(), 2 * field.n_data());
        assert_eq!(coded.len() % Rate::Mbps24.params().ncbps, 0);

        let field = DataField::new(Rate::Mbps54, payload()).unwrap();
        assert_eq!(field.encode(0x5D), Err(FrameError::UnsupportedCodeRate { k: 3, n: 4 }));
    }

    #[test]
    fn test_length_limit() {
        assert_eq!(
            DataField::new(Rate::Mbps6, vec![0; 4096]),
            Err(FrameError::InvalidLength { length: 4096 })
        );
        let field = DataField::new(Rate::Mbps48, vec![0; 10]).unwrap();
        let signal = field.signal().unwrap();
        assert_eq!(signal.length(), 10);
        assert_eq!(signal.rate(), Rate::Mbps48);
    }
}
