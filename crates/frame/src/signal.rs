//! SIGNAL field layout, coding and parsing

use crate::fec::ConvolutionalEncoder;
use crate::interleave::{BitInterleaver, Interleaver};
use crate::rate::{Rate, RateDescriptor};
use crate::{FrameError, Result};
use dot11a_core::bits::parity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// SIGNAL field: the rate and length header sent at 6 Mbps right after the preamble.
///
/// Layout, in transmission order:
///
/// | bits  | content                          |
/// |-------|----------------------------------|
/// | 0–3   | RATE (R1..R4)                    |
/// | 4     | reserved, 0                      |
/// | 5–16  | LENGTH, least significant first  |
/// | 17    | even parity over bits 0–16       |
/// | 18–23 | tail, 0                          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalField {
    rate: Rate,
    length: u16,
}

impl SignalField {
    pub const BITS: usize = 24;
    pub const CODED_BITS: usize = 48;
    /// Largest PSDU length the 12-bit LENGTH field can carry
    pub const MAX_LENGTH: usize = 4095;

    pub fn new(rate: Rate, length: usize) -> Result<Self> {
        if length > Self::MAX_LENGTH {
            return Err(FrameError::InvalidLength { length });
        }
        Ok(Self { rate, length: length as u16 })
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn params(&self) -> &'static RateDescriptor {
        self.rate.params()
    }

    /// The 24 header bits
    pub fn header_bits(&self) -> [u8; Self::BITS] {
        let mut bits = [0u8; Self::BITS];
        bits[..4].copy_from_slice(&self.params().signal_bits);
        for i in 0..12 {
            bits[5 + i] = ((self.length >> i) & 1) as u8;
        }
        bits[17] = parity(&bits[..17]);
        bits
    }

    /// Convolutionally encoded header (rate 1/2, encoder starting from zero)
    pub fn encode(&self) -> Vec<u8> {
        let coded = ConvolutionalEncoder::new().encode_bits(&self.header_bits());
        debug!(rate = %self.rate, length = self.length, "encoded SIGNAL field");
        coded
    }

    /// Encoded and interleaved header, ready for BPSK mapping
    pub fn interleaved(&self) -> Result<Vec<u8>> {
        BitInterleaver::new(Self::CODED_BITS, 1)?.interleave(&self.encode())
    }

    /// Recover the field from received header bits
    pub fn parse(bits: &[u8; Self::BITS]) -> Result<Self> {
        let expected = parity(&bits[..17]);
        if bits[17] & 1 != expected {
            return Err(FrameError::ParityMismatch { expected, actual: bits[17] });
        }

        if bits[4] != 0 {
            return Err(FrameError::InvalidFormat {
                msg: "reserved SIGNAL bit is set".to_string(),
            });
        }

        if bits[18..].iter().any(|&b| b != 0) {
            return Err(FrameError::InvalidFormat {
                msg: "SIGNAL tail bits are not zero".to_string(),
            });
        }

        let rate = Rate::from_signal_bits([bits[0], bits[1], bits[2], bits[3]])?;
        let length = bits[5..17]
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, &bit)| acc | (((bit & 1) as usize) << i));

        Self::new(rate, length)
    }
}
