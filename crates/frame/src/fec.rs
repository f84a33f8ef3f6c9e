//! Forward error correction: the 802.11a binary convolutional code

use crate::rate::CodeRate;
use crate::Result;

/// Generic FEC encoder trait
pub trait FecEncoder {
    /// Encode a bit stream (one bit per `u8`)
    fn encode(&mut self, bits: &[u8]) -> Result<Vec<u8>>;

    /// Get the code rate (k input bits per n output bits)
    fn code_rate(&self) -> CodeRate;

    /// Return to the initial state
    fn reset(&mut self);
}

/// Rate 1/2, K=7 convolutional encoder with generators 133 and 171 (octal)
#[derive(Debug, Clone, Default)]
pub struct ConvolutionalEncoder {
    /// Previous six input bits, most recent in bit 5
    state: u8,
}

impl ConvolutionalEncoder {
    pub const CONSTRAINT_LENGTH: usize = 7;
    /// Generator for output A
    pub const G0: u8 = 0o133;
    /// Generator for output B
    pub const G1: u8 = 0o171;

    /// Create an encoder in the all-zero state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current register contents
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Shift one bit in and return the output pair (A, B)
    pub fn step(&mut self, input_bit: u8) -> (u8, u8) {
        // Bit 6 is the current input, bits 5..0 the register
        let window = ((input_bit & 1) << (Self::CONSTRAINT_LENGTH - 1)) | self.state;

        let a = ((window & Self::G0).count_ones() & 1) as u8;
        let b = ((window & Self::G1).count_ones() & 1) as u8;

        self.state = window >> 1;
        (a, b)
    }

    /// Encode bits without resetting, emitting A then B for every input bit
    pub fn encode_bits(&mut self, bits: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(bits.len() * 2);
        for &bit in bits {
            let (a, b) = self.step(bit);
            encoded.push(a);
            encoded.push(b);
        }
        encoded
    }
}

impl FecEncoder for ConvolutionalEncoder {
    fn encode(&mut self, bits: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode_bits(bits))
    }

    fn code_rate(&self) -> CodeRate {
        CodeRate::HALF
    }

    fn reset(&mut self) {
        self.state = 0;
    }
}
