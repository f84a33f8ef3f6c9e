//! Two-stage block interleaver for coded bits

use crate::rate::RateDescriptor;
use crate::{FrameError, Result};
use tracing::trace;

/// Generic interleaver trait
pub trait Interleaver {
    /// Interleave one or more whole blocks
    fn interleave(&self, bits: &[u8]) -> Result<Vec<u8>>;

    /// Undo [`Interleaver::interleave`]
    fn deinterleave(&self, bits: &[u8]) -> Result<Vec<u8>>;

    /// Number of bits in one block
    fn block_size(&self) -> usize;
}

/// Interleaver over one OFDM symbol of N_CBPS coded bits.
///
/// The first permutation spreads adjacent coded bits onto non-adjacent
/// subcarriers:
///
/// `i = (N_CBPS/16) * (k mod 16) + floor(k/16)`
///
/// The second rotates bits within each group of `s` so that adjacent bits
/// alternate between more and less significant constellation bits:
///
/// `j = s * floor(i/s) + (i + N_CBPS - floor(16*i/N_CBPS)) mod s`
///
/// with `s = max(N_BPSC/2, 1)`. Bit `k` of the input lands at position `j`.
#[derive(Debug, Clone)]
pub struct BitInterleaver {
    ncbps: usize,
    s: usize,
    /// Input position -> output position
    forward: Vec<usize>,
    /// Output position -> input position
    inverse: Vec<usize>,
}

impl BitInterleaver {
    /// Create an interleaver for the given coded bits per symbol and per subcarrier
    pub fn new(ncbps: usize, nbpsc: usize) -> Result<Self> {
        Self::with_s(ncbps, (nbpsc / 2).max(1))
    }

    /// Create an interleaver with an explicit column rotation size
    pub fn with_s(ncbps: usize, s: usize) -> Result<Self> {
        if !(1..=3).contains(&s) {
            return Err(FrameError::InvalidInterleaverParameter { s });
        }

        if ncbps == 0 || ncbps % 16 != 0 || ncbps % s != 0 {
            return Err(FrameError::InvalidBlockLength { ncbps });
        }

        let forward: Vec<usize> = (0..ncbps)
            .map(|k| second_permutation(first_permutation(k, ncbps), ncbps, s))
            .collect();

        let mut inverse = vec![0; ncbps];
        for (k, &j) in forward.iter().enumerate() {
            inverse[j] = k;
        }

        trace!(ncbps, s, "built interleaver permutation");

        Ok(Self { ncbps, s, forward, inverse })
    }

    /// Create the interleaver of a rate
    pub fn from_rate(params: &RateDescriptor) -> Result<Self> {
        Self::new(params.ncbps, params.nbpsc)
    }

    pub fn ncbps(&self) -> usize {
        self.ncbps
    }

    pub fn s(&self) -> usize {
        self.s
    }

    /// Output position of input bit `k`
    pub fn position(&self, k: usize) -> usize {
        self.forward[k]
    }

    /// Input position that lands at output position `j`
    pub fn inverse_position(&self, j: usize) -> usize {
        self.inverse[j]
    }

    fn check_blocks(&self, bits: &[u8]) -> Result<()> {
        if bits.is_empty() || bits.len() % self.ncbps != 0 {
            let blocks = (bits.len() / self.ncbps).max(1);
            return Err(FrameError::SizeMismatch {
                expected: blocks * self.ncbps,
                actual: bits.len(),
            });
        }
        Ok(())
    }
}

/// First permutation: `i = (N_CBPS/16) * (k mod 16) + floor(k/16)`
pub fn first_permutation(k: usize, ncbps: usize) -> usize {
    (ncbps / 16) * (k % 16) + k / 16
}

/// Second permutation: `j = s * floor(i/s) + (i + N_CBPS - floor(16*i/N_CBPS)) mod s`
pub fn second_permutation(i: usize, ncbps: usize, s: usize) -> usize {
    s * (i / s) + (i + ncbps - (16 * i) / ncbps) % s
}

impl Interleaver for BitInterleaver {
    fn interleave(&self, bits: &[u8]) -> Result<Vec<u8>> {
        self.check_blocks(bits)?;

        let mut result = vec![0u8; bits.len()];
        for (block_in, block_out) in bits.chunks(self.ncbps).zip(result.chunks_mut(self.ncbps)) {
            for (k, &bit) in block_in.iter().enumerate() {
                block_out[self.forward[k]] = bit;
            }
        }

        Ok(result)
    }

    fn deinterleave(&self, bits: &[u8]) -> Result<Vec<u8>> {
        self.check_blocks(bits)?;

        let mut result = vec![0u8; bits.len()];
        for (block_in, block_out) in bits.chunks(self.ncbps).zip(result.chunks_mut(self.ncbps)) {
            for (j, &bit) in block_in.iter().enumerate() {
                block_out[self.inverse[j]] = bit;
            }
        }

        Ok(result)
    }

    fn block_size(&self) -> usize {
        self.ncbps
    }
}
