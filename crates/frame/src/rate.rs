//! 802.11a rate-dependent parameters

use crate::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subcarrier modulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modulation {
    Bpsk,
    Qpsk,
    Qam16,
    Qam64,
}

/// Convolutional code rate k/n
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRate {
    pub k: u8,
    pub n: u8,
}

impl CodeRate {
    pub const HALF: CodeRate = CodeRate { k: 1, n: 2 };
    pub const TWO_THIRDS: CodeRate = CodeRate { k: 2, n: 3 };
    pub const THREE_QUARTERS: CodeRate = CodeRate { k: 3, n: 4 };

    pub fn as_f64(&self) -> f64 {
        self.k as f64 / self.n as f64
    }
}

impl fmt::Display for CodeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.k, self.n)
    }
}

/// The eight 802.11a data rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rate {
    Mbps6,
    Mbps9,
    Mbps12,
    Mbps18,
    Mbps24,
    Mbps36,
    Mbps48,
    Mbps54,
}

/// Encoding parameters of one rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateDescriptor {
    pub rate: Rate,
    pub mbps: u32,
    pub modulation: Modulation,
    /// Coded bits per subcarrier (N_BPSC)
    pub nbpsc: usize,
    /// Coded bits per OFDM symbol (N_CBPS)
    pub ncbps: usize,
    /// Data bits per OFDM symbol (N_DBPS)
    pub ndbps: usize,
    pub code_rate: CodeRate,
    /// R1..R4 of the SIGNAL field, in transmission order
    pub signal_bits: [u8; 4],
}

const fn descriptor(
    rate: Rate,
    mbps: u32,
    modulation: Modulation,
    nbpsc: usize,
    code_rate: CodeRate,
    signal_bits: [u8; 4],
) -> RateDescriptor {
    let ncbps = 48 * nbpsc;
    RateDescriptor {
        rate,
        mbps,
        modulation,
        nbpsc,
        ncbps,
        ndbps: ncbps * code_rate.k as usize / code_rate.n as usize,
        code_rate,
        signal_bits,
    }
}

static RATE_TABLE: [RateDescriptor; 8] = [
    descriptor(Rate::Mbps6, 6, Modulation::Bpsk, 1, CodeRate::HALF, [1, 1, 0, 1]),
    descriptor(Rate::Mbps9, 9, Modulation::Bpsk, 1, CodeRate::THREE_QUARTERS, [1, 1, 1, 1]),
    descriptor(Rate::Mbps12, 12, Modulation::Qpsk, 2, CodeRate::HALF, [0, 1, 0, 1]),
    descriptor(Rate::Mbps18, 18, Modulation::Qpsk, 2, CodeRate::THREE_QUARTERS, [0, 1, 1, 1]),
    descriptor(Rate::Mbps24, 24, Modulation::Qam16, 4, CodeRate::HALF, [1, 0, 0, 1]),
    descriptor(Rate::Mbps36, 36, Modulation::Qam16, 4, CodeRate::THREE_QUARTERS, [1, 0, 1, 1]),
    descriptor(Rate::Mbps48, 48, Modulation::Qam64, 6, CodeRate::TWO_THIRDS, [0, 0, 0, 1]),
    descriptor(Rate::Mbps54, 54, Modulation::Qam64, 6, CodeRate::THREE_QUARTERS, [0, 0, 1, 1]),
];

/// Look up the encoding parameters of a rate given in Mbps
pub fn rate_params(rate_mbps: u32) -> Result<&'static RateDescriptor> {
    RATE_TABLE
        .iter()
        .find(|d| d.mbps == rate_mbps)
        .ok_or(FrameError::UnsupportedRate { rate: rate_mbps })
}

impl Rate {
    /// All rates in ascending order
    pub fn all() -> impl Iterator<Item = Rate> {
        RATE_TABLE.iter().map(|d| d.rate)
    }

    pub fn from_mbps(mbps: u32) -> Result<Rate> {
        rate_params(mbps).map(|d| d.rate)
    }

    /// Inverse of the SIGNAL rate code lookup
    pub fn from_signal_bits(bits: [u8; 4]) -> Result<Rate> {
        RATE_TABLE
            .iter()
            .find(|d| d.signal_bits == bits)
            .map(|d| d.rate)
            .ok_or(FrameError::InvalidRateBits { bits })
    }

    pub fn params(self) -> &'static RateDescriptor {
        &RATE_TABLE[self as usize]
    }

    pub fn mbps(self) -> u32 {
        self.params().mbps
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Mbps", self.mbps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signal_codes() {
        assert_eq!(rate_params(6).unwrap().signal_bits, [1, 1, 0, 1]);
        assert_eq!(rate_params(9).unwrap().signal_bits, [1, 1, 1, 1]);
        assert_eq!(rate_params(54).unwrap().signal_bits, [0, 0, 1, 1]);
        assert_eq!(rate_params(36).unwrap().signal_bits, [1, 0, 1, 1]);
    }

    #[test]
    fn test_unsupported_rate() {
        assert_eq!(rate_params(11), Err(FrameError::UnsupportedRate { rate: 11 }));
        assert_eq!(rate_params(0), Err(FrameError::UnsupportedRate { rate: 0 }));
    }

    #[test]
    fn test_table_invariants() {
        let mut codes = Vec::new();
        for rate in Rate::all() {
            let d = rate.params();
            assert_eq!(d.rate, rate);
            assert_eq!(d.ncbps, 48 * d.nbpsc);
            assert_eq!(d.ndbps * d.code_rate.n as usize, d.ncbps * d.code_rate.k as usize);
            // R4 is always 1 for the 20 MHz rates
            assert_eq!(d.signal_bits[3], 1);
            codes.push(d.signal_bits);
        }
        assert_eq!(codes.len(), 8);
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn test_ndbps_values() {
        let ndbps: Vec<usize> = Rate::all().map(|r| r.params().ndbps).collect();
        assert_eq!(ndbps, vec![24, 36, 48, 72, 96, 144, 192, 216]);
    }

    #[test]
    fn test_signal_bits_roundtrip() {
        for rate in Rate::all() {
            assert_eq!(Rate::from_signal_bits(rate.params().signal_bits), Ok(rate));
        }
        assert_eq!(
            Rate::from_signal_bits([0, 0, 0, 0]),
            Err(FrameError::InvalidRateBits { bits: [0, 0, 0, 0] })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Rate::Mbps36.to_string(), "36 Mbps");
        assert_eq!(CodeRate::TWO_THIRDS.to_string(), "2/3");
        assert!((CodeRate::THREE_QUARTERS.as_f64() - 0.75).abs() < 1e-12);
    }
}
