//! PLCP header waveform: preamble followed by the SIGNAL symbol

use crate::ofdm::{map_bpsk, OfdmConfig, OfdmModulator};
use crate::preamble;
use crate::Result;
use dot11a_core::buffer::Complex;
use dot11a_core::fft::window::overlap_add;
use dot11a_frame::rate::Rate;
use dot11a_frame::signal::SignalField;
use tracing::debug;

/// Builds the time-domain PLCP header of a PPDU
pub struct PlcpTransmitter {
    modulator: OfdmModulator,
}

impl PlcpTransmitter {
    /// Create a transmitter for a 20 MHz channel
    pub fn new() -> Result<Self> {
        Self::with_config(OfdmConfig::ieee80211a())
    }

    pub fn with_config(config: OfdmConfig) -> Result<Self> {
        Ok(Self { modulator: OfdmModulator::new(config)? })
    }

    pub fn config(&self) -> &OfdmConfig {
        self.modulator.config()
    }

    /// The windowed short and long training sequences
    pub fn preamble(&self) -> Vec<Complex> {
        preamble::preamble()
    }

    /// Windowed SIGNAL symbol for `rate` and a PSDU of `length` octets.
    ///
    /// The header is coded, interleaved and BPSK mapped, then sent as OFDM
    /// symbol 0 (pilot polarity +1).
    pub fn signal_symbol(&self, rate: Rate, length: usize) -> Result<Vec<Complex>> {
        let field = SignalField::new(rate, length)?;
        let points = map_bpsk(&field.interleaved()?);
        self.modulator.modulate_symbol(&points, 0)
    }

    /// Preamble and SIGNAL symbol overlap-added into one waveform
    pub fn ppdu_header(&self, rate: Rate, length: usize) -> Result<Vec<Complex>> {
        let header = overlap_add(&self.preamble(), &self.signal_symbol(rate, length)?);
        debug!(%rate, length, samples = header.len(), "built PPDU header");
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ofdm::{demap_bpsk, OfdmDemodulator};
    use crate::preamble::PREAMBLE_LEN;
    use crate::ModemError;
    use dot11a_frame::FrameError;

    #[test]
    fn test_header_length() {
        let tx = PlcpTransmitter::new().unwrap();
        assert_eq!(tx.signal_symbol(Rate::Mbps36, 100).unwrap().len(), 81);
        assert_eq!(tx.ppdu_header(Rate::Mbps36, 100).unwrap().len(), 401);
    }

    #[test]
    fn test_signal_symbol_carries_interleaved_bits() {
        let tx = PlcpTransmitter::new().unwrap();
        let rx = OfdmDemodulator::new(OfdmConfig::ieee80211a()).unwrap();
        let symbol = tx.signal_symbol(Rate::Mbps36, 100).unwrap();

        let recovered = rx.demodulate_symbol(&symbol).unwrap();
        let expected = SignalField::new(Rate::Mbps36, 100).unwrap().interleaved().unwrap();
        assert_eq!(demap_bpsk(&recovered.data), expected);
        for (pilot, value) in recovered.pilots.iter().zip([1.0, 1.0, 1.0, -1.0]) {
            assert!((pilot - Complex::new(value, 0.0)).norm() < 1e-9);
        }
        assert!(recovered.null_power < 1e-18);
    }

    #[test]
    fn test_cyclic_prefix_matches_body_tail() {
        let tx = PlcpTransmitter::new().unwrap();
        let symbol = tx.signal_symbol(Rate::Mbps6, 1500).unwrap();
        // Sample 0 is windowed, the rest of the prefix is an exact copy
        for n in 1..16 {
            assert!((symbol[n] - symbol[n + 64]).norm() < 1e-15);
        }
    }

    #[test]
    fn test_header_joins_preamble_and_signal() {
        let tx = PlcpTransmitter::new().unwrap();
        let preamble = tx.preamble();
        let signal = tx.signal_symbol(Rate::Mbps12, 42).unwrap();
        let header = tx.ppdu_header(Rate::Mbps12, 42).unwrap();

        assert_eq!(header[..PREAMBLE_LEN - 1], preamble[..PREAMBLE_LEN - 1]);
        assert_eq!(header[PREAMBLE_LEN - 1], preamble[PREAMBLE_LEN - 1] + signal[0]);
        assert_eq!(header[PREAMBLE_LEN..], signal[1..]);
    }

    #[test]
    fn test_length_out_of_range() {
        let tx = PlcpTransmitter::new().unwrap();
        assert_eq!(
            tx.ppdu_header(Rate::Mbps6, 4096).unwrap_err(),
            ModemError::Frame(FrameError::InvalidLength { length: 4096 })
        );
    }
}
