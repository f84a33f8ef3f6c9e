//! Orthogonal Frequency Division Multiplexing (OFDM) symbol assembly
//!
//! One 802.11a OFDM symbol carries 48 data subcarriers and 4 pilots in a
//! 64-point transform, preceded by a 16-sample cyclic prefix. Symbols are
//! emitted windowed: one extra cyclic sample is appended and both edge
//! samples are halved, so consecutive symbols join with
//! [`overlap_add`](dot11a_core::fft::window::overlap_add).

use crate::subcarrier::{self, NUM_DATA, PILOT_OFFSETS, PILOT_VALUES};
use crate::{ModemError, Result};
use dot11a_core::buffer::Complex;
use dot11a_core::fft::window::apply_edge_window;
use dot11a_core::fft::{FftConfig, FftProcessor, FFT_LEN};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// OFDM configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfdmConfig {
    /// FFT size in samples
    pub fft_size: usize,
    /// Cyclic prefix length in samples
    pub cp_length: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for OfdmConfig {
    fn default() -> Self {
        Self::ieee80211a()
    }
}

impl OfdmConfig {
    /// 20 MHz channel: 64-point transform, 0.8 us guard interval
    pub fn ieee80211a() -> Self {
        Self {
            fft_size: FFT_LEN,
            cp_length: 16,
            sample_rate: 20e6,
        }
    }

    /// Get total symbol length (FFT + CP)
    pub fn symbol_length(&self) -> usize {
        self.fft_size + self.cp_length
    }

    /// Length of a windowed symbol, including the trailing overlap sample
    pub fn windowed_length(&self) -> usize {
        self.symbol_length() + 1
    }

    /// Subcarrier spacing in Hz
    pub fn subcarrier_spacing(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }

    fn validate(&self) -> Result<()> {
        if self.fft_size != FFT_LEN {
            return Err(ModemError::InvalidParameters {
                msg: format!("FFT size must be {}, got {}", FFT_LEN, self.fft_size),
            });
        }

        if self.cp_length == 0 || self.cp_length > self.fft_size {
            return Err(ModemError::InvalidParameters {
                msg: format!("cyclic prefix length {} out of range", self.cp_length),
            });
        }

        Ok(())
    }
}

/// Map coded bits onto BPSK points: 0 -> -1, 1 -> +1
pub fn map_bpsk(bits: &[u8]) -> Vec<Complex> {
    bits.iter()
        .map(|&bit| Complex::new(if bit & 1 == 1 { 1.0 } else { -1.0 }, 0.0))
        .collect()
}

/// Hard BPSK decisions on equalized data subcarriers
pub fn demap_bpsk(symbols: &[Complex]) -> Vec<u8> {
    symbols.iter().map(|s| u8::from(s.re > 0.0)).collect()
}

/// Frequency-domain symbol: data on the 48 data subcarriers in logical order,
/// pilots scaled by `polarity`, nulls elsewhere
pub fn assemble_spectrum(data: &[Complex], polarity: f64) -> Result<[Complex; FFT_LEN]> {
    if data.len() != NUM_DATA {
        return Err(ModemError::InvalidParameters {
            msg: format!("expected {} data symbols, got {}", NUM_DATA, data.len()),
        });
    }

    let mut spectrum = [Complex::new(0.0, 0.0); FFT_LEN];
    for (index, &symbol) in data.iter().enumerate() {
        spectrum[subcarrier::offset_to_bin(subcarrier::data_offset(index)?)] = symbol;
    }

    for (&offset, &value) in PILOT_OFFSETS.iter().zip(PILOT_VALUES.iter()) {
        spectrum[subcarrier::offset_to_bin(offset)] = Complex::new(value * polarity, 0.0);
    }

    Ok(spectrum)
}

/// OFDM modulator
pub struct OfdmModulator {
    config: OfdmConfig,
    fft_processor: FftProcessor,
}

impl OfdmModulator {
    /// Create a new OFDM modulator
    pub fn new(config: OfdmConfig) -> Result<Self> {
        config.validate()?;
        let fft_config = FftConfig::new(config.fft_size, config.sample_rate)?;
        let fft_processor = FftProcessor::new(fft_config)?;

        Ok(Self { config, fft_processor })
    }

    pub fn config(&self) -> &OfdmConfig {
        &self.config
    }

    /// Prepend the cyclic prefix (copy of the last CP samples)
    pub fn add_cyclic_prefix(&self, body: &[Complex]) -> Vec<Complex> {
        let mut result = Vec::with_capacity(self.config.windowed_length());
        let cp_start = body.len().saturating_sub(self.config.cp_length);
        result.extend_from_slice(&body[cp_start..]);
        result.extend_from_slice(body);
        result
    }

    /// Modulate one symbol of 48 data points.
    ///
    /// `symbol_index` selects the pilot polarity; the SIGNAL symbol is 0.
    /// Returns the windowed symbol of `windowed_length()` samples.
    pub fn modulate_symbol(&self, data: &[Complex], symbol_index: usize) -> Result<Vec<Complex>> {
        let spectrum = assemble_spectrum(data, subcarrier::pilot_polarity(symbol_index))?;

        let mut body = vec![Complex::new(0.0, 0.0); self.config.fft_size];
        self.fft_processor.ifft(&spectrum, &mut body)?;

        let mut symbol = self.add_cyclic_prefix(&body);
        symbol.push(body[0]);
        apply_edge_window(&mut symbol);

        trace!(symbol_index, len = symbol.len(), "modulated OFDM symbol");
        Ok(symbol)
    }
}

/// Subcarrier values recovered from one received symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DemodulatedSymbol {
    /// Data subcarriers in logical order
    pub data: Vec<Complex>,
    /// Pilot subcarriers at -21, -7, 7, 21
    pub pilots: [Complex; 4],
    /// Power left on the null subcarriers
    pub null_power: f64,
}

/// OFDM demodulator for time- and frequency-aligned symbols
pub struct OfdmDemodulator {
    config: OfdmConfig,
    fft_processor: FftProcessor,
}

impl OfdmDemodulator {
    /// Create a new OFDM demodulator
    pub fn new(config: OfdmConfig) -> Result<Self> {
        config.validate()?;
        let fft_config = FftConfig::new(config.fft_size, config.sample_rate)?;
        let fft_processor = FftProcessor::new(fft_config)?;

        Ok(Self { config, fft_processor })
    }

    pub fn config(&self) -> &OfdmConfig {
        &self.config
    }

    /// Strip the cyclic prefix, keeping one FFT window
    pub fn remove_cyclic_prefix<'a>(&self, symbol: &'a [Complex]) -> Result<&'a [Complex]> {
        if symbol.len() < self.config.symbol_length() {
            return Err(ModemError::DemodulationFailed {
                msg: format!(
                    "symbol has {} samples, need {}",
                    symbol.len(),
                    self.config.symbol_length()
                ),
            });
        }

        let start = self.config.cp_length;
        Ok(&symbol[start..start + self.config.fft_size])
    }

    /// Transform one symbol starting at its cyclic prefix and split the subcarriers
    pub fn demodulate_symbol(&self, symbol: &[Complex]) -> Result<DemodulatedSymbol> {
        let body = self.remove_cyclic_prefix(symbol)?;

        let mut spectrum = vec![Complex::new(0.0, 0.0); self.config.fft_size];
        self.fft_processor.fft(body, &mut spectrum)?;

        let mut data = vec![Complex::new(0.0, 0.0); NUM_DATA];
        let mut pilots = [Complex::new(0.0, 0.0); 4];
        let mut null_power = 0.0;
        for (bin, &value) in spectrum.iter().enumerate() {
            match subcarrier::classify(subcarrier::bin_to_offset(bin)) {
                subcarrier::SubcarrierKind::Data(index) => data[index] = value,
                subcarrier::SubcarrierKind::Pilot(index) => pilots[index] = value,
                subcarrier::SubcarrierKind::Null => null_power += value.norm_sqr(),
            }
        }

        Ok(DemodulatedSymbol { data, pilots, null_power })
    }
}
