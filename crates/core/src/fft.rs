//! FFT processing wrapper and the fixed 64-point OFDM transforms

use crate::{buffer::Complex, CoreError, Result};
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Number of subcarrier bins in one 802.11a OFDM symbol
pub const FFT_LEN: usize = 64;

/// FFT configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FftConfig {
    pub size: usize,
    pub sample_rate: f64,
}

impl FftConfig {
    pub fn new(size: usize, sample_rate: f64) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(CoreError::FftError {
                msg: format!("FFT size must be a power of 2, got {}", size),
            });
        }

        if !(sample_rate > 0.0) {
            return Err(CoreError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(Self { size, sample_rate })
    }

    /// Get frequency resolution (Hz per bin), i.e. the subcarrier spacing
    pub fn frequency_resolution(&self) -> f64 {
        self.sample_rate / self.size as f64
    }
}

/// Planned forward and inverse transforms of one size
pub struct FftProcessor {
    config: FftConfig,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl FftProcessor {
    /// Create a new FFT processor
    pub fn new(config: FftConfig) -> Result<Self> {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.size);
        let ifft = planner.plan_fft_inverse(config.size);
        trace!(size = config.size, "planned FFT");

        Ok(Self { config, fft, ifft })
    }

    /// Get the FFT configuration
    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    fn check_len(&self, input: &[Complex], output: &[Complex]) -> Result<()> {
        if input.len() != self.config.size || output.len() != self.config.size {
            return Err(CoreError::BufferSizeMismatch {
                expected: self.config.size,
                actual: if input.len() != self.config.size { input.len() } else { output.len() },
            });
        }
        Ok(())
    }

    /// Perform forward FFT (unnormalized)
    pub fn fft(&self, input: &[Complex], output: &mut [Complex]) -> Result<()> {
        self.check_len(input, output)?;
        output.copy_from_slice(input);
        self.fft.process(output);
        Ok(())
    }

    /// Perform inverse FFT, scaled by 1/N
    pub fn ifft(&self, input: &[Complex], output: &mut [Complex]) -> Result<()> {
        self.check_len(input, output)?;
        output.copy_from_slice(input);
        self.ifft.process(output);

        let scale = 1.0 / self.config.size as f64;
        for sample in output.iter_mut() {
            *sample *= scale;
        }

        Ok(())
    }
}

/// Inverse DFT of one 64-bin spectrum in FFT bin order:
/// `time[n] = (1/64) * sum_k X[k] * exp(+j*2*pi*k*n/64)`
pub fn inverse_transform(spectrum: &[Complex; FFT_LEN]) -> [Complex; FFT_LEN] {
    let mut buffer = *spectrum;
    FftPlanner::new().plan_fft_inverse(FFT_LEN).process(&mut buffer);

    let scale = 1.0 / FFT_LEN as f64;
    for sample in buffer.iter_mut() {
        *sample *= scale;
    }
    buffer
}

/// Forward DFT of 64 time samples, the exact inverse of [`inverse_transform`]
pub fn forward_transform(samples: &[Complex; FFT_LEN]) -> [Complex; FFT_LEN] {
    let mut buffer = *samples;
    FftPlanner::new().plan_fft_forward(FFT_LEN).process(&mut buffer);
    buffer
}

/// Windowing and symbol joining primitives
pub mod window {
    use crate::buffer::Complex;

    /// Halve the first and last sample of a windowed symbol in place
    pub fn apply_edge_window(samples: &mut [Complex]) {
        if let Some(first) = samples.first_mut() {
            *first *= 0.5;
        }
        if let Some(last) = samples.last_mut() {
            *last *= 0.5;
        }
    }

    /// Join two windowed segments, summing the last sample of `head` with
    /// the first sample of `tail`
    pub fn overlap_add(head: &[Complex], tail: &[Complex]) -> Vec<Complex> {
        let (Some((last, body)), Some((first, rest))) = (head.split_last(), tail.split_first())
        else {
            return head.iter().chain(tail).copied().collect();
        };

        let mut joined = Vec::with_capacity(head.len() + tail.len() - 1);
        joined.extend_from_slice(body);
        joined.push(last + first);
        joined.extend_from_slice(rest);
        joined
    }
}
