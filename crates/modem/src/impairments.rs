//! Channel impairments for exercising the receiver front end

use crate::{ModemError, Result};
use dot11a_core::buffer::{Complex, ComplexBuffer};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;
use tracing::trace;

/// Rotate sample `n` by `exp(j*2*pi*offset_hz*n/fs)`
pub fn add_frequency_offset(buffer: &mut ComplexBuffer, offset_hz: f64) {
    let step = 2.0 * PI * offset_hz / buffer.sample_rate();
    for (n, sample) in buffer.data_mut().iter_mut().enumerate() {
        *sample *= Complex::from_polar(1.0, step * n as f64);
    }
}

/// Mean power of the samples, zero for an empty slice
pub fn mean_power(samples: &[Complex]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64
}

/// Pair of independent N(0, 1) values (Box-Muller)
fn gaussian_pair(rng: &mut ChaCha8Rng) -> (f64, f64) {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;
    (r * theta.cos(), r * theta.sin())
}

/// Add circular complex Gaussian noise `snr_db` below the measured signal power.
///
/// The same seed always produces the same noise.
pub fn add_awgn(buffer: &mut ComplexBuffer, snr_db: f64, seed: u64) -> Result<()> {
    if !snr_db.is_finite() {
        return Err(ModemError::InvalidParameters {
            msg: format!("SNR must be finite, got {}", snr_db),
        });
    }

    let signal_power = mean_power(buffer.data());
    let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
    // Split evenly between I and Q
    let sigma = (noise_power / 2.0).sqrt();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for sample in buffer.data_mut() {
        let (i, q) = gaussian_pair(&mut rng);
        *sample += Complex::new(i, q) * sigma;
    }

    trace!(snr_db, signal_power, noise_power, seed, "added AWGN");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize) -> ComplexBuffer {
        let data = (0..len)
            .map(|n| Complex::from_polar(1.0, 0.3 * n as f64))
            .collect();
        ComplexBuffer::from_data(data, 20e6).unwrap()
    }

    #[test]
    fn test_frequency_offset_rotation() {
        let mut buffer = ComplexBuffer::from_data(vec![Complex::new(1.0, 0.0); 8], 20e6).unwrap();
        add_frequency_offset(&mut buffer, 5e6);
        // A quarter of the sample rate turns by 90 degrees per sample
        let expected = [
            Complex::new(1.0, 0.0),
            Complex::new(0.0, 1.0),
            Complex::new(-1.0, 0.0),
            Complex::new(0.0, -1.0),
        ];
        for (n, sample) in buffer.data().iter().enumerate() {
            assert!((sample - expected[n % 4]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_frequency_offset_keeps_power() {
        let mut buffer = tone(500);
        let before = mean_power(buffer.data());
        add_frequency_offset(&mut buffer, 123_456.0);
        assert!((mean_power(buffer.data()) - before).abs() < 1e-12);
    }

    #[test]
    fn test_awgn_level() {
        let clean = tone(40_000);
        let mut noisy = clean.clone();
        add_awgn(&mut noisy, 10.0, 42).unwrap();

        let noise: Vec<Complex> = noisy
            .data()
            .iter()
            .zip(clean.data())
            .map(|(a, b)| a - b)
            .collect();
        let snr_db = 10.0 * (mean_power(clean.data()) / mean_power(&noise)).log10();
        assert!((snr_db - 10.0).abs() < 0.2, "measured {} dB", snr_db);
    }

    #[test]
    fn test_awgn_deterministic() {
        let mut a = tone(64);
        let mut b = tone(64);
        let mut c = tone(64);
        add_awgn(&mut a, 5.0, 1).unwrap();
        add_awgn(&mut b, 5.0, 1).unwrap();
        add_awgn(&mut c, 5.0, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_awgn_edge_cases() {
        let mut silent = ComplexBuffer::new(16, 20e6).unwrap();
        add_awgn(&mut silent, 10.0, 3).unwrap();
        assert!(silent.data().iter().all(|s| s.norm() == 0.0));

        let mut empty = ComplexBuffer::new(0, 20e6).unwrap();
        add_awgn(&mut empty, 10.0, 3).unwrap();
        assert!(empty.is_empty());

        assert!(add_awgn(&mut tone(4), f64::NAN, 0).is_err());
    }
}
