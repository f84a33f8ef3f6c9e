//! PLCP preamble: short and long training sequences

use crate::subcarrier::offset_to_bin;
use dot11a_core::buffer::Complex;
use dot11a_core::fft::window::{apply_edge_window, overlap_add};
use dot11a_core::fft::{inverse_transform, FFT_LEN};
use tracing::trace;

/// Samples in each windowed training sequence
pub const TRAINING_LEN: usize = 161;

/// Samples in the windowed preamble (both sequences overlap-added)
pub const PREAMBLE_LEN: usize = 2 * TRAINING_LEN - 1;

/// Period of the short training symbol
pub const STS_PERIOD: usize = 16;

/// Length of the long training guard interval
pub const LTS_GUARD: usize = 32;

/// Short training symbol signs, applied to (1 + j), at offsets -24, -20, ..., 24
const STS_SIGNS: [(i32, f64); 12] = [
    (-24, 1.0),
    (-20, -1.0),
    (-16, 1.0),
    (-12, -1.0),
    (-8, -1.0),
    (-4, 1.0),
    (4, -1.0),
    (8, -1.0),
    (12, 1.0),
    (16, 1.0),
    (20, 1.0),
    (24, 1.0),
];

/// Long training symbol values at offsets -26..=26, DC included
const LTS_VALUES: [f64; 53] = [
    1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0,
    1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
    -1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0,
    1.0, 1.0, 1.0,
];

/// Short training symbol in FFT bin order, scaled by sqrt(13/6) so the
/// twelve occupied subcarriers carry the power of 52
pub fn sts_spectrum() -> [Complex; FFT_LEN] {
    let scale = (13.0_f64 / 6.0).sqrt();
    let mut spectrum = [Complex::new(0.0, 0.0); FFT_LEN];
    for &(offset, sign) in &STS_SIGNS {
        spectrum[offset_to_bin(offset)] = Complex::new(sign, sign) * scale;
    }
    spectrum
}

/// Long training symbol in FFT bin order
pub fn lts_spectrum() -> [Complex; FFT_LEN] {
    let mut spectrum = [Complex::new(0.0, 0.0); FFT_LEN];
    for (value, offset) in LTS_VALUES.iter().zip(-26..=26) {
        spectrum[offset_to_bin(offset)] = Complex::new(*value, 0.0);
    }
    spectrum
}

/// Windowed short training sequence: two and a half periods of 64 samples
/// (ten short symbols) plus one trailing sample
pub fn short_training_sequence() -> Vec<Complex> {
    let symbol = inverse_transform(&sts_spectrum());

    let mut sequence = Vec::with_capacity(TRAINING_LEN);
    sequence.extend_from_slice(&symbol);
    sequence.extend_from_slice(&symbol);
    sequence.extend_from_slice(&symbol[..33]);
    apply_edge_window(&mut sequence);
    sequence
}

/// Windowed long training sequence: a 32-sample guard, two long symbols and
/// one trailing sample
pub fn long_training_sequence() -> Vec<Complex> {
    let symbol = inverse_transform(&lts_spectrum());

    let mut sequence = Vec::with_capacity(TRAINING_LEN);
    sequence.extend_from_slice(&symbol[FFT_LEN - LTS_GUARD..]);
    sequence.extend_from_slice(&symbol);
    sequence.extend_from_slice(&symbol);
    sequence.push(symbol[0]);
    apply_edge_window(&mut sequence);
    sequence
}

/// Complete windowed PLCP preamble
pub fn preamble() -> Vec<Complex> {
    let preamble = overlap_add(&short_training_sequence(), &long_training_sequence());
    trace!(len = preamble.len(), "built PLCP preamble");
    preamble
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot11a_core::fft::forward_transform;

    fn assert_close(actual: Complex, re: f64, im: f64, tolerance: f64) {
        assert!(
            (actual.re - re).abs() < tolerance && (actual.im - im).abs() < tolerance,
            "{} != {}{:+}j",
            actual,
            re,
            im
        );
    }

    #[test]
    fn test_lengths() {
        assert_eq!(short_training_sequence().len(), TRAINING_LEN);
        assert_eq!(long_training_sequence().len(), TRAINING_LEN);
        assert_eq!(preamble().len(), PREAMBLE_LEN);
        assert_eq!(PREAMBLE_LEN, 321);
    }

    #[test]
    fn test_spectrum_occupancy() {
        let sts = sts_spectrum();
        assert_eq!(sts.iter().filter(|x| x.norm() > 0.0).count(), 12);
        let lts = lts_spectrum();
        assert_eq!(lts.iter().filter(|x| x.norm() > 0.0).count(), 52);
        assert_eq!(lts[0], Complex::new(0.0, 0.0));
        assert_eq!(lts[offset_to_bin(-26)], Complex::new(1.0, 0.0));
        assert_eq!(lts[offset_to_bin(26)], Complex::new(1.0, 0.0));

        // Both symbols carry the same total power
        let power = |s: &[Complex]| s.iter().map(|x| x.norm_sqr()).sum::<f64>();
        assert!((power(&sts) - power(&lts)).abs() < 1e-9);
    }

    #[test]
    fn test_short_sequence_annex_values() {
        let sts = short_training_sequence();
        assert_close(sts[0], 0.023, 0.023, 1e-3);
        assert_close(sts[1], -0.132, 0.002, 1e-3);
        assert_close(sts[2], -0.013, -0.079, 1e-3);
        assert_close(sts[3], 0.143, -0.013, 1e-3);
        assert_close(sts[4], 0.092, 0.0, 1e-3);
        assert_close(sts[5], 0.143, -0.013, 1e-3);
    }

    #[test]
    fn test_long_sequence_annex_values() {
        let lts = long_training_sequence();
        assert_close(lts[0], -0.078, 0.0, 1e-3);
        assert_close(lts[1], 0.012, -0.098, 1e-3);
        assert_close(lts[2], 0.092, -0.106, 1e-3);
        assert_close(lts[3], -0.092, -0.115, 1e-3);
        assert_close(lts[4], -0.003, -0.054, 1e-3);
        assert_close(lts[5], 0.075, 0.074, 1e-3);
    }

    #[test]
    fn test_closed_form_samples() {
        // Unwindowed first samples are the spectrum sums divided by 64
        let s0 = 2.0 * (13.0_f64 / 6.0).sqrt() / 64.0;
        let sts = inverse_transform(&sts_spectrum());
        assert_close(sts[0], s0, s0, 1e-12);
        let lts = inverse_transform(&lts_spectrum());
        assert_close(lts[0], 10.0 / 64.0, 0.0, 1e-12);

        // The edge window halves both ends
        let windowed = short_training_sequence();
        assert_close(windowed[0], s0 / 2.0, s0 / 2.0, 1e-12);
        assert_close(windowed[160], s0 / 2.0, s0 / 2.0, 1e-12);
        assert_close(long_training_sequence()[160], 10.0 / 128.0, 0.0, 1e-12);
    }

    #[test]
    fn test_periodicity() {
        let sts = short_training_sequence();
        for n in 1..(TRAINING_LEN - 1 - STS_PERIOD) {
            assert!((sts[n] - sts[n + STS_PERIOD]).norm() < 1e-12);
        }

        let lts = long_training_sequence();
        for n in 1..(TRAINING_LEN - 1 - FFT_LEN) {
            assert!((lts[n] - lts[n + FFT_LEN]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_lts_recovers_spectrum() {
        let lts = long_training_sequence();
        let mut body = [Complex::new(0.0, 0.0); FFT_LEN];
        body.copy_from_slice(&lts[LTS_GUARD..LTS_GUARD + FFT_LEN]);
        let spectrum = forward_transform(&body);
        for (got, expected) in spectrum.iter().zip(lts_spectrum().iter()) {
            assert!((got - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn test_preamble_junction() {
        let pre = preamble();
        let sts = short_training_sequence();
        let lts = long_training_sequence();
        assert_eq!(pre[..160], sts[..160]);
        assert_eq!(pre[160], sts[160] + lts[0]);
        assert_eq!(pre[161..], lts[1..]);
        assert_close(pre[160], -0.0551256, 0.0229994, 1e-6);
    }
}
