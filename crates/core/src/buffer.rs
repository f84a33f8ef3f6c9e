//! Baseband sample buffers

use crate::{CoreError, Result};
use std::ops::{Index, IndexMut};

/// Complex baseband sample (in-phase, quadrature)
pub type Complex = rustfft::num_complex::Complex64;

/// Generic sample buffer tagged with the rate it was sampled at
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T> {
    data: Vec<T>,
    sample_rate: f64,
}

impl<T> SampleBuffer<T>
where
    T: Clone + Default,
{
    /// Create a zero-filled buffer with the given length and sample rate
    pub fn new(len: usize, sample_rate: f64) -> Result<Self> {
        Self::from_data(vec![T::default(); len], sample_rate)
    }

    /// Create a buffer from existing data
    pub fn from_data(data: Vec<T>, sample_rate: f64) -> Result<Self> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(CoreError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(Self { data, sample_rate })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Seconds between samples (50 ns at 20 MHz)
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Time spanned by the buffer in seconds
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 * self.sample_period()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Insert `count` default (silent) samples ahead of the existing ones
    pub fn pad_front(&mut self, count: usize) {
        self.data.splice(0..0, std::iter::repeat(T::default()).take(count));
    }

    /// Consume the buffer, returning the samples
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<usize> for SampleBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for SampleBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

/// Buffer of complex baseband (IQ) samples
pub type ComplexBuffer = SampleBuffer<Complex>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_buffer_creation() {
        let buffer = ComplexBuffer::new(64, 20e6).unwrap();
        assert_eq!(buffer.len(), 64);
        assert_eq!(buffer.sample_rate(), 20e6);
        assert!((buffer.sample_period() - 50e-9).abs() < 1e-18);
        assert!(buffer.data().iter().all(|s| *s == Complex::new(0.0, 0.0)));
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert_eq!(
            ComplexBuffer::new(16, -1.0),
            Err(CoreError::InvalidSampleRate { rate: -1.0 })
        );
        assert!(ComplexBuffer::from_data(Vec::new(), f64::NAN).is_err());
    }

    #[test]
    fn test_pad_front() {
        let mut buffer = ComplexBuffer::from_data(vec![Complex::new(1.0, -1.0); 2], 20e6).unwrap();
        buffer.pad_front(3);
        assert_eq!(buffer.len(), 5);
        assert!((buffer.duration() - 250e-9).abs() < 1e-18);
        assert_eq!(buffer[2], Complex::new(0.0, 0.0));
        assert_eq!(buffer[3], Complex::new(1.0, -1.0));
    }

    #[test]
    fn test_indexing() {
        let mut buffer = ComplexBuffer::from_data(vec![Complex::new(3.0, 4.0)], 1.0).unwrap();
        assert_eq!(buffer[0].norm(), 5.0);
        buffer[0] = Complex::new(0.0, 1.0);
        assert_eq!(buffer.into_inner(), vec![Complex::new(0.0, 1.0)]);
    }
}
