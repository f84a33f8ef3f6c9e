//! Receiver acquisition: delayed autocorrelation over the short training sequence
//!
//! The short training symbol repeats every `L` samples. For a window of `L`
//! samples starting at `q`:
//!
//! ```text
//! P(q) = sum_{m=q}^{q+L-1} conj(r[m+L]) * r[m]
//! R(q) = sum_{m=q}^{q+L-1} |r[m+L]|^2
//! M(q) = |P(q)|^2 / R(q)^2
//! ```
//!
//! `M` plateaus near 1 while both windows lie inside the repeated part, and
//! the phase of `P` there is the carrier offset accumulated over one period.

use crate::{ModemError, Result};
use dot11a_core::buffer::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Synchronization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Correlation window, equal to the repetition period in samples
    pub window_len: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_len: 16,
            sample_rate: 20e6,
        }
    }
}

impl SyncConfig {
    /// Time spanned by one repetition period
    pub fn repetition_period(&self) -> f64 {
        self.window_len as f64 / self.sample_rate
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(ModemError::InvalidParameters {
                msg: "correlation window must not be empty".to_string(),
            });
        }

        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) {
            return Err(ModemError::InvalidParameters {
                msg: format!("invalid sample rate {}", self.sample_rate),
            });
        }

        Ok(())
    }
}

/// Sum `terms` over every window of `len` consecutive entries, keeping a
/// running total instead of re-adding each window
fn sliding_sum<T>(terms: &[T], len: usize) -> Vec<T>
where
    T: Copy + Default + std::ops::Add<Output = T> + std::ops::Sub<Output = T>,
{
    if len == 0 || terms.len() < len {
        return Vec::new();
    }

    let mut total = terms[..len].iter().fold(T::default(), |acc, &t| acc + t);
    let mut sums = Vec::with_capacity(terms.len() - len + 1);
    sums.push(total);
    for m in len..terms.len() {
        total = total + terms[m] - terms[m - len];
        sums.push(total);
    }
    sums
}

/// Delayed autocorrelation P(q), one value per q in 0..=N-2L
pub fn autocorrelation(r: &[Complex], window_len: usize) -> Vec<Complex> {
    if window_len == 0 || r.len() < 2 * window_len {
        return Vec::new();
    }

    let products: Vec<Complex> = r[window_len..]
        .iter()
        .zip(r)
        .map(|(late, early)| late.conj() * early)
        .collect();
    sliding_sum(&products, window_len)
}

/// Energy R(q) of the delayed window, aligned with [`autocorrelation`]
pub fn energy(r: &[Complex], window_len: usize) -> Vec<f64> {
    if window_len == 0 || r.len() < 2 * window_len {
        return Vec::new();
    }

    let powers: Vec<f64> = r[window_len..].iter().map(|x| x.norm_sqr()).collect();
    sliding_sum(&powers, window_len)
}

/// Timing metric M(q) = |P(q)|^2 / R(q)^2, zero where the window holds no energy
pub fn timing_metric(r: &[Complex], window_len: usize) -> Vec<f64> {
    metric_from(&autocorrelation(r, window_len), &energy(r, window_len))
}

fn metric_from(correlation: &[Complex], energy: &[f64]) -> Vec<f64> {
    correlation
        .iter()
        .zip(energy)
        .map(|(p, &r)| if r > 0.0 { p.norm_sqr() / (r * r) } else { 0.0 })
        .collect()
}

/// Carrier frequency offset in Hz from a correlation value taken over a
/// repetition period of `ts` seconds.
///
/// A positive offset rotates the later window ahead of the earlier one, so
/// `conj(r[m+L]) * r[m]` turns by `-2 pi f ts`; the sign is undone here.
/// Offsets beyond `1 / (2 ts)` alias.
pub fn estimate_cfo(p: Complex, ts: f64) -> f64 {
    -p.arg() / (2.0 * PI * ts)
}

/// Best timing candidate found in one buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncPeak {
    /// Window start q with the largest metric
    pub index: usize,
    /// M(q) at that index
    pub metric: f64,
    /// Frequency offset estimated from P(q)
    pub cfo_hz: f64,
}

/// Correlation statistics over one buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatistics {
    correlation: Vec<Complex>,
    energy: Vec<f64>,
    metric: Vec<f64>,
    repetition_period: f64,
}

impl SyncStatistics {
    /// P(q) for every window start
    pub fn correlation(&self) -> &[Complex] {
        &self.correlation
    }

    /// R(q) for every window start
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// M(q) for every window start
    pub fn metric(&self) -> &[f64] {
        &self.metric
    }

    /// Repetition period in seconds used for frequency estimates
    pub fn repetition_period(&self) -> f64 {
        self.repetition_period
    }

    pub fn len(&self) -> usize {
        self.metric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metric.is_empty()
    }

    /// Index of the largest metric (the first one on ties) with its CFO estimate
    pub fn peak(&self) -> Option<SyncPeak> {
        let (index, &metric) = self
            .metric
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, &f64)>, (i, m)| match best {
                Some((_, b)) if *b >= *m => best,
                _ => Some((i, m)),
            })?;

        let p = *self.correlation.get(index)?;
        Some(SyncPeak {
            index,
            metric,
            cfo_hz: estimate_cfo(p, self.repetition_period),
        })
    }

    /// First index where the metric reaches `threshold`
    pub fn detect(&self, threshold: f64) -> Option<usize> {
        self.metric.iter().position(|&m| m >= threshold)
    }

    /// Mean CFO over the `len` windows starting at `start`, averaging the
    /// correlation before taking its phase
    pub fn average_cfo(&self, start: usize, len: usize) -> Option<f64> {
        let window = self.correlation.get(start..start.checked_add(len)?)?;
        if window.is_empty() {
            return None;
        }
        let sum: Complex = window.iter().sum();
        Some(estimate_cfo(sum, self.repetition_period))
    }
}

/// Stateless synchronization front end
#[derive(Debug, Clone)]
pub struct SyncFrontend {
    config: SyncConfig,
}

impl SyncFrontend {
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compute P, R and M over `samples`
    pub fn process(&self, samples: &[Complex]) -> SyncStatistics {
        let window_len = self.config.window_len;
        let correlation = autocorrelation(samples, window_len);
        let energy = energy(samples, window_len);
        let metric = metric_from(&correlation, &energy);

        let stats = SyncStatistics {
            correlation,
            energy,
            metric,
            repetition_period: self.config.repetition_period(),
        };

        if let Some(peak) = stats.peak() {
            debug!(
                samples = samples.len(),
                index = peak.index,
                metric = peak.metric,
                cfo_hz = peak.cfo_hz,
                "sync peak"
            );
        }
        stats
    }
}
