//! Golden-vector validation of the transmit pipeline

use crate::annex_l::{self, table, TABLE_PRECISION};
use crate::{ConformanceError, Result};
use dot11a_core::bits::hamming_distance;
use dot11a_core::buffer::Complex;
use dot11a_frame::data::DataField;
use dot11a_frame::interleave::{first_permutation, second_permutation, BitInterleaver, Interleaver};
use dot11a_frame::rate::Rate;
use dot11a_frame::scrambler::Scrambler;
use dot11a_frame::signal::SignalField;
use dot11a_modem::preamble;
use dot11a_modem::subcarrier::offset_to_bin;
use serde::Serialize;
use tracing::debug;

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self { name: name.to_string(), passed, detail }
    }
}

/// Outcome of a full validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    /// True when every check passed
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Turn a report with failures into [`ConformanceError::ChecksFailed`]
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failures().count();
        if failed > 0 {
            return Err(ConformanceError::ChecksFailed { failed, total: self.checks.len() });
        }
        Ok(self)
    }
}

/// Compare two bit streams, reporting the first differing position
fn compare_bits(name: &str, expected: &[u8], actual: &[u8]) -> CheckResult {
    let errors = hamming_distance(expected, actual);
    if errors == 0 {
        return CheckResult::new(name, true, format!("{} bits match", expected.len()));
    }

    let first = expected
        .iter()
        .zip(actual)
        .position(|(a, b)| (a & 1) != (b & 1))
        .unwrap_or_else(|| expected.len().min(actual.len()));
    CheckResult::new(
        name,
        false,
        format!("{} bits differ, first at bit {}", errors, first),
    )
}

/// Compare samples against a printed table within `tolerance` per component
fn compare_samples(
    name: &str,
    expected: &[(f64, f64)],
    actual: &[Complex],
    tolerance: f64,
) -> CheckResult {
    if expected.len() != actual.len() {
        return CheckResult::new(
            name,
            false,
            format!("expected {} samples, got {}", expected.len(), actual.len()),
        );
    }

    let (worst, max_error) = expected
        .iter()
        .zip(actual)
        .map(|(&(re, im), x)| (x.re - re).abs().max((x.im - im).abs()))
        .enumerate()
        .fold((0, 0.0_f64), |best, (n, e)| if e > best.1 { (n, e) } else { best });

    CheckResult::new(
        name,
        max_error <= tolerance,
        format!("max error {:.2e} at sample {}", max_error, worst),
    )
}

fn table_bits(name: &str) -> Result<Vec<u8>> {
    table(name)
        .map(|t| t.bits())
        .ok_or_else(|| ConformanceError::UnknownTable { name: name.to_string() })
}

/// Runs the PLCP pipeline on the worked example and checks each stage
#[derive(Debug, Clone)]
pub struct GoldenValidator {
    tolerance: f64,
}

impl Default for GoldenValidator {
    fn default() -> Self {
        Self { tolerance: TABLE_PRECISION }
    }
}

impl GoldenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different per-component tolerance for the sample tables
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Run every check
    pub fn run(&self) -> Result<ValidationReport> {
        let checks = vec![
            self.check_message_fcs(),
            self.check_rate_table()?,
            self.check_short_training_spectrum(),
            self.check_short_training_sequence(),
            self.check_long_training_spectrum(),
            self.check_long_training_sequence(),
            self.check_signal_bits()?,
            self.check_signal_coded()?,
            self.check_signal_interleaved()?,
            self.check_data_bits()?,
            self.check_scrambling_sequence()?,
            self.check_scrambled_data()?,
            self.check_interleavers()?,
            self.check_column_permutation_16qam()?,
            self.check_column_permutation_64qam()?,
        ];

        for check in &checks {
            debug!(name = %check.name, passed = check.passed, detail = %check.detail, "conformance check");
        }

        Ok(ValidationReport { checks })
    }

    /// L-1: the message ends in the CRC-32 of everything before it
    pub fn check_message_fcs(&self) -> CheckResult {
        let (body, fcs) = annex_l::MESSAGE.split_at(annex_l::LENGTH - 4);
        let computed = crc32fast::hash(body).to_le_bytes();
        CheckResult::new(
            "L-1 FCS",
            computed.as_slice() == fcs,
            format!("computed {:02X?}, table {:02X?}", computed, fcs),
        )
    }

    /// Every rate code maps back to its rate and N_DBPS follows from the code rate
    pub fn check_rate_table(&self) -> Result<CheckResult> {
        let mut bad = Vec::new();
        for rate in Rate::all() {
            let params = rate.params();
            let consistent = Rate::from_signal_bits(params.signal_bits)? == rate
                && params.ncbps == 48 * params.nbpsc
                && params.ndbps * params.code_rate.n as usize
                    == params.ncbps * params.code_rate.k as usize;
            if !consistent {
                bad.push(rate.mbps());
            }
        }

        Ok(CheckResult::new(
            "rate table",
            bad.is_empty(),
            if bad.is_empty() {
                "8 rates consistent".to_string()
            } else {
                format!("inconsistent rates {:?} Mbps", bad)
            },
        ))
    }

    /// L-2: occupied short training subcarriers, everything else null
    pub fn check_short_training_spectrum(&self) -> CheckResult {
        let mut expected = [Complex::new(0.0, 0.0); 64];
        for &(offset, re, im) in &annex_l::SHORT_TRAINING_SPECTRUM {
            expected[offset_to_bin(offset)] = Complex::new(re, im);
        }
        let expected: Vec<(f64, f64)> = expected.iter().map(|x| (x.re, x.im)).collect();
        compare_samples("L-2", &expected, &preamble::sts_spectrum(), self.tolerance)
    }

    /// L-4: windowed short training sequence
    pub fn check_short_training_sequence(&self) -> CheckResult {
        compare_samples(
            "L-4",
            &annex_l::SHORT_TRAINING,
            &preamble::short_training_sequence(),
            self.tolerance,
        )
    }

    /// L-5: long training subcarriers
    pub fn check_long_training_spectrum(&self) -> CheckResult {
        let mut expected = vec![(0.0, 0.0); 64];
        for (&value, offset) in annex_l::LONG_TRAINING_SPECTRUM.iter().zip(-26..=26) {
            expected[offset_to_bin(offset)] = (f64::from(value), 0.0);
        }
        compare_samples("L-5", &expected, &preamble::lts_spectrum(), self.tolerance)
    }

    /// L-6: windowed long training sequence
    pub fn check_long_training_sequence(&self) -> CheckResult {
        compare_samples(
            "L-6",
            &annex_l::LONG_TRAINING,
            &preamble::long_training_sequence(),
            self.tolerance,
        )
    }

    fn signal_field(&self) -> Result<SignalField> {
        Ok(SignalField::new(annex_l::RATE, annex_l::LENGTH)?)
    }

    fn data_field(&self) -> Result<DataField> {
        Ok(DataField::new(annex_l::RATE, annex_l::MESSAGE.to_vec())?)
    }

    /// L-7: SIGNAL header bits
    pub fn check_signal_bits(&self) -> Result<CheckResult> {
        let actual = self.signal_field()?.header_bits();
        Ok(compare_bits("L-7", &table_bits("L-7")?, &actual))
    }

    /// L-8: SIGNAL bits after convolutional coding
    pub fn check_signal_coded(&self) -> Result<CheckResult> {
        let actual = self.signal_field()?.encode();
        Ok(compare_bits("L-8", &table_bits("L-8")?, &actual))
    }

    /// L-9: SIGNAL bits after interleaving
    pub fn check_signal_interleaved(&self) -> Result<CheckResult> {
        let actual = self.signal_field()?.interleaved()?;
        Ok(compare_bits("L-9", &table_bits("L-9")?, &actual))
    }

    /// L-13: SERVICE and message bits ahead of scrambling
    pub fn check_data_bits(&self) -> Result<CheckResult> {
        let expected = table_bits("L-13")?;
        let actual = self.data_field()?.bits();
        Ok(compare_bits("L-13", &expected, &actual[..expected.len().min(actual.len())]))
    }

    /// L-14: scrambler keystream for seed 1011101
    pub fn check_scrambling_sequence(&self) -> Result<CheckResult> {
        let expected = table_bits("L-14")?;
        let actual = Scrambler::new(annex_l::SCRAMBLER_SEED)?.sequence(expected.len());
        Ok(compare_bits("L-14", &expected, &actual))
    }

    /// L-15: DATA bits after scrambling
    pub fn check_scrambled_data(&self) -> Result<CheckResult> {
        let expected = table_bits("L-15")?;
        let actual = self.data_field()?.scrambled(annex_l::SCRAMBLER_SEED)?;
        Ok(compare_bits("L-15", &expected, &actual[..expected.len().min(actual.len())]))
    }

    /// Every rate's interleaver is a permutation that deinterleaving undoes
    pub fn check_interleavers(&self) -> Result<CheckResult> {
        let mut bad = Vec::new();
        for rate in Rate::all() {
            let interleaver = BitInterleaver::from_rate(rate.params())?;
            let n = interleaver.block_size();
            // A pattern with no period dividing the block length
            let bits: Vec<u8> = (0..n).map(|k| u8::from(k % 7 == 0 || k % 5 == 1)).collect();
            let roundtrip = interleaver.deinterleave(&interleaver.interleave(&bits)?)?;

            let mut seen = vec![false; n];
            for k in 0..n {
                seen[interleaver.position(k)] = true;
            }

            if roundtrip != bits || seen.contains(&false) {
                bad.push(rate.mbps());
            }
        }

        Ok(CheckResult::new(
            "interleaver",
            bad.is_empty(),
            if bad.is_empty() {
                "8 permutations invertible".to_string()
            } else {
                format!("not invertible for {:?} Mbps", bad)
            },
        ))
    }

    /// 16-QAM column grid: every other row of 12 swaps adjacent pairs
    pub fn check_column_permutation_16qam(&self) -> Result<CheckResult> {
        self.check_column_permutation(
            "16-QAM j(i)",
            Rate::Mbps24,
            &annex_l::COLUMN_PERMUTATION_16QAM,
        )
    }

    /// 64-QAM column grid: rows of 18 rotate by 0, 1 and 2 in turn
    pub fn check_column_permutation_64qam(&self) -> Result<CheckResult> {
        self.check_column_permutation(
            "64-QAM j(i)",
            Rate::Mbps48,
            &annex_l::COLUMN_PERMUTATION_64QAM,
        )
    }

    fn check_column_permutation(
        &self,
        name: &str,
        rate: Rate,
        expected: &[u16],
    ) -> Result<CheckResult> {
        let interleaver = BitInterleaver::from_rate(rate.params())?;
        let ncbps = interleaver.ncbps();
        if expected.len() != ncbps {
            return Ok(CheckResult::new(
                name,
                false,
                format!("table has {} entries for N_CBPS {}", expected.len(), ncbps),
            ));
        }

        let s = interleaver.s();
        let mismatch = (0..ncbps).find(|&i| {
            second_permutation(i, ncbps, s) != usize::from(expected[i])
        });
        // The composite index map must route through the same table
        let composite = (0..ncbps).find(|&k| {
            interleaver.position(k) != usize::from(expected[first_permutation(k, ncbps)])
        });

        Ok(match (mismatch, composite) {
            (None, None) => CheckResult::new(name, true, format!("{} indices match", ncbps)),
            (Some(i), _) => CheckResult::new(
                name,
                false,
                format!("j({}) = {}, table {}", i, second_permutation(i, ncbps, s), expected[i]),
            ),
            (None, Some(k)) => CheckResult::new(
                name,
                false,
                format!("coded bit {} lands at {}", k, interleaver.position(k)),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_pass() {
        let report = GoldenValidator::new().run().unwrap();
        for check in &report.checks {
            assert!(check.passed, "{}: {}", check.name, check.detail);
        }
        assert_eq!(report.checks.len(), 15);
        assert!(report.clone().into_result().is_ok());
    }

    #[test]
    fn test_tight_tolerance_fails_printed_tables() {
        // The printed tables carry three decimals
        let validator = GoldenValidator::with_tolerance(1e-9);
        assert!(!validator.check_short_training_sequence().passed);
        assert!(!validator.check_long_training_sequence().passed);
        assert!(validator.check_long_training_spectrum().passed);
    }

    #[test]
    fn test_column_permutation_mismatch_reported() {
        let validator = GoldenValidator::new();
        assert!(validator.check_column_permutation_16qam().unwrap().passed);
        assert!(validator.check_column_permutation_64qam().unwrap().passed);

        let mut swapped = annex_l::COLUMN_PERMUTATION_16QAM;
        swapped.swap(12, 13);
        let result = validator
            .check_column_permutation("x", Rate::Mbps24, &swapped)
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.detail, "j(12) = 13, table 12");

        let result = validator
            .check_column_permutation("x", Rate::Mbps48, &annex_l::COLUMN_PERMUTATION_16QAM)
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.detail, "table has 192 entries for N_CBPS 288");
    }

    #[test]
    fn test_compare_bits_detail() {
        let result = compare_bits("x", &[0, 1, 1, 0], &[0, 1, 0, 0]);
        assert!(!result.passed);
        assert_eq!(result.detail, "1 bits differ, first at bit 2");

        let result = compare_bits("x", &[0, 1], &[0, 1, 1]);
        assert!(!result.passed);
        assert_eq!(result.detail, "1 bits differ, first at bit 2");
    }

    #[test]
    fn test_compare_samples_length_mismatch() {
        let result = compare_samples("x", &[(0.0, 0.0)], &[], 1.0);
        assert!(!result.passed);
    }

    #[test]
    fn test_failed_report_into_error() {
        let report = ValidationReport {
            checks: vec![
                CheckResult::new("a", true, String::new()),
                CheckResult::new("b", false, String::new()),
            ],
        };
        assert!(!report.passed());
        assert_eq!(
            report.into_result(),
            Err(ConformanceError::ChecksFailed { failed: 1, total: 2 })
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = GoldenValidator::new().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"][0]["name"], "L-1 FCS");
        assert_eq!(json["checks"][0]["passed"], true);
    }
}
