//! Common utilities for tools: logging setup and sample file I/O

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use dot11a_core::buffer::Complex;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::Level;

/// Install the global `tracing` subscriber
pub fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Text format of exported samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `re,im` pair per line after a header row
    Csv,
    /// Array of `{"re": .., "im": ..}` objects
    Json,
}

impl OutputFormat {
    /// Detect format from file extension, CSV unless `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

/// One complex sample in exported files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub re: f64,
    pub im: f64,
}

impl From<Complex> for SamplePoint {
    fn from(c: Complex) -> Self {
        Self { re: c.re, im: c.im }
    }
}

impl From<SamplePoint> for Complex {
    fn from(p: SamplePoint) -> Self {
        Complex::new(p.re, p.im)
    }
}

const CSV_HEADER: &str = "re,im";

/// Write samples to `writer`
pub fn write_samples<W: Write>(writer: W, samples: &[Complex], format: OutputFormat) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    match format {
        OutputFormat::Csv => {
            writeln!(writer, "{}", CSV_HEADER)?;
            for s in samples {
                writeln!(writer, "{},{}", s.re, s.im)?;
            }
        }
        OutputFormat::Json => {
            let points: Vec<SamplePoint> = samples.iter().copied().map(SamplePoint::from).collect();
            serde_json::to_writer_pretty(&mut writer, &points)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write samples to `path`, or to stdout when no path is given
pub fn save_samples(path: Option<&Path>, samples: &[Complex], format: OutputFormat) -> Result<()> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_samples(file, samples, format)
        }
        None => write_samples(std::io::stdout().lock(), samples, format),
    }
}

fn parse_csv(content: &str) -> Result<Vec<Complex>> {
    let mut samples = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line == CSV_HEADER {
            continue;
        }
        let Some((re, im)) = line.split_once(',') else {
            bail!("Line {}: expected `re,im`, got {:?}", line_no + 1, line);
        };
        let re: f64 = re.trim().parse()
            .with_context(|| format!("Line {}: bad real part", line_no + 1))?;
        let im: f64 = im.trim().parse()
            .with_context(|| format!("Line {}: bad imaginary part", line_no + 1))?;
        samples.push(Complex::new(re, im));
    }
    Ok(samples)
}

/// Read samples written by [`write_samples`], format chosen by extension
pub fn read_samples(path: &Path) -> Result<Vec<Complex>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample file: {:?}", path))?;

    match OutputFormat::from_path(path) {
        OutputFormat::Csv => parse_csv(&content),
        OutputFormat::Json => {
            let points: Vec<SamplePoint> =
                serde_json::from_str(&content).context("Failed to parse sample file")?;
            Ok(points.into_iter().map(Complex::from).collect())
        }
    }
}
