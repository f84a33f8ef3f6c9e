//! dot11a - 802.11a PLCP waveform and conformance tool
//!
//! Exports training sequences and PPDU headers, runs the synchronization
//! front end on captured or synthesized samples, prints DATA field bits,
//! checks the pipeline
//! against the golden tables and dumps those tables for HDL test benches.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use dot11a_conformance::prelude::*;
use dot11a_core::buffer::{Complex, ComplexBuffer};
use dot11a_frame::data::DataField;
use dot11a_frame::rate::Rate;
use dot11a_modem::prelude::*;
use dot11a_tools::{bits_to_rows, init_logging, read_samples, save_samples, table_to_readmemb, OutputFormat, ToolConfig};

/// 802.11a PLCP tool
#[derive(Parser)]
#[command(name = "dot11a")]
#[command(about = "802.11a PLCP waveforms, synchronization and golden vectors")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export training sequence samples
    Preamble(PreambleArgs),
    /// Export the SIGNAL symbol or the full PPDU header
    Signal(SignalArgs),
    /// Print scrambled or encoded DATA field bits
    Data(DataArgs),
    /// Run timing and frequency synchronization
    Sync(SyncArgs),
    /// Check the pipeline against the golden tables
    Verify(VerifyArgs),
    /// List golden tables or dump one in $readmemb format
    Tables(TablesArgs),
    /// Write the effective configuration to a file
    Config {
        /// Destination file
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PreamblePart {
    Short,
    Long,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum DataStage {
    /// SERVICE, PSDU, tail and pad before scrambling
    Plain,
    Scrambled,
    /// Convolutionally encoded, rate 1/2 only
    Coded,
}

#[derive(Parser)]
struct SampleOutput {
    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format, detected from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

impl SampleOutput {
    fn write(&self, samples: &[Complex]) -> Result<()> {
        let format = self.format.unwrap_or_else(|| {
            self.output.as_deref().map(OutputFormat::from_path).unwrap_or(OutputFormat::Csv)
        });
        save_samples(self.output.as_deref(), samples, format)?;
        info!("Wrote {} samples as {:?}", samples.len(), format);
        Ok(())
    }
}

#[derive(Parser)]
struct PreambleArgs {
    /// Which training sequence to export
    #[arg(short, long, value_enum, default_value = "full")]
    part: PreamblePart,

    #[command(flatten)]
    out: SampleOutput,
}

#[derive(Parser)]
struct SignalArgs {
    /// Data rate in Mbps
    #[arg(short, long)]
    rate: Option<u32>,

    /// PSDU length in octets
    #[arg(short, long)]
    length: Option<usize>,

    /// Prepend the preamble
    #[arg(long)]
    header: bool,

    #[command(flatten)]
    out: SampleOutput,
}

#[derive(Parser)]
struct DataArgs {
    /// Data rate in Mbps
    #[arg(short, long)]
    rate: Option<u32>,

    /// PSDU length in octets
    #[arg(short, long)]
    length: Option<usize>,

    /// Scrambler seed (decimal, 0x or 0b prefixed)
    #[arg(short, long, value_parser = parse_seed)]
    seed: Option<u8>,

    /// Raw PSDU file; overrides the length
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Which bits to print
    #[arg(long, value_enum, default_value = "scrambled")]
    stage: DataStage,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SyncArgs {
    /// Sample file to process; a PPDU header is synthesized when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Carrier frequency offset applied to synthesized input, in Hz
    #[arg(long)]
    cfo: Option<f64>,

    /// SNR of noise added to synthesized input, in dB
    #[arg(long)]
    snr: Option<f64>,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Zero samples placed before the synthesized header
    #[arg(long, default_value_t = 0)]
    lead: usize,

    /// Metric threshold for frame detection
    #[arg(short, long, default_value_t = 0.9)]
    threshold: f64,

    /// Number of windows averaged for the CFO estimate
    #[arg(long, default_value_t = 96)]
    average: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct VerifyArgs {
    /// Absolute tolerance for sample tables
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct TablesArgs {
    /// Table to dump (e.g. L-8, L8 or 8); lists all tables when omitted
    #[arg(short, long)]
    table: Option<String>,

    /// Word width in bytes
    #[arg(short, long)]
    width: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SyncReport {
    samples: usize,
    windows: usize,
    peak: Option<SyncPeak>,
    detected: Option<usize>,
    average_cfo_hz: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DataReport {
    rate_mbps: u32,
    length: usize,
    seed: u8,
    stage: DataStage,
    n_sym: usize,
    n_pad: usize,
    bits: String,
}

fn parse_seed(text: &str) -> std::result::Result<u8, String> {
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        u8::from_str_radix(&bin.replace('_', ""), 2)
    } else {
        text.parse()
    };
    match parsed {
        Ok(seed) if seed <= 0x7F => Ok(seed),
        Ok(seed) => Err(format!("seed {} is wider than 7 bits", seed)),
        Err(e) => Err(e.to_string()),
    }
}

fn run_preamble(args: &PreambleArgs) -> Result<()> {
    let samples = match args.part {
        PreamblePart::Short => short_training_sequence(),
        PreamblePart::Long => long_training_sequence(),
        PreamblePart::Full => preamble(),
    };
    debug!("Exporting {:?} training part", args.part);
    args.out.write(&samples)
}

fn run_signal(args: &SignalArgs, config: &ToolConfig) -> Result<()> {
    let rate = match args.rate {
        Some(mbps) => Rate::from_mbps(mbps)?,
        None => config.rate()?,
    };
    let length = args.length.unwrap_or(config.length);

    let tx = PlcpTransmitter::new()?;
    let samples = if args.header {
        tx.ppdu_header(rate, length)?
    } else {
        tx.signal_symbol(rate, length)?
    };
    info!("Built SIGNAL for {} with {} octets", rate, length);
    args.out.write(&samples)
}

fn run_data(args: &DataArgs, config: &ToolConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(mbps) = args.rate {
        config.rate_mbps = mbps;
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    let seed = args.seed.unwrap_or(config.scrambler_seed);

    let field = match &args.input {
        Some(path) => {
            let psdu = std::fs::read(path).with_context(|| format!("Failed to read PSDU: {:?}", path))?;
            DataField::new(config.rate()?, psdu)?
        }
        None => config.data_field()?,
    };

    let bits = match args.stage {
        DataStage::Plain => field.bits(),
        DataStage::Scrambled => field.scrambled(seed)?,
        DataStage::Coded => field.encode(seed)?,
    };
    let params = field.rate().params();
    let row_len = match args.stage {
        DataStage::Coded => params.ncbps,
        _ => params.ndbps,
    };
    info!(
        "DATA field for {} with {} octets: {} symbols, {} pad bits",
        field.rate(),
        field.psdu().len(),
        field.n_sym(),
        field.n_pad()
    );

    let report = DataReport {
        rate_mbps: field.rate().mbps(),
        length: field.psdu().len(),
        seed,
        stage: args.stage,
        n_sym: field.n_sym(),
        n_pad: field.n_pad(),
        bits: bits_to_rows(&bits, row_len)?,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.bits);
    }
    Ok(())
}

fn synthesize(args: &SyncArgs, config: &ToolConfig) -> Result<Vec<Complex>> {
    let tx = PlcpTransmitter::new()?;
    let header = tx.ppdu_header(config.rate()?, config.length)?;

    let mut buffer = ComplexBuffer::from_data(header, config.sync.sample_rate)?;
    buffer.pad_front(args.lead);
    let cfo = args.cfo.unwrap_or(config.channel.cfo_hz);
    if cfo != 0.0 {
        add_frequency_offset(&mut buffer, cfo);
    }
    if let Some(snr_db) = args.snr.or(config.channel.snr_db) {
        add_awgn(&mut buffer, snr_db, args.seed.unwrap_or(config.channel.noise_seed))?;
    }
    info!(
        "Synthesized {} samples ({:.2} us), CFO {} Hz",
        buffer.len(),
        buffer.duration() * 1e6,
        cfo
    );
    Ok(buffer.into_inner())
}

fn run_sync(args: &SyncArgs, config: &ToolConfig) -> Result<()> {
    if args.threshold.is_nan() {
        bail!("Threshold must be a number");
    }

    let samples = match &args.input {
        Some(path) => {
            let samples = read_samples(path)?;
            info!("Read {} samples from {:?}", samples.len(), path);
            samples
        }
        None => synthesize(args, config)?,
    };

    let start_time = Instant::now();
    let frontend = SyncFrontend::new(config.sync.clone())?;
    let stats = frontend.process(&samples);
    let detected = stats.detect(args.threshold);
    let report = SyncReport {
        samples: samples.len(),
        windows: stats.len(),
        peak: stats.peak(),
        detected,
        average_cfo_hz: detected.and_then(|start| stats.average_cfo(start, args.average)),
    };
    debug!("Synchronization took {:?}", start_time.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Samples: {} ({} windows)", report.samples, report.windows);
    match report.peak {
        Some(peak) => println!(
            "Peak:     index {} metric {:.4} CFO {:.1} Hz",
            peak.index, peak.metric, peak.cfo_hz
        ),
        None => println!("Peak:     none (input shorter than two windows)"),
    }
    match (report.detected, report.average_cfo_hz) {
        (Some(index), Some(cfo)) => println!("Detected: index {} average CFO {:.1} Hz", index, cfo),
        (Some(index), None) => println!("Detected: index {}", index),
        (None, _) => println!("Detected: no window reached {}", args.threshold),
    }
    Ok(())
}

fn run_verify(args: &VerifyArgs) -> Result<()> {
    let validator = match args.tolerance {
        Some(tolerance) => GoldenValidator::with_tolerance(tolerance),
        None => GoldenValidator::new(),
    };
    let report = validator.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            let mark = if check.passed { "PASS" } else { "FAIL" };
            println!("[{}] {:<28} {}", mark, check.name, check.detail);
        }
    }

    let report = report.into_result()?;
    info!("{} checks passed", report.checks.len());
    Ok(())
}

fn run_tables(args: &TablesArgs, config: &ToolConfig) -> Result<()> {
    let Some(name) = &args.table else {
        for table in TABLES.iter() {
            println!("{:<5} {:>3} octets  {}", table.name, table.octets.len(), table.description);
        }
        return Ok(());
    };

    let table = table(name).with_context(|| format!("Table not found: {}", name))?;
    let width = args.width.unwrap_or(config.dump.width);
    println!("{}", table_to_readmemb(table.octets, width)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    let config = ToolConfig::load_or_default(path)?;
    if let Some(path) = path {
        info!("Loaded configuration from {:?}", path);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Preamble(args) => run_preamble(args),
        Commands::Signal(args) => run_signal(args, &config),
        Commands::Data(args) => run_data(args, &config),
        Commands::Sync(args) => run_sync(args, &config),
        Commands::Verify(args) => run_verify(args),
        Commands::Tables(args) => run_tables(args, &config),
        Commands::Config { output } => {
            config.save_to_file(output)?;
            println!("Configuration written to {:?}", output);
            Ok(())
        }
    }
}
