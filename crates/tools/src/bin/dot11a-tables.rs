//! dot11a-tables - dump a golden table in Verilog $readmemb format

use anyhow::{Context, Result};
use clap::Parser;

use dot11a_conformance::annex_l::table;
use dot11a_tools::{init_logging, table_to_readmemb};

/// Print a golden table as $readmemb words
#[derive(Parser)]
#[command(name = "dot11a-tables")]
#[command(version)]
struct Args {
    /// Table to print (L7, L8, L13, L14, L15, ...)
    #[arg(short, long)]
    table: String,

    /// Word width in bytes
    #[arg(short, long, default_value_t = 3)]
    width: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, false);

    let table = table(&args.table).with_context(|| format!("Table not found: {}", args.table))?;
    println!("{}", table_to_readmemb(table.octets, args.width)?);
    Ok(())
}
