//! dot11a Tools library

pub mod config;
pub mod common;
pub mod dump;

pub use config::{ChannelConfig, DumpConfig, ToolConfig};
pub use common::{init_logging, read_samples, save_samples, write_samples, OutputFormat, SamplePoint};
pub use dump::{bits_to_rows, octets_to_readmemb, table_to_readmemb};
