//! Error types for dot11a Frame

use thiserror::Error;

/// Frame processing error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Unsupported rate: {rate} Mbps")]
    UnsupportedRate { rate: u32 },

    #[error("Invalid LENGTH field: {length} does not fit in 12 bits")]
    InvalidLength { length: usize },

    #[error("Invalid interleaver parameter: s = {s} (must be 1, 2 or 3)")]
    InvalidInterleaverParameter { s: usize },

    #[error("Invalid interleaver block length: {ncbps} coded bits per symbol")]
    InvalidBlockLength { ncbps: usize },

    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid scrambler seed: {seed:#04x} is wider than 7 bits")]
    InvalidSeed { seed: u8 },

    #[error("Invalid SIGNAL rate bits: {bits:?}")]
    InvalidRateBits { bits: [u8; 4] },

    #[error("SIGNAL parity check failed: bits 0-16 need parity {expected}, got {actual}")]
    ParityMismatch { expected: u8, actual: u8 },

    #[error("Invalid field format: {msg}")]
    InvalidFormat { msg: String },

    #[error("Code rate {k}/{n} needs puncturing, which is not supported")]
    UnsupportedCodeRate { k: u8, n: u8 },

    #[error("Core error: {0}")]
    Core(#[from] dot11a_core::CoreError),
}

/// Result type for dot11a Frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
