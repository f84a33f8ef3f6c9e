//! Error types for dot11a Modem

use thiserror::Error;

/// Modem error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModemError {
    #[error("Subcarrier index {index} out of range 0..=47")]
    SubcarrierIndexOutOfRange { index: usize },

    #[error("Invalid modulation parameters: {msg}")]
    InvalidParameters { msg: String },

    #[error("Demodulation failed: {msg}")]
    DemodulationFailed { msg: String },

    #[error("Core error: {0}")]
    Core(#[from] dot11a_core::CoreError),

    #[error("Frame error: {0}")]
    Frame(#[from] dot11a_frame::FrameError),
}

/// Result type for dot11a Modem operations
pub type Result<T> = std::result::Result<T, ModemError>;
