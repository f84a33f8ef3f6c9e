//! Error types for dot11a Conformance

use thiserror::Error;

/// Conformance error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConformanceError {
    #[error("Unknown reference table: {name}")]
    UnknownTable { name: String },

    #[error("{failed} of {total} conformance checks failed")]
    ChecksFailed { failed: usize, total: usize },

    #[error("Core error: {0}")]
    Core(#[from] dot11a_core::CoreError),

    #[error("Frame error: {0}")]
    Frame(#[from] dot11a_frame::FrameError),

    #[error("Modem error: {0}")]
    Modem(#[from] dot11a_modem::ModemError),
}

/// Result type for dot11a Conformance operations
pub type Result<T> = std::result::Result<T, ConformanceError>;
