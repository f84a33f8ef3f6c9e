//! dot11a Modem - OFDM waveform generation and receiver acquisition
//!
//! This crate turns the coded PLCP bits of `dot11a-frame` into 20 MHz
//! baseband samples (training sequences, the SIGNAL symbol and the PPDU
//! header) and provides the correlation-based timing and frequency
//! synchronization used to acquire them.

pub mod subcarrier;
pub mod preamble;
pub mod ofdm;
pub mod plcp;
pub mod sync;
pub mod impairments;
pub mod error;

pub use error::{ModemError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        preamble::{long_training_sequence, preamble, short_training_sequence},
        ofdm::{OfdmConfig, OfdmDemodulator, OfdmModulator},
        plcp::PlcpTransmitter,
        sync::{SyncConfig, SyncFrontend, SyncPeak, SyncStatistics},
        impairments::{add_awgn, add_frequency_offset},
        error::{ModemError, Result},
    };
}
