//! dot11a Frame - the PLCP bit pipeline
//!
//! This crate turns PLCP header fields and PSDU octets into coded bit
//! streams: rate parameters, the K=7 convolutional encoder, the two-stage
//! bit interleaver, the x^7 + x^4 + 1 scrambler, and the SIGNAL and DATA
//! field layouts built on top of them.

pub mod rate;
pub mod fec;
pub mod interleave;
pub mod scrambler;
pub mod signal;
pub mod data;
pub mod error;

pub use error::{FrameError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        rate::{rate_params, CodeRate, Modulation, Rate, RateDescriptor},
        fec::{ConvolutionalEncoder, FecEncoder},
        interleave::{BitInterleaver, Interleaver},
        scrambler::{descramble, scramble, Scrambler},
        signal::SignalField,
        data::DataField,
        error::{FrameError, Result},
    };
}
