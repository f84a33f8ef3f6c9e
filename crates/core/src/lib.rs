//! dot11a Core - sample buffers, bit buffers and spectrum utilities
//!
//! This crate provides the complex sample type, sample buffers tagged with
//! a sample rate, bit packing helpers and the 64-point transforms and
//! windowing primitives the 802.11a PLCP is built on.

pub mod bits;
pub mod buffer;
pub mod fft;
pub mod error;

pub use buffer::Complex;
pub use error::{CoreError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        bits,
        buffer::{Complex, ComplexBuffer, SampleBuffer},
        fft::{forward_transform, inverse_transform, FftConfig, FftProcessor, FFT_LEN},
        fft::window::{apply_edge_window, overlap_add},
        error::{CoreError, Result},
    };
}
