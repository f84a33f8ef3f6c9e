//! dot11a Conformance - golden vectors for the PLCP pipeline
//!
//! This crate embeds the reference tables of the 802.11a worked example
//! and checks every stage of the transmit pipeline against them.

pub mod annex_l;
pub mod validator;
pub mod error;

pub use error::{ConformanceError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        annex_l::{table, BitLayout, GoldenTable, TABLES},
        validator::{CheckResult, GoldenValidator, ValidationReport},
        error::{ConformanceError, Result},
    };
}
