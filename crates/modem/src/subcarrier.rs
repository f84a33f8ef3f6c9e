//! 802.11a subcarrier allocation and pilot polarity

use crate::{ModemError, Result};
use dot11a_core::fft::FFT_LEN;
use dot11a_frame::scrambler::Scrambler;

/// Number of data subcarriers per OFDM symbol
pub const NUM_DATA: usize = 48;

/// Pilot subcarrier offsets
pub const PILOT_OFFSETS: [i32; 4] = [-21, -7, 7, 21];

/// Pilot values before the per-symbol polarity is applied
pub const PILOT_VALUES: [f64; 4] = [1.0, 1.0, 1.0, -1.0];

/// Role of one subcarrier offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubcarrierKind {
    /// Data subcarrier with its logical index 0..=47
    Data(usize),
    /// Pilot subcarrier with its index into [`PILOT_OFFSETS`]
    Pilot(usize),
    Null,
}

/// Frequency offset of logical data subcarrier `index`.
///
/// Indices run from offset -26 upward, skipping the pilots and DC.
pub fn data_offset(index: usize) -> Result<i32> {
    let k = index as i32;
    let offset = match index {
        0..=4 => k - 26,
        5..=17 => k - 25,
        18..=23 => k - 24,
        24..=29 => k - 23,
        30..=42 => k - 22,
        43..=47 => k - 21,
        _ => return Err(ModemError::SubcarrierIndexOutOfRange { index }),
    };
    Ok(offset)
}

/// All data subcarrier offsets in logical order
pub fn data_offsets() -> [i32; NUM_DATA] {
    let mut offsets = [0; NUM_DATA];
    for (index, offset) in offsets.iter_mut().enumerate() {
        *offset = data_offset(index).unwrap_or_default();
    }
    offsets
}

/// FFT bin of a subcarrier offset in -32..=31
pub fn offset_to_bin(offset: i32) -> usize {
    offset.rem_euclid(FFT_LEN as i32) as usize
}

/// Subcarrier offset of an FFT bin
pub fn bin_to_offset(bin: usize) -> i32 {
    let bin = (bin % FFT_LEN) as i32;
    if bin >= FFT_LEN as i32 / 2 {
        bin - FFT_LEN as i32
    } else {
        bin
    }
}

/// Role of the subcarrier at `offset`
pub fn classify(offset: i32) -> SubcarrierKind {
    if let Some(pilot) = PILOT_OFFSETS.iter().position(|&p| p == offset) {
        return SubcarrierKind::Pilot(pilot);
    }

    if offset == 0 || !(-26..=26).contains(&offset) {
        return SubcarrierKind::Null;
    }

    let index = offset
        + match offset {
            -26..=-22 => 26,
            -20..=-8 => 25,
            -6..=-1 => 24,
            1..=6 => 23,
            8..=20 => 22,
            _ => 21,
        };
    SubcarrierKind::Data(index as usize)
}

/// Pilot polarity p_0..p_126: the all-ones scrambler sequence with 0 -> +1 and 1 -> -1
pub fn pilot_polarity_sequence() -> [f64; Scrambler::PERIOD] {
    let mut polarity = [0.0; Scrambler::PERIOD];
    let sequence = Scrambler::default().sequence(Scrambler::PERIOD);
    for (p, bit) in polarity.iter_mut().zip(sequence) {
        *p = if bit == 0 { 1.0 } else { -1.0 };
    }
    polarity
}

/// Polarity of the pilots in OFDM symbol `n`, counting the SIGNAL symbol as 0
pub fn pilot_polarity(n: usize) -> f64 {
    pilot_polarity_sequence()[n % Scrambler::PERIOD]
}
