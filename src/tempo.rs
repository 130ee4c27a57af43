//! Tempo to sequencer speed conversion
//!
//! The sampler's sequencer takes a speed value rather than beats per minute;
//! the two are inversely proportional.

use crate::error::{Error, Result};

/// Speed value that corresponds to one beat per minute
pub const SPEED_AT_ONE_BPM: f64 = 314140.625;

/// Sequencer speed for `bpm`, rounded half to even
///
/// Tempos that are zero, negative or not finite are rejected.
pub fn bpm_to_speed(bpm: f64) -> Result<u64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(Error::InvalidTempo { bpm });
    }
    let speed = (SPEED_AT_ONE_BPM / bpm).round_ties_even();
    if !speed.is_finite() || speed > u64::MAX as f64 {
        return Err(Error::InvalidTempo { bpm });
    }
    Ok(speed as u64)
}
