//! Volume indicator implementations

use crate::{MathError, Result};

/// Reference daily volume that maps to a ratio of 1.0
pub const VOLUME_NORMALIZER: f64 = 40_000_000.0;

/// Volume scaled by [`VOLUME_NORMALIZER`]
pub fn volume_ratio(volume: f64) -> Result<f64> {
    if volume < 0.0 {
        return Err(MathError::InvalidInput(
            "Volume cannot be negative".to_string(),
        ));
    }

    Ok(volume / VOLUME_NORMALIZER)
}
