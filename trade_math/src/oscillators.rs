//! Oscillator indicator implementations
//!
//! Contains the Relative Strength Index (RSI) in the simple-average form the
//! forecasting features use: gains and losses are averaged over the most
//! recent changes only, with no Wilder smoothing.

/// Look-back period of the RSI
pub const RSI_PERIOD: usize = 14;

/// RSI reported when there is not enough history
pub const NEUTRAL_RSI: f64 = 50.0;

/// Average gain and loss over the RSI look-back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiComponents {
    /// Mean positive close-to-close change
    pub avg_gain: f64,
    /// Mean absolute negative close-to-close change
    pub avg_loss: f64,
}

/// Average gain/loss over the last [`RSI_PERIOD`] changes of `closes`.
///
/// Returns `None` when fewer than [`RSI_PERIOD`] closes are available. With
/// exactly [`RSI_PERIOD`] closes only 13 changes exist; the sums are still
/// divided by the full period.
pub fn rsi_components(closes: &[f64]) -> Option<RsiComponents> {
    if closes.len() < RSI_PERIOD {
        return None;
    }

    let start = closes.len().saturating_sub(RSI_PERIOD + 1);
    let mut gains = 0.0;
    let mut losses = 0.0;

    for pair in closes[start..].windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    Some(RsiComponents {
        avg_gain: gains / RSI_PERIOD as f64,
        avg_loss: losses / RSI_PERIOD as f64,
    })
}

/// Relative Strength Index (0-100) of the last [`RSI_PERIOD`] changes.
///
/// Fewer than [`RSI_PERIOD`] closes yields [`NEUTRAL_RSI`]. A zero average
/// loss is replaced by 1 before taking the ratio, which pulls zero-loss runs
/// toward 100 without reaching it. A window with no movement at all has no
/// losses either and reports the saturated value of 100.
pub fn relative_strength_index(closes: &[f64]) -> f64 {
    let Some(RsiComponents { avg_gain, avg_loss }) = rsi_components(closes) else {
        return NEUTRAL_RSI;
    };

    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 100.0;
    }

    let avg_loss = if avg_loss == 0.0 { 1.0 } else { avg_loss };
    let rs = avg_gain / avg_loss;

    100.0 - 100.0 / (1.0 + rs)
}
