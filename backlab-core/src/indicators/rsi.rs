//! Relative strength index over a prefix.

use crate::domain::Bar;

/// RSI over the last `period` close-to-close changes, simple averages.
///
/// Returns 100 when there are no losses in the window, 0 when there are no
/// gains. `None` when the prefix is too short.
pub fn rsi(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }
    let start = bars.len() - period;
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in start..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }
    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
