//! Average true range over a prefix.

use crate::domain::Bar;

/// ATR over the last `period` bars: mean of the true range, where
/// `TR = max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// Needs `period + 1` bars (one extra for the previous close). `None`
/// when the prefix is too short.
pub fn atr(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }
    let start = bars.len() - period;
    let mut sum = 0.0;
    for i in start..bars.len() {
        let prev_close = bars[i - 1].close;
        let bar = &bars[i];
        let tr = (bar.high - bar.low)
            .max((bar.high - prev_close).abs())
            .max((bar.low - prev_close).abs());
        sum += tr;
    }
    Some(sum / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data::constant_bars;

    #[test]
    fn atr_of_fixed_range_bars() {
        // constant_bars builds high = close + 1, low = close - 1, so TR = 2.
        let bars = constant_bars(20, 100.0);
        assert!((atr(&bars, 14).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn atr_requires_period_plus_one_bars() {
        let bars = constant_bars(14, 100.0);
        assert!(atr(&bars, 14).is_none());
        assert!(atr(&bars, 13).is_some());
    }

    #[test]
    fn atr_picks_up_gaps_via_prev_close() {
        let mut bars = constant_bars(10, 100.0);
        // Gap the last bar well above the previous close.
        let last = bars.len() - 1;
        bars[last].high = 121.0;
        bars[last].low = 119.0;
        bars[last].close = 120.0;

        // TR of the gapped bar = |121 - 100| = 21; the other four are 2.
        let expected = (21.0 + 2.0 * 4.0) / 5.0;
        assert!((atr(&bars, 5).unwrap() - expected).abs() < 1e-10);
    }
}
