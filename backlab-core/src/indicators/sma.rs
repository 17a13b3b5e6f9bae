//! Simple moving average over a prefix.

use crate::domain::Bar;

/// SMA of the last `period` closes. `None` when the prefix is too short.
pub fn sma(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let window = &bars[bars.len() - period..];
    Some(window.iter().map(|b| b.close).sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data::constant_bars;

    #[test]
    fn sma_of_constant_series_is_the_constant() {
        let bars = constant_bars(30, 100.0);
        assert!((sma(&bars, 10).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn sma_requires_full_window() {
        let bars = constant_bars(5, 100.0);
        assert!(sma(&bars, 10).is_none());
        assert!(sma(&bars, 0).is_none());
    }

    #[test]
    fn sma_uses_only_trailing_window() {
        let mut bars = constant_bars(20, 100.0);
        for bar in bars.iter_mut().take(10) {
            bar.close = 500.0; // outside the window, must not matter
        }
        assert!((sma(&bars, 10).unwrap() - 100.0).abs() < 1e-10);
    }
}
