//! Bundled example strategies.
//!
//! Two small, honest strategies used by the integration tests, the sweep
//! examples, and anyone who wants a working reference implementation of the
//! [`Strategy`](super::Strategy) trait:
//! - `MaCrossStrategy`: trend-following moving-average crossover
//! - `RsiReversionStrategy`: mean-reversion on RSI extremes

use crate::domain::{Bar, Signal, SignalAction};
use crate::error::SignalError;
use crate::indicators::sma;
use crate::strategy::{IndicatorSnapshot, Strategy};

/// Moving-average crossover.
///
/// BUY on the bar where the fast SMA crosses above the slow SMA, SELL on
/// the bar where it crosses below, HOLD otherwise. Confidence scales with
/// the relative separation of the two averages at the cross.
#[derive(Debug, Clone)]
pub struct MaCrossStrategy {
    fast_period: usize,
    slow_period: usize,
}

impl MaCrossStrategy {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period > 0, "fast_period must be > 0");
        assert!(slow_period > fast_period, "slow_period must be > fast_period");
        Self {
            fast_period,
            slow_period,
        }
    }

    /// Some(true) on a bullish cross, Some(false) on a bearish cross,
    /// None when the averages did not cross on the last bar.
    fn detect_cross(&self, bars: &[Bar]) -> Option<bool> {
        if bars.len() < self.slow_period + 1 {
            return None;
        }

        let fast_now = sma(bars, self.fast_period)?;
        let slow_now = sma(bars, self.slow_period)?;

        let prev = &bars[..bars.len() - 1];
        let fast_prev = sma(prev, self.fast_period)?;
        let slow_prev = sma(prev, self.slow_period)?;

        if fast_prev <= slow_prev && fast_now > slow_now {
            Some(true)
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            Some(false)
        } else {
            None
        }
    }
}

impl Default for MaCrossStrategy {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl Strategy for MaCrossStrategy {
    fn name(&self) -> &str {
        "ma_cross"
    }

    fn generate_signal(
        &self,
        bars: &[Bar],
        _indicators: &IndicatorSnapshot,
    ) -> Result<Signal, SignalError> {
        let cross = match self.detect_cross(bars) {
            Some(c) => c,
            None => return Ok(Signal::hold(self.name())),
        };

        let fast = sma(bars, self.fast_period)
            .ok_or_else(|| SignalError::from("fast SMA unavailable"))?;
        let slow = sma(bars, self.slow_period)
            .ok_or_else(|| SignalError::from("slow SMA unavailable"))?;
        if slow <= 0.0 {
            return Err(SignalError::from("non-positive slow SMA"));
        }

        // 1% separation maps to full confidence, floored at 0.5.
        let separation = (fast - slow).abs() / slow;
        let confidence = (0.5 + separation * 50.0).min(1.0);

        let (action, direction) = if cross {
            (SignalAction::Buy, "above")
        } else {
            (SignalAction::Sell, "below")
        };
        Ok(Signal {
            action,
            confidence,
            strategy_name: self.name().to_string(),
            reasoning: vec![format!(
                "SMA({}) crossed {direction} SMA({}): {fast:.4} vs {slow:.4}",
                self.fast_period, self.slow_period
            )],
        })
    }
}

/// RSI mean reversion.
///
/// BUY when RSI drops below the oversold line, SELL when it rises above the
/// overbought line, HOLD inside the band. Reads `rsi` from the snapshot and
/// holds when the indicator set did not provide one.
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    oversold: f64,
    overbought: f64,
}

impl RsiReversionStrategy {
    pub fn new(oversold: f64, overbought: f64) -> Self {
        assert!(
            0.0 < oversold && oversold < overbought && overbought < 100.0,
            "thresholds must satisfy 0 < oversold < overbought < 100"
        );
        Self {
            oversold,
            overbought,
        }
    }
}

impl Default for RsiReversionStrategy {
    fn default() -> Self {
        Self::new(30.0, 70.0)
    }
}

impl Strategy for RsiReversionStrategy {
    fn name(&self) -> &str {
        "rsi_reversion"
    }

    fn generate_signal(
        &self,
        _bars: &[Bar],
        indicators: &IndicatorSnapshot,
    ) -> Result<Signal, SignalError> {
        let rsi = match indicators.num("rsi") {
            Some(v) => v,
            None => return Ok(Signal::hold(self.name())),
        };

        let (action, reason) = if rsi < self.oversold {
            (
                SignalAction::Buy,
                format!("RSI {rsi:.1} below oversold {}", self.oversold),
            )
        } else if rsi > self.overbought {
            (
                SignalAction::Sell,
                format!("RSI {rsi:.1} above overbought {}", self.overbought),
            )
        } else {
            return Ok(Signal::hold(self.name()));
        };

        // Deeper extremes carry more conviction.
        let depth = if action == SignalAction::Buy {
            (self.oversold - rsi) / self.oversold
        } else {
            (rsi - self.overbought) / (100.0 - self.overbought)
        };
        let confidence = (0.5 + depth).clamp(0.5, 1.0);

        Ok(Signal {
            action,
            confidence,
            strategy_name: self.name().to_string(),
            reasoning: vec![reason],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data::constant_bars;

    fn bars_from_closes(closes: &[f64]) -> Vec<crate::domain::Bar> {
        let mut series = constant_bars(closes.len(), 100.0);
        for (bar, &close) in series.iter_mut().zip(closes) {
            bar.close = close;
            bar.high = close + 1.0;
            bar.low = close - 1.0;
        }
        series
    }

    #[test]
    fn ma_cross_goes_long_on_bullish_cross() {
        let strategy = MaCrossStrategy::new(2, 3);
        // Downtrend, then a sharp reversal that drives the fast average
        // through the slow one on the final bar.
        let series = bars_from_closes(&[100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 112.0]);

        let signal = strategy
            .generate_signal(&series, &IndicatorSnapshot::new())
            .unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
        assert!(signal.confidence >= 0.5);
        assert!(!signal.reasoning.is_empty());
    }

    #[test]
    fn ma_cross_goes_short_on_bearish_cross() {
        let strategy = MaCrossStrategy::new(2, 3);
        let series = bars_from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 88.0]);

        let signal = strategy
            .generate_signal(&series, &IndicatorSnapshot::new())
            .unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
    }

    #[test]
    fn ma_cross_holds_without_cross() {
        let strategy = MaCrossStrategy::new(2, 3);
        let bars = constant_bars(10, 100.0);
        let signal = strategy
            .generate_signal(&bars, &IndicatorSnapshot::new())
            .unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn ma_cross_holds_on_short_prefix() {
        let strategy = MaCrossStrategy::default();
        let bars = constant_bars(10, 100.0);
        let signal = strategy
            .generate_signal(&bars, &IndicatorSnapshot::new())
            .unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn rsi_reversion_buys_oversold_sells_overbought() {
        let strategy = RsiReversionStrategy::default();
        let bars = constant_bars(5, 100.0);

        let mut oversold = IndicatorSnapshot::new();
        oversold.insert_num("rsi", 18.0);
        let signal = strategy.generate_signal(&bars, &oversold).unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
        assert!(signal.confidence > 0.5);

        let mut overbought = IndicatorSnapshot::new();
        overbought.insert_num("rsi", 85.0);
        let signal = strategy.generate_signal(&bars, &overbought).unwrap();
        assert_eq!(signal.action, SignalAction::Sell);

        let mut neutral = IndicatorSnapshot::new();
        neutral.insert_num("rsi", 50.0);
        let signal = strategy.generate_signal(&bars, &neutral).unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn rsi_reversion_holds_without_indicator() {
        let strategy = RsiReversionStrategy::default();
        let bars = constant_bars(5, 100.0);
        let signal = strategy
            .generate_signal(&bars, &IndicatorSnapshot::new())
            .unwrap();
        assert_eq!(signal.action, SignalAction::Hold);
    }
}
