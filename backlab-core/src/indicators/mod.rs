//! Built-in indicator calculator.
//!
//! Each indicator is a pure function of a bar prefix, valid as of the
//! prefix's last bar. Computing on `bars[..=i]` can never observe
//! `bars[i+1..]` because the slice ends at `i` — the look-ahead guarantee
//! falls out of the signature.

pub mod atr;
pub mod rsi;
pub mod sma;

pub use atr::atr;
pub use rsi::rsi;
pub use sma::sma;

use crate::domain::Bar;
use crate::error::SignalError;
use crate::strategy::{IndicatorCalculator, IndicatorSnapshot};

/// Default indicator set: ATR(14), RSI(14), SMA(20), SMA(50) and an
/// `sma_bullish` flag (fast above slow).
///
/// Strategies may consume any subset; callers with exotic needs supply
/// their own `IndicatorCalculator` instead.
#[derive(Debug, Clone)]
pub struct StandardIndicators {
    pub atr_period: usize,
    pub rsi_period: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
}

impl Default for StandardIndicators {
    fn default() -> Self {
        Self {
            atr_period: 14,
            rsi_period: 14,
            sma_fast: 20,
            sma_slow: 50,
        }
    }
}

impl IndicatorCalculator for StandardIndicators {
    fn compute(&self, bars: &[Bar]) -> Result<IndicatorSnapshot, SignalError> {
        let mut snapshot = IndicatorSnapshot::new();

        if let Some(v) = atr(bars, self.atr_period) {
            snapshot.insert_num("atr", v);
        }
        if let Some(v) = rsi(bars, self.rsi_period) {
            snapshot.insert_num("rsi", v);
        }
        let fast = sma(bars, self.sma_fast);
        let slow = sma(bars, self.sma_slow);
        if let Some(v) = fast {
            snapshot.insert_num("sma_fast", v);
        }
        if let Some(v) = slow {
            snapshot.insert_num("sma_slow", v);
        }
        if let (Some(f), Some(s)) = (fast, slow) {
            snapshot.insert_flag("sma_bullish", f > s);
        }

        Ok(snapshot)
    }
}
