//! Strategy and indicator seams.
//!
//! Both collaborators are treated as pure functions of a bar-sequence
//! prefix: given `bars[0..=i]` they must produce the same output on every
//! call, and must never read past the end of the prefix. The engine
//! enforces the prefix discipline; purity is the implementor's contract.

pub mod examples;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Signal};
use crate::error::SignalError;

/// Fallback volatility when the snapshot carries no ATR: 2% of price.
pub const ATR_FALLBACK_FRACTION: f64 = 0.02;

/// One named indicator value as of the last bar of a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Num(f64),
    Flag(bool),
}

/// Named indicator values valid as of the last bar of a prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    values: HashMap<String, IndicatorValue>,
}

impl IndicatorSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_num(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), IndicatorValue::Num(value));
    }

    pub fn insert_flag(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), IndicatorValue::Flag(value));
    }

    pub fn num(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(IndicatorValue::Num(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(IndicatorValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    /// The volatility measure used for stop/target placement.
    ///
    /// Falls back to 2% of `price` when the snapshot has no `atr` entry,
    /// matching the sizing rules in the ledger.
    pub fn atr_or_default(&self, price: f64) -> f64 {
        self.num("atr").unwrap_or(price * ATR_FALLBACK_FRACTION)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Computes indicator values from a bar prefix.
///
/// Must be deterministic and recomputable for any prefix length at or above
/// the minimum lookback, without touching bars beyond the prefix.
pub trait IndicatorCalculator: Send + Sync {
    fn compute(&self, bars: &[Bar]) -> Result<IndicatorSnapshot, SignalError>;
}

/// The capability the engine consumes: turn a prefix into a decision.
///
/// Implementations hold no mutable state across calls; the engine may call
/// `generate_signal` for overlapping prefixes in any order across runs.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn generate_signal(
        &self,
        bars: &[Bar],
        indicators: &IndicatorSnapshot,
    ) -> Result<Signal, SignalError>;
}
