//! Serializable backtest configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation failures. All fatal.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("initial_capital must be positive, got {value}")]
    NonPositiveCapital { value: f64 },

    #[error("max_position_size must be positive, got {value}")]
    NonPositivePositionSize { value: f64 },

    #[error("start bound {start} is after end bound {end}")]
    BoundsReversed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// All knobs of a single backtest run.
///
/// Captures everything needed to reproduce a run against the same bar
/// sequence; two runs with equal configs and inputs are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Starting capital in quote currency.
    pub initial_capital: f64,
    /// Fraction of available capital committed per trade, before
    /// confidence scaling.
    pub max_position_size: f64,
    /// Stop distance in ATR multiples.
    pub atr_multiplier: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_risk_ratio: f64,
    /// Commission as a fraction of notional, charged at entry and exit.
    pub commission: f64,
    /// Adverse fill offset as a fraction of price.
    pub slippage: f64,
    /// Bars of history required before the first signal is evaluated.
    pub min_lookback_period: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            max_position_size: 0.1,
            atr_multiplier: 2.0,
            reward_risk_ratio: 2.0,
            commission: 0.001,
            slippage: 0.0005,
            min_lookback_period: 50,
        }
    }
}

impl BacktestConfig {
    /// Validate the fatal preconditions from the error taxonomy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital {
                value: self.initial_capital,
            });
        }
        if self.max_position_size <= 0.0 {
            return Err(ConfigError::NonPositivePositionSize {
                value: self.max_position_size,
            });
        }
        Ok(())
    }
}
