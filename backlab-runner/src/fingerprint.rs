//! Run fingerprints — content hashes that identify a backtest.
//!
//! Two runs share a `run_id` exactly when they would produce the same
//! report: same strategy, same configuration, same bars. Reports carry the
//! fingerprint so results can be deduplicated or diffed across sweeps.

use serde::{Deserialize, Serialize};

use backlab_core::config::BacktestConfig;
use backlab_core::domain::Bar;

/// Identity of one run, derived entirely from its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    /// Hash of config digest plus data digest; the run's identity.
    pub run_id: String,
    /// Hash of strategy name and configuration values.
    pub config_digest: String,
    /// Hash of the replayed bar range (timestamps and OHLCV).
    pub data_digest: String,
}

impl RunFingerprint {
    pub fn compute(strategy_name: &str, config: &BacktestConfig, bars: &[Bar]) -> Self {
        let config_digest = config_digest(strategy_name, config);
        let data_digest = data_digest(bars);

        let mut hasher = blake3::Hasher::new();
        hasher.update(config_digest.as_bytes());
        hasher.update(data_digest.as_bytes());
        let run_id = hasher.finalize().to_hex().to_string();

        Self {
            run_id,
            config_digest,
            data_digest,
        }
    }
}

fn config_digest(strategy_name: &str, config: &BacktestConfig) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(strategy_name.as_bytes());
    for value in [
        config.initial_capital,
        config.max_position_size,
        config.atr_multiplier,
        config.reward_risk_ratio,
        config.commission,
        config.slippage,
    ] {
        hasher.update(&value.to_le_bytes());
    }
    hasher.update(&(config.min_lookback_period as u64).to_le_bytes());
    hasher.finalize().to_hex().to_string()
}

fn data_digest(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.symbol.as_bytes());
        hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
        for value in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            hasher.update(&value.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlab_core::sample_data::random_walk_bars;

    #[test]
    fn identical_inputs_share_a_run_id() {
        let bars = random_walk_bars(100, 5);
        let config = BacktestConfig::default();
        let a = RunFingerprint::compute("ma_cross", &config, &bars);
        let b = RunFingerprint::compute("ma_cross", &config, &bars);
        assert_eq!(a, b);
    }

    #[test]
    fn any_input_change_moves_the_run_id() {
        let bars = random_walk_bars(100, 5);
        let config = BacktestConfig::default();
        let base = RunFingerprint::compute("ma_cross", &config, &bars);

        let renamed = RunFingerprint::compute("rsi_reversion", &config, &bars);
        assert_ne!(base.run_id, renamed.run_id);
        assert_eq!(base.data_digest, renamed.data_digest);

        let tweaked = BacktestConfig {
            atr_multiplier: 3.0,
            ..BacktestConfig::default()
        };
        let reconfigured = RunFingerprint::compute("ma_cross", &tweaked, &bars);
        assert_ne!(base.run_id, reconfigured.run_id);

        let other_bars = random_walk_bars(100, 6);
        let redata = RunFingerprint::compute("ma_cross", &config, &other_bars);
        assert_ne!(base.run_id, redata.run_id);
        assert_eq!(base.config_digest, redata.config_digest);
    }
}
