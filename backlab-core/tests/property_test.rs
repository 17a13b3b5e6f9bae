//! Property tests for engine invariants.
//!
//! Uses proptest to verify, across random tapes and entry cadences:
//! 1. Trade completeness — every returned trade is fully settled
//! 2. Capital accounting — the equity identity holds at the final bar
//! 3. Curve shape — equity, drawdown, and returns stay mutually consistent
//! 4. Determinism — identical inputs produce identical serialized output

use proptest::prelude::*;

use backlab_core::config::BacktestConfig;
use backlab_core::domain::{Bar, ExitReason, Signal, SignalAction, TradeStatus};
use backlab_core::engine::{run_simulation, RunResult};
use backlab_core::error::SignalError;
use backlab_core::indicators::StandardIndicators;
use backlab_core::sample_data::random_walk_bars;
use backlab_core::strategy::{IndicatorSnapshot, Strategy};

/// Alternates BUY and SELL blocks so the ledger sees entries, threshold
/// exits, rejections, and forced liquidation across random tapes.
struct Cadence {
    period: usize,
    confidence: f64,
}

impl Strategy for Cadence {
    fn name(&self) -> &str {
        "cadence"
    }

    fn generate_signal(
        &self,
        bars: &[Bar],
        _indicators: &IndicatorSnapshot,
    ) -> Result<Signal, SignalError> {
        let action = if bars.len() % self.period != 0 {
            SignalAction::Hold
        } else if (bars.len() / self.period) % 2 == 0 {
            SignalAction::Buy
        } else {
            SignalAction::Sell
        };
        Ok(Signal {
            action,
            confidence: self.confidence,
            strategy_name: self.name().to_string(),
            reasoning: Vec::new(),
        })
    }
}

fn run_cadence(seed: u64, period: usize, confidence: f64, config: &BacktestConfig) -> RunResult {
    let bars = random_walk_bars(300, seed);
    let strategy = Cadence { period, confidence };
    run_simulation(&strategy, &StandardIndicators::default(), &bars, config, None)
        .expect("300 bars exceed the default lookback")
}

proptest! {
    /// Every trade in the result is closed exactly once with all exit
    /// fields populated and internally consistent.
    #[test]
    fn trades_are_fully_settled(
        seed in 0u64..500,
        period in 3usize..40,
        confidence in 0.05f64..1.0,
    ) {
        let result = run_cadence(seed, period, confidence, &BacktestConfig::default());

        for trade in &result.trades {
            prop_assert_eq!(trade.status, TradeStatus::Closed);
            prop_assert!(trade.quantity > 0.0);
            let exit_time = trade.exit_time.expect("closed trade has exit_time");
            let exit_price = trade.exit_price.expect("closed trade has exit_price");
            let pnl = trade.pnl.expect("closed trade has pnl");
            let pnl_pct = trade.pnl_pct.expect("closed trade has pnl_pct");
            prop_assert!(trade.exit_reason.is_some());

            prop_assert!(exit_time >= trade.entry_time);
            prop_assert!(exit_price > 0.0);
            let expected_pct = pnl / (trade.entry_price * trade.quantity) * 100.0;
            prop_assert!((pnl_pct - expected_pct).abs() < 1e-9);
        }
    }

    /// Frictionless runs obey the equity identity at the final bar:
    /// final capital = initial + all realized P&L, minus the cost basis of
    /// positions that were still open when the data ended (their proceeds
    /// land after the last equity sample).
    #[test]
    fn frictionless_capital_identity(
        seed in 0u64..500,
        period in 3usize..40,
    ) {
        let config = BacktestConfig {
            commission: 0.0,
            slippage: 0.0,
            ..Default::default()
        };
        let result = run_cadence(seed, period, 1.0, &config);

        let realized: f64 = result.trades.iter().filter_map(|t| t.pnl).sum();
        let open_basis: f64 = result
            .trades
            .iter()
            .filter(|t| t.exit_reason == Some(ExitReason::EndOfData))
            .map(|t| t.quantity * t.entry_price)
            .sum();
        let expected = result.initial_capital + realized - open_basis;
        prop_assert!(
            (result.final_capital - expected).abs() < 1e-6,
            "final {} vs expected {}",
            result.final_capital,
            expected
        );
    }

    /// Equity, drawdown, and returns agree with each other sample by
    /// sample, and drawdown tracks the running peak.
    #[test]
    fn curves_are_mutually_consistent(
        seed in 0u64..500,
        period in 3usize..40,
        confidence in 0.05f64..1.0,
    ) {
        let result = run_cadence(seed, period, confidence, &BacktestConfig::default());

        prop_assert_eq!(result.equity_curve.len(), result.simulated_bars + 1);
        prop_assert_eq!(result.drawdown_curve.len(), result.equity_curve.len());
        prop_assert_eq!(result.returns.len(), result.simulated_bars);
        prop_assert_eq!(result.equity_curve[0], result.initial_capital);
        prop_assert_eq!(
            *result.equity_curve.last().unwrap(),
            result.final_capital
        );

        let mut peak = f64::MIN;
        for (i, &equity) in result.equity_curve.iter().enumerate() {
            peak = peak.max(equity);
            let expected_dd = (peak - equity) / peak;
            prop_assert!(
                (result.drawdown_curve[i] - expected_dd).abs() < 1e-12,
                "drawdown mismatch at sample {}",
                i
            );
            if i > 0 {
                let prev = result.equity_curve[i - 1];
                let expected_ret = (equity - prev) / prev;
                prop_assert!((result.returns[i - 1] - expected_ret).abs() < 1e-12);
            }
        }
    }

    /// Identical `(strategy, bars, config)` inputs serialize identically.
    #[test]
    fn runs_are_deterministic(
        seed in 0u64..500,
        period in 3usize..40,
    ) {
        let config = BacktestConfig::default();
        let a = run_cadence(seed, period, 0.8, &config);
        let b = run_cadence(seed, period, 0.8, &config);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
