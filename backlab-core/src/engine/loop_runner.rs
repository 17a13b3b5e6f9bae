//! Bar-by-bar replay loop — the heart of the backtesting engine.
//!
//! Per-bar order, which is load-bearing:
//! 1. Resolve stop/target exits at this bar's close
//! 2. Compute indicators on the prefix `bars[..=i]`
//! 3. Ask the strategy for a signal; offer Buy/Sell to the ledger
//! 4. Record equity, drawdown, and the per-bar return
//!
//! Exits strictly precede new signals so one close price is never used both
//! to exit and to size a fresh entry inconsistently, and every computation
//! at bar `i` sees only `bars[..=i]` — no look-ahead by construction.

use crate::config::BacktestConfig;
use crate::domain::{Bar, ExitReason, Signal};
use crate::error::{EngineError, SignalError};
use crate::ledger::{OpenOutcome, PositionLedger};
use crate::strategy::{IndicatorCalculator, IndicatorSnapshot, Strategy};

use super::cancel::CancelToken;
use super::state::{RejectedSignal, RunResult, SkippedBar};

/// Replay `bars` against a strategy and return the raw run output.
///
/// Fatal preconditions (too few bars, bad config) abort before any
/// simulation state exists. Per-bar collaborator failures degrade that bar
/// to HOLD and are collected in `skipped_bars`. After the last bar every
/// position still open is liquidated at the final close with reason
/// `EndOfData`.
pub fn run_simulation(
    strategy: &dyn Strategy,
    indicators: &dyn IndicatorCalculator,
    bars: &[Bar],
    config: &BacktestConfig,
    cancel: Option<&CancelToken>,
) -> Result<RunResult, EngineError> {
    config.validate()?;

    let lookback = config.min_lookback_period;
    let need = lookback.max(1);
    if bars.len() < need {
        return Err(EngineError::InsufficientData {
            have: bars.len(),
            need,
        });
    }

    let symbol = bars[0].symbol.clone();
    let mut ledger = PositionLedger::new(symbol.clone(), config.clone());

    let mut equity_curve = Vec::with_capacity(bars.len() - lookback + 1);
    let mut drawdown_curve = Vec::with_capacity(bars.len() - lookback + 1);
    let mut returns = Vec::with_capacity(bars.len().saturating_sub(lookback));
    equity_curve.push(config.initial_capital);
    drawdown_curve.push(0.0);
    let mut peak = config.initial_capital;

    let mut trades = Vec::new();
    let mut skipped_bars = Vec::new();
    let mut rejected_signals = Vec::new();

    for i in lookback..bars.len() {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(EngineError::Cancelled { bar_index: i });
            }
        }

        let prefix = &bars[..=i];
        let current_time = bars[i].timestamp;
        let current_price = bars[i].close;

        // Exits first.
        trades.extend(ledger.update_and_close(current_time, current_price));

        // Indicators, then the strategy. Either failing turns this bar
        // into an implicit HOLD; bookkeeping below still runs.
        match evaluate_bar(strategy, indicators, prefix) {
            Ok((snapshot, signal)) => {
                if signal.action.is_entry() {
                    if let OpenOutcome::Rejected(reason) =
                        ledger.open(&signal, current_time, current_price, &snapshot)
                    {
                        rejected_signals.push(RejectedSignal {
                            bar_index: i,
                            reason,
                        });
                    }
                }
            }
            Err(err) => skipped_bars.push(SkippedBar {
                bar_index: i,
                message: err.to_string(),
            }),
        }

        // Equity, drawdown, return.
        let equity = ledger.capital() + ledger.unrealized_pnl(current_price);
        let previous = *equity_curve.last().expect("seeded above");
        equity_curve.push(equity);

        if equity > peak {
            peak = equity;
        }
        drawdown_curve.push((peak - equity) / peak);
        returns.push((equity - previous) / previous);
    }

    // Forced liquidation at the final close.
    let last = bars.last().expect("length checked above");
    trades.extend(ledger.force_close_all(last.timestamp, last.close, ExitReason::EndOfData));

    let final_capital = *equity_curve.last().expect("seeded above");
    Ok(RunResult {
        strategy_name: strategy.name().to_string(),
        symbol,
        start: bars[0].timestamp,
        end: last.timestamp,
        bar_count: bars.len(),
        simulated_bars: bars.len() - lookback,
        initial_capital: config.initial_capital,
        final_capital,
        trades,
        equity_curve,
        drawdown_curve,
        returns,
        skipped_bars,
        rejected_signals,
    })
}

fn evaluate_bar(
    strategy: &dyn Strategy,
    indicators: &dyn IndicatorCalculator,
    prefix: &[Bar],
) -> Result<(IndicatorSnapshot, Signal), SignalError> {
    let snapshot = indicators.compute(prefix)?;
    let signal = strategy.generate_signal(prefix, &snapshot)?;
    Ok((snapshot, signal))
}
