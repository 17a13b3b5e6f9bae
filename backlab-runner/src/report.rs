//! Report assembly — the stable, serializable aggregate of one run.
//!
//! No computation of its own beyond projecting trades into plain records;
//! metrics come in already computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backlab_core::domain::{ExitReason, Trade, TradeSide};
use backlab_core::engine::{RejectedSignal, RunResult, SkippedBar};

use crate::fingerprint::RunFingerprint;
use crate::metrics::BacktestMetrics;

/// Bounds of the replayed range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub bar_count: usize,
    pub simulated_bars: usize,
}

/// A closed trade projected to a flat record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSummary {
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub symbol: String,
    pub side: TradeSide,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub pnl: Option<f64>,
    pub pnl_pct: Option<f64>,
    pub strategy: String,
    pub exit_reason: Option<ExitReason>,
    pub duration_hours: Option<f64>,
}

impl From<&Trade> for TradeSummary {
    fn from(trade: &Trade) -> Self {
        Self {
            entry_time: trade.entry_time,
            exit_time: trade.exit_time,
            symbol: trade.symbol.clone(),
            side: trade.side,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            quantity: trade.quantity,
            stop_loss: trade.stop_loss,
            take_profit: trade.take_profit,
            pnl: trade.pnl,
            pnl_pct: trade.pnl_pct,
            strategy: trade.strategy.clone(),
            exit_reason: trade.exit_reason,
            duration_hours: trade.duration_hours(),
        }
    }
}

/// Everything a finished backtest reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy_name: String,
    pub symbol: String,
    pub period: BacktestPeriod,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub metrics: BacktestMetrics,
    /// Closed trades, in closing order.
    pub trades: Vec<TradeSummary>,
    pub equity_curve: Vec<f64>,
    pub drawdown_curve: Vec<f64>,
    pub returns: Vec<f64>,
    /// Per-bar evaluation failures, degraded to HOLD during the run.
    pub skipped_bars: Vec<SkippedBar>,
    /// Signals the ledger declined on sizing grounds.
    pub rejected_signals: Vec<RejectedSignal>,
    pub fingerprint: RunFingerprint,
}

impl BacktestReport {
    /// Fold a raw run result and its metrics into the report shape.
    pub fn assemble(
        result: RunResult,
        metrics: BacktestMetrics,
        fingerprint: RunFingerprint,
    ) -> Self {
        Self {
            strategy_name: result.strategy_name,
            symbol: result.symbol,
            period: BacktestPeriod {
                start: result.start,
                end: result.end,
                bar_count: result.bar_count,
                simulated_bars: result.simulated_bars,
            },
            initial_capital: result.initial_capital,
            final_capital: result.final_capital,
            metrics,
            trades: result.trades.iter().map(TradeSummary::from).collect(),
            equity_curve: result.equity_curve,
            drawdown_curve: result.drawdown_curve,
            returns: result.returns,
            skipped_bars: result.skipped_bars,
            rejected_signals: result.rejected_signals,
            fingerprint,
        }
    }
}
