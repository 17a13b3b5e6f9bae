//! Raw output of a simulation run, before metrics are derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Trade;
use crate::ledger::RejectReason;

/// A bar whose indicator or strategy evaluation failed.
///
/// The bar degraded to an implicit HOLD; equity bookkeeping still ran.
/// Surfaced as a diagnostic rather than logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedBar {
    pub bar_index: usize,
    pub message: String,
}

/// A Buy/Sell signal the ledger declined on sizing grounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedSignal {
    pub bar_index: usize,
    pub reason: RejectReason,
}

/// Everything a completed replay produced.
///
/// `equity_curve` has one seed sample (initial capital) plus one sample per
/// simulated bar; `drawdown_curve` is parallel to it; `returns` has one
/// entry per simulated bar (the seed has no return).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub strategy_name: String,
    pub symbol: String,
    /// Timestamp of the first bar in the replayed range.
    pub start: DateTime<Utc>,
    /// Timestamp of the final bar in the replayed range.
    pub end: DateTime<Utc>,
    /// Total bars in the replayed range, warmup included.
    pub bar_count: usize,
    /// Bars that actually went through the loop (after warmup).
    pub simulated_bars: usize,
    pub initial_capital: f64,
    /// The last equity sample.
    pub final_capital: f64,
    /// Closed trades, in closing order.
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    pub drawdown_curve: Vec<f64>,
    pub returns: Vec<f64>,
    pub skipped_bars: Vec<SkippedBar>,
    pub rejected_signals: Vec<RejectedSignal>,
}
