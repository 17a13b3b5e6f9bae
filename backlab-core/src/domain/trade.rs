//! Trade — the central mutable entity of a simulation.
//!
//! Lifecycle: created `Open` when the ledger accepts a signal, mutated to
//! `Closed` exactly once (threshold exit or end-of-data liquidation), then
//! never touched again. The ledger owns open trades; the report owns the
//! closed list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which way the position points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// +1 for Buy, -1 for Sell; multiplies price deltas into signed P&L.
    pub fn direction(self) -> f64 {
        match self {
            TradeSide::Buy => 1.0,
            TradeSide::Sell => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// Why a closed trade exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    Signal,
    EndOfData,
}

/// One simulated position, open or closed.
///
/// Invariants: `quantity > 0`; while `status == Open` every exit field is
/// `None`; once `Closed` they are all `Some` and immutable. For a Buy the
/// expected relationship is `stop_loss < entry_price < take_profit`
/// (mirrored for Sell) — expected, not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
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
    pub status: TradeStatus,
    pub exit_reason: Option<ExitReason>,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Unrealized P&L at `price`, commission-free (commission is a
    /// realization-time cost only).
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.side.direction() * self.quantity
    }

    /// Time held, in hours. `None` while open.
    pub fn duration_hours(&self) -> Option<f64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_seconds() as f64 / 3600.0)
    }

    /// Settle the trade. Called exactly once, by the ledger.
    pub(crate) fn settle(
        &mut self,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        pnl: f64,
        reason: ExitReason,
    ) {
        debug_assert!(self.is_open(), "settle() on a closed trade");
        self.exit_time = Some(exit_time);
        self.exit_price = Some(exit_price);
        self.pnl = Some(pnl);
        self.pnl_pct = Some(pnl / (self.entry_price * self.quantity) * 100.0);
        self.status = TradeStatus::Closed;
        self.exit_reason = Some(reason);
    }
}
