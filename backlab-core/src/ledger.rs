//! Position ledger: open-position set, sizing rules, and exit settlement.
//!
//! The ledger exclusively owns open trades and the realized-capital
//! counter. Closed trades are handed back to the caller and never touched
//! again. All methods assume single-threaded access; a run owns its ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BacktestConfig;
use crate::domain::{ExitReason, Signal, SignalAction, Trade, TradeSide, TradeStatus};
use crate::strategy::IndicatorSnapshot;

/// Smallest notional worth opening, in quote currency.
pub const MIN_POSITION_NOTIONAL: f64 = 100.0;

/// Why a signal did not become a position. A normal no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    BelowMinimumNotional { notional: f64 },
    InsufficientCapital { required: f64, available: f64 },
}

/// Result of offering a signal to the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpenOutcome {
    Opened,
    Rejected(RejectReason),
}

pub struct PositionLedger {
    capital: f64,
    open: Vec<Trade>,
    symbol: String,
    config: BacktestConfig,
}

impl PositionLedger {
    pub fn new(symbol: impl Into<String>, config: BacktestConfig) -> Self {
        Self {
            capital: config.initial_capital,
            open: Vec::new(),
            symbol: symbol.into(),
            config,
        }
    }

    /// Realized capital (initial capital plus settled P&L, minus the cost
    /// basis of whatever is still open).
    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn open_positions(&self) -> &[Trade] {
        &self.open
    }

    /// Try to open a position for an accepted Buy/Sell signal.
    ///
    /// Sizing: `capital × max_position_size × confidence`, rejected below
    /// `MIN_POSITION_NOTIONAL` or when notional plus entry commission would
    /// exceed available capital. The fill price carries entry slippage
    /// (inflated for Buy, deflated for Sell); stop and target are placed at
    /// ATR multiples of the raw close, the target stretched by the
    /// reward/risk ratio.
    pub fn open(
        &mut self,
        signal: &Signal,
        current_time: DateTime<Utc>,
        current_price: f64,
        indicators: &IndicatorSnapshot,
    ) -> OpenOutcome {
        debug_assert!(signal.action.is_entry(), "HOLD is never offered to the ledger");

        let notional = self.capital * self.config.max_position_size * signal.confidence;
        if notional < MIN_POSITION_NOTIONAL {
            return OpenOutcome::Rejected(RejectReason::BelowMinimumNotional { notional });
        }

        // Quantity from the raw close; slippage lands on the fill price only.
        let quantity = notional / current_price;
        let commission_cost = notional * self.config.commission;
        let total_cost = notional + commission_cost;
        if total_cost > self.capital {
            return OpenOutcome::Rejected(RejectReason::InsufficientCapital {
                required: total_cost,
                available: self.capital,
            });
        }

        let side = match signal.action {
            SignalAction::Buy => TradeSide::Buy,
            SignalAction::Sell => TradeSide::Sell,
            SignalAction::Hold => unreachable!("checked by is_entry above"),
        };
        let entry_price = match side {
            TradeSide::Buy => current_price * (1.0 + self.config.slippage),
            TradeSide::Sell => current_price * (1.0 - self.config.slippage),
        };

        let atr = indicators.atr_or_default(current_price);
        let stop_distance = atr * self.config.atr_multiplier;
        let target_distance = stop_distance * self.config.reward_risk_ratio;
        let (stop_loss, take_profit) = match side {
            TradeSide::Buy => (current_price - stop_distance, current_price + target_distance),
            TradeSide::Sell => (current_price + stop_distance, current_price - target_distance),
        };

        self.capital -= total_cost;
        self.open.push(Trade {
            entry_time: current_time,
            exit_time: None,
            symbol: self.symbol.clone(),
            side,
            entry_price,
            exit_price: None,
            quantity,
            stop_loss,
            take_profit,
            pnl: None,
            pnl_pct: None,
            strategy: signal.strategy_name.clone(),
            status: TradeStatus::Open,
            exit_reason: None,
        });
        OpenOutcome::Opened
    }

    /// Close every open position whose stop or target the close price has
    /// crossed. Returns the trades closed this call, in insertion order.
    ///
    /// Two-phase: collect which positions exit, then apply the closures —
    /// never delete while scanning.
    pub fn update_and_close(
        &mut self,
        current_time: DateTime<Utc>,
        current_price: f64,
    ) -> Vec<Trade> {
        let mut to_close: Vec<(usize, ExitReason)> = Vec::new();
        for (i, position) in self.open.iter().enumerate() {
            let reason = match position.side {
                TradeSide::Buy => {
                    if current_price <= position.stop_loss {
                        Some(ExitReason::StopLoss)
                    } else if current_price >= position.take_profit {
                        Some(ExitReason::TakeProfit)
                    } else {
                        None
                    }
                }
                TradeSide::Sell => {
                    if current_price >= position.stop_loss {
                        Some(ExitReason::StopLoss)
                    } else if current_price <= position.take_profit {
                        Some(ExitReason::TakeProfit)
                    } else {
                        None
                    }
                }
            };
            if let Some(reason) = reason {
                to_close.push((i, reason));
            }
        }

        let mut closed = Vec::with_capacity(to_close.len());
        for (removed, (index, reason)) in to_close.into_iter().enumerate() {
            let trade = self.open.remove(index - removed);
            closed.push(self.settle(trade, current_time, current_price, reason));
        }
        closed
    }

    /// Liquidate every remaining open position. Same settlement math as a
    /// threshold exit, applied unconditionally at the final bar.
    pub fn force_close_all(
        &mut self,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        reason: ExitReason,
    ) -> Vec<Trade> {
        let open = std::mem::take(&mut self.open);
        open.into_iter()
            .map(|trade| self.settle(trade, exit_time, exit_price, reason))
            .collect()
    }

    /// Commission-free mark-to-market P&L of all open positions.
    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.open
            .iter()
            .map(|t| t.unrealized_pnl(current_price))
            .sum()
    }

    /// Settle one trade: exit slippage adverse to the position, exit
    /// commission on the settled notional, capital credited with the
    /// proceeds.
    fn settle(
        &mut self,
        mut trade: Trade,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        reason: ExitReason,
    ) -> Trade {
        let effective_exit = match trade.side {
            TradeSide::Buy => exit_price * (1.0 - self.config.slippage),
            TradeSide::Sell => exit_price * (1.0 + self.config.slippage),
        };
        let gross = (effective_exit - trade.entry_price) * trade.side.direction() * trade.quantity;
        let commission_cost = trade.quantity * effective_exit * self.config.commission;
        let pnl = gross - commission_cost;

        self.capital += trade.quantity * effective_exit - commission_cost;
        trade.settle(exit_time, effective_exit, pnl, reason);
        trade
    }
}
