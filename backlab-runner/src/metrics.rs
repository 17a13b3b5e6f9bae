//! Performance metrics — pure functions that compute run statistics.
//!
//! Every metric is a pure function: equity/return series and/or trade list
//! in, scalar out. No dependency on the engine or the runner. A run with no
//! closed trades gets the all-zero record, never NaN and never an error.

use serde::{Deserialize, Serialize};

use backlab_core::domain::Trade;

/// Trading periods per year used to annualize Sharpe and Sortino.
const ANNUALIZATION_PERIODS: f64 = 252.0;

/// Days per year used for the annual-return exponent.
///
/// The elapsed bar count is treated as a day count. Callers replaying
/// sub-daily bars get a mis-annualized figure unless they pre-convert; the
/// ratio metrics are unaffected.
const DAYS_PER_YEAR: f64 = 365.25;

/// Aggregate performance metrics for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_return: f64,
    pub total_return_pct: f64,
    pub annual_return_pct: f64,
    /// Largest peak-to-trough decline, in initial-capital currency.
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    /// Percentage of closed trades with positive P&L.
    pub win_rate: f64,
    /// Gross winning P&L over gross losing P&L; +inf with winners and no
    /// losers.
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub max_win: f64,
    pub max_loss: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Mean holding time of closed trades, in hours.
    pub avg_trade_duration: f64,
    /// Mean holding time in bars, assuming hourly bars.
    pub avg_bars_in_trade: f64,
    pub consecutive_wins: usize,
    pub consecutive_losses: usize,
    pub recovery_factor: f64,
    /// |avg_win / avg_loss|; +inf when the average loss is zero.
    pub payoff_ratio: f64,
}

impl BacktestMetrics {
    /// Compute the full record from a run's raw output.
    ///
    /// `elapsed_bars` is the total bar count of the replayed range (warmup
    /// included) and drives the annual-return exponent.
    pub fn compute(
        initial_capital: f64,
        equity_samples: &[f64],
        drawdown_samples: &[f64],
        return_samples: &[f64],
        trades: &[Trade],
        elapsed_bars: usize,
    ) -> Self {
        if trades.is_empty() {
            return Self::zeroed();
        }

        let final_equity = equity_samples.last().copied().unwrap_or(initial_capital);
        let total_return = final_equity - initial_capital;
        let total_return_pct = total_return / initial_capital * 100.0;
        let annual_return_pct =
            annual_return_pct(initial_capital, final_equity, elapsed_bars);

        let max_dd_frac = drawdown_samples.iter().copied().fold(0.0_f64, f64::max);
        let max_drawdown_pct = max_dd_frac * 100.0;

        let pnls: Vec<f64> = trades.iter().filter_map(|t| t.pnl).collect();
        let wins: Vec<f64> = pnls.iter().copied().filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = pnls.iter().copied().filter(|&p| p < 0.0).collect();

        let win_rate = wins.len() as f64 / trades.len() as f64 * 100.0;
        let avg_win = mean(&wins);
        let avg_loss = mean(&losses);
        let max_win = wins.iter().copied().fold(0.0_f64, f64::max);
        let max_loss = losses.iter().copied().fold(0.0_f64, f64::min);

        let profit_factor = profit_factor(&wins, &losses);
        let payoff_ratio = if avg_loss != 0.0 {
            (avg_win / avg_loss).abs()
        } else {
            f64::INFINITY
        };

        let calmar_ratio = if max_drawdown_pct != 0.0 {
            annual_return_pct / max_drawdown_pct
        } else {
            0.0
        };
        let recovery_factor = if max_drawdown_pct != 0.0 {
            total_return_pct / max_drawdown_pct
        } else {
            0.0
        };

        let durations: Vec<f64> = trades.iter().filter_map(|t| t.duration_hours()).collect();
        let avg_trade_duration = mean(&durations);

        Self {
            total_return,
            total_return_pct,
            annual_return_pct,
            max_drawdown: max_dd_frac * initial_capital,
            max_drawdown_pct,
            sharpe_ratio: sharpe_ratio(return_samples),
            sortino_ratio: sortino_ratio(return_samples),
            calmar_ratio,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            max_win,
            max_loss,
            total_trades: trades.len(),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            avg_trade_duration,
            avg_bars_in_trade: avg_trade_duration,
            consecutive_wins: longest_streak(trades, true),
            consecutive_losses: longest_streak(trades, false),
            recovery_factor,
            payoff_ratio,
        }
    }

    /// The well-defined record for a run that closed no trades.
    pub fn zeroed() -> Self {
        Self {
            total_return: 0.0,
            total_return_pct: 0.0,
            annual_return_pct: 0.0,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            calmar_ratio: 0.0,
            win_rate: 0.0,
            profit_factor: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            max_win: 0.0,
            max_loss: 0.0,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            avg_trade_duration: 0.0,
            avg_bars_in_trade: 0.0,
            consecutive_wins: 0,
            consecutive_losses: 0,
            recovery_factor: 0.0,
            payoff_ratio: 0.0,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Annualized growth rate, in percent.
///
/// `elapsed_bars / 365.25` years; 0 when the window is empty.
pub fn annual_return_pct(initial_capital: f64, final_equity: f64, elapsed_bars: usize) -> f64 {
    let years = elapsed_bars as f64 / DAYS_PER_YEAR;
    if years <= 0.0 || initial_capital <= 0.0 {
        return 0.0;
    }
    ((final_equity / initial_capital).powf(1.0 / years) - 1.0) * 100.0
}

/// Annualized Sharpe ratio over per-bar returns.
///
/// `mean / population_std × sqrt(252)`; 0 when the deviation is zero or
/// there are no returns.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let std = population_std(returns);
    if std == 0.0 {
        return 0.0;
    }
    mean(returns) / std * ANNUALIZATION_PERIODS.sqrt()
}

/// Annualized Sortino ratio: same numerator as Sharpe, deviation taken
/// over the negative returns only. 0 when there is no downside.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let downside_std = population_std(&downside);
    if downside_std == 0.0 {
        return 0.0;
    }
    mean(returns) / downside_std * ANNUALIZATION_PERIODS.sqrt()
}

/// Gross winning P&L over gross losing P&L magnitude.
///
/// +inf with at least one winner and no losers; 0 with neither.
pub fn profit_factor(wins: &[f64], losses: &[f64]) -> f64 {
    if losses.is_empty() {
        return if wins.is_empty() { 0.0 } else { f64::INFINITY };
    }
    wins.iter().sum::<f64>().abs() / losses.iter().sum::<f64>().abs()
}

/// Longest run of consecutive winners (or losers) in closing order.
pub fn longest_streak(trades: &[Trade], winners: bool) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for trade in trades {
        let pnl = trade.pnl.unwrap_or(0.0);
        let hit = if winners { pnl > 0.0 } else { pnl < 0.0 };
        if hit {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N, not N-1).
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
