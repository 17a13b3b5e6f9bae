//! Backtest runner — wires together the engine, metrics, and the report.
//!
//! One entry point: [`run_backtest`]. It narrows the bar range to the
//! requested bounds, drives the core simulation, computes metrics from the
//! raw result, and assembles the serializable report.

use chrono::{DateTime, Utc};
use thiserror::Error;

use backlab_core::config::{BacktestConfig, ConfigError};
use backlab_core::domain::Bar;
use backlab_core::engine::{run_simulation, CancelToken};
use backlab_core::error::EngineError;
use backlab_core::strategy::{IndicatorCalculator, Strategy};

use crate::fingerprint::RunFingerprint;
use crate::metrics::BacktestMetrics;
use crate::report::BacktestReport;

/// Errors from the runner. A failed run produces no partial report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Optional knobs around a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Drop bars before this timestamp.
    pub start_bound: Option<DateTime<Utc>>,
    /// Drop bars after this timestamp.
    pub end_bound: Option<DateTime<Utc>>,
    /// Cooperative cancellation, polled once per bar.
    pub cancel: Option<CancelToken>,
}

/// Run one backtest and return the full report.
///
/// Reversed bounds are an invalid configuration; a bounded range with too
/// few bars surfaces as `InsufficientData` from the engine.
pub fn run_backtest(
    strategy: &dyn Strategy,
    indicators: &dyn IndicatorCalculator,
    bars: &[Bar],
    config: &BacktestConfig,
    options: &RunOptions,
) -> Result<BacktestReport, RunError> {
    if let (Some(start), Some(end)) = (options.start_bound, options.end_bound) {
        if start > end {
            return Err(EngineError::InvalidConfiguration(ConfigError::BoundsReversed {
                start,
                end,
            })
            .into());
        }
    }

    let bars = bound_bars(bars, options.start_bound, options.end_bound);
    let fingerprint = RunFingerprint::compute(strategy.name(), config, bars);

    let result = run_simulation(strategy, indicators, bars, config, options.cancel.as_ref())?;

    let metrics = BacktestMetrics::compute(
        result.initial_capital,
        &result.equity_curve,
        &result.drawdown_curve,
        &result.returns,
        &result.trades,
        result.bar_count,
    );

    Ok(BacktestReport::assemble(result, metrics, fingerprint))
}

/// Narrow `bars` to the inclusive timestamp range.
///
/// Bars are timestamp-ordered, so the bounds cut a contiguous window.
fn bound_bars(
    bars: &[Bar],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> &[Bar] {
    let lo = match start {
        Some(s) => bars.partition_point(|b| b.timestamp < s),
        None => 0,
    };
    let hi = match end {
        Some(e) => bars.partition_point(|b| b.timestamp <= e),
        None => bars.len(),
    };
    if lo >= hi {
        &[]
    } else {
        &bars[lo..hi]
    }
}
