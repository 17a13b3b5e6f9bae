//! BackLab Runner — orchestration on top of the core engine.
//!
//! The core hands back a raw run result; this crate derives the metrics
//! record, stamps a content fingerprint, assembles the report, and fans
//! parameter sweeps out across threads.

pub mod fingerprint;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sweep;

pub use fingerprint::RunFingerprint;
pub use metrics::BacktestMetrics;
pub use report::{BacktestPeriod, BacktestReport, TradeSummary};
pub use runner::{run_backtest, RunError, RunOptions};
pub use sweep::{ConfigGrid, ConfigSweep, SweepResults};
