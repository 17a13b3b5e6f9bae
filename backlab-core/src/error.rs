//! Engine error taxonomy.
//!
//! Fatal errors (`EngineError`) abort the run before or during simulation
//! and never produce a partial result. Per-bar collaborator failures
//! (`SignalError`) are recovered inside the loop and surface only as
//! diagnostics on the completed run.

use thiserror::Error;

use crate::config::ConfigError;

/// A failure raised by an indicator calculator or strategy for one bar.
///
/// Recovered locally: the bar degrades to an implicit HOLD while equity and
/// drawdown bookkeeping continue with the pre-existing open positions.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SignalError(pub String);

impl From<String> for SignalError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

impl From<&str> for SignalError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

/// Fatal run errors. No simulation state survives any of these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient data: {have} bars < minimum {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("run cancelled at bar {bar_index}")]
    Cancelled { bar_index: usize },
}
