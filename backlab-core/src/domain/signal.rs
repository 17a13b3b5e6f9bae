//! Signal — a strategy's per-bar trading decision.

use serde::{Deserialize, Serialize};

/// Direction of a strategy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    /// True for Buy/Sell — the actions the ledger can act on.
    pub fn is_entry(self) -> bool {
        matches!(self, SignalAction::Buy | SignalAction::Sell)
    }
}

/// One strategy decision for one bar.
///
/// Ephemeral: produced fresh per bar, never retained by the engine beyond
/// the decision it drives. `confidence` scales position sizing and is
/// expected in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub action: SignalAction,
    pub confidence: f64,
    pub strategy_name: String,
    pub reasoning: Vec<String>,
}

impl Signal {
    /// A no-op decision. Used by strategies that have nothing to say on a bar.
    pub fn hold(strategy_name: impl Into<String>) -> Self {
        Self {
            action: SignalAction::Hold,
            confidence: 0.0,
            strategy_name: strategy_name.into(),
            reasoning: Vec::new(),
        }
    }
}
