//! Domain types: bars, signals, trades.

pub mod bar;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use signal::{Signal, SignalAction};
pub use trade::{ExitReason, Trade, TradeSide, TradeStatus};
