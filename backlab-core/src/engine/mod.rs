//! The simulation engine: replay loop, run output, cancellation.

mod cancel;
mod loop_runner;
mod state;

pub use cancel::CancelToken;
pub use loop_runner::run_simulation;
pub use state::{RejectedSignal, RunResult, SkippedBar};
