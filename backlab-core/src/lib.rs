//! BackLab Core — the backtesting simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, trades)
//! - Bar-by-bar replay loop with strict prefix-only evaluation
//! - Position ledger: sizing, stop/target placement, settlement math
//! - Strategy and indicator traits plus bundled implementations
//! - Deterministic synthetic data generators for tests and benches
//!
//! Metrics and report assembly live in `backlab-runner`; this crate stops
//! at the raw [`engine::RunResult`].

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod ledger;
pub mod sample_data;
pub mod strategy;
