//! Reversal Core: domain types, indicators, the signal evaluator, the
//! position reconciler and the per-bar strategy runner.
//!
//! The decision path is split so each piece can be tested on its own:
//! - `feed` hands out bars and indicator snapshots by bar index
//! - `strategy::SignalEvaluator` turns one closed bar, the forming bar and the
//!   closed bar's indicators into a `Decision`
//! - `strategy::PositionReconciler` turns a decision plus the strategy's open
//!   positions into ordered close/open actions
//! - `engine::StrategyRunner` wires them to a `PositionStore` and an
//!   `ExecutionGateway`

pub mod data;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod gateway;
pub mod indicators;
pub mod strategy;
