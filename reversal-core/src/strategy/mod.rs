//! The reversal rule: signal evaluation and position reconciliation.
//!
//! The evaluator turns one closed bar, the forming bar and the indicators at
//! the closed bar into a [`Decision`]. The reconciler turns a decision and the
//! strategy's open positions into concrete [`Action`]s. Neither touches the
//! broker.

pub mod config;
pub mod decision;
pub mod evaluator;
pub mod reconciler;

pub use config::{ConfigError, StrategyConfig};
pub use decision::{Action, Decision, EntrySignal, ExitSignal};
pub use evaluator::{EvaluationError, SignalEvaluator};
pub use reconciler::PositionReconciler;
