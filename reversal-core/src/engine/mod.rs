//! Per-bar orchestration: feed → evaluator → reconciler → gateway.

pub mod runner;
pub mod warmup;

pub use runner::{ActionOutcome, BarReport, RunSummary, SkipReason, StrategyRunner};
pub use warmup::WarmupState;
