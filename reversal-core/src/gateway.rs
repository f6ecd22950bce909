//! Broker-facing collaborators: the position store and the execution gateway.
//!
//! Both are injected into the runner. Any blocking I/O lives behind these
//! traits; the evaluator and reconciler never call them.

use crate::domain::{Position, PositionId, TradeSide};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Market order opening a new tagged position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub side: TradeSide,
    pub symbol: String,
    pub volume: f64,
    /// Stop distance in price units.
    pub stop_loss_distance: f64,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ExecutionError {
    #[error("no market quote available for {symbol}")]
    NoQuote { symbol: String },

    #[error("position {id} is not open")]
    UnknownPosition { id: PositionId },

    #[error("order rejected: {reason}")]
    Rejected { reason: String },

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the account's open positions.
pub trait PositionStore: Send + Sync {
    /// Open positions carrying `tag` on `symbol`.
    ///
    /// Implementations may over-return; callers re-filter before acting.
    fn list_positions(&self, tag: &str, symbol: &str) -> Vec<Position>;
}

/// Order placement against a broker or simulated account.
pub trait ExecutionGateway: Send + Sync {
    fn open_position(&self, request: &OpenRequest) -> Result<PositionId, ExecutionError>;

    fn close_position(&self, id: PositionId) -> Result<(), ExecutionError>;
}
