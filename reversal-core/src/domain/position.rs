use super::ids::PositionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an open position or of an order opening one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn opposite(&self) -> Self {
        match self {
            TradeSide::Long => TradeSide::Short,
            TradeSide::Short => TradeSide::Long,
        }
    }

    /// +1.0 for long, -1.0 for short.
    pub fn sign(&self) -> f64 {
        match self {
            TradeSide::Long => 1.0,
            TradeSide::Short => -1.0,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Long => write!(f, "long"),
            TradeSide::Short => write!(f, "short"),
        }
    }
}

/// An open position as reported by the broker.
///
/// Owned by the account, not by the strategy: the strategy reads these and
/// issues close instructions by `id`, it never edits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub symbol: String,
    pub tag: String,
    pub side: TradeSide,
    pub volume: f64,
    pub entry_price: f64,
    /// Stop distance in price units from `entry_price`.
    pub stop_loss_distance: f64,
    pub opened_at_bar: usize,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.side == TradeSide::Long
    }

    pub fn is_short(&self) -> bool {
        self.side == TradeSide::Short
    }

    /// Whether this position was opened by `tag` on `symbol`.
    pub fn belongs_to(&self, tag: &str, symbol: &str) -> bool {
        self.tag == tag && self.symbol == symbol
    }

    /// Absolute stop price implied by entry and stop distance.
    pub fn stop_price(&self) -> f64 {
        self.entry_price - self.side.sign() * self.stop_loss_distance
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.side.sign() * (current_price - self.entry_price) * self.volume
    }
}
