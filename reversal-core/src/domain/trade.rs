//! TradeRecord: a completed round trip, entry to exit.

use super::ids::PositionId;
use super::position::TradeSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Closed by the strategy on a trend flip.
    Signal,
    /// Closed by the broker when the stop-loss price was touched.
    StopLoss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub position_id: PositionId,
    pub symbol: String,
    pub tag: String,
    pub side: TradeSide,

    pub entry_bar: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,

    pub volume: f64,
    pub pnl: f64,
    pub exit_reason: ExitReason,
}

impl TradeRecord {
    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Signed price move captured by the trade.
    pub fn price_move(&self) -> f64 {
        self.side.sign() * (self.exit_price - self.entry_price)
    }
}
