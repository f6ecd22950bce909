//! In-memory paper broker.
//!
//! Implements both [`PositionStore`] and [`ExecutionGateway`] over shared
//! state, so one clone can be handed to the runner as the store and another
//! as the gateway. Market orders fill at the close of the latest quote.
//! Stop-losses are checked when a new quote arrives, before the strategy sees
//! that bar. They fill at the stop price, or at the bar's open when the bar
//! gaps through the stop.

use chrono::{DateTime, Utc};
use reversal_core::domain::{BarSnapshot, ExitReason, Position, PositionId, TradeRecord};
use reversal_core::gateway::{ExecutionError, ExecutionGateway, OpenRequest, PositionStore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct OpenPosition {
    position: Position,
    entry_time: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct BrokerState {
    next_id: u64,
    quote: Option<BarSnapshot>,
    open: Vec<OpenPosition>,
    trades: Vec<TradeRecord>,
    reject: Option<String>,
}

impl BrokerState {
    fn settle(
        &mut self,
        idx: usize,
        exit_price: f64,
        exit_bar: usize,
        exit_time: DateTime<Utc>,
        exit_reason: ExitReason,
    ) -> TradeRecord {
        let OpenPosition {
            position,
            entry_time,
        } = self.open.remove(idx);
        let trade = TradeRecord {
            position_id: position.id,
            symbol: position.symbol,
            tag: position.tag,
            side: position.side,
            entry_bar: position.opened_at_bar,
            entry_time,
            entry_price: position.entry_price,
            exit_bar,
            exit_time,
            exit_price,
            volume: position.volume,
            pnl: position.side.sign() * (exit_price - position.entry_price) * position.volume,
            exit_reason,
        };
        self.trades.push(trade.clone());
        trade
    }
}

/// Single-symbol simulated account. Cloning shares the account.
#[derive(Debug, Clone)]
pub struct PaperBroker {
    symbol: String,
    state: Arc<Mutex<BrokerState>>,
}

impl PaperBroker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: Arc::new(Mutex::new(BrokerState::default())),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance the market to `bar`.
    ///
    /// Any open position whose stop the bar touches is closed first, at the
    /// stop price or at the open if the bar opened beyond it. Returns the
    /// trades closed this way.
    pub fn on_quote(&self, bar: &BarSnapshot) -> Vec<TradeRecord> {
        let mut state = self.lock();
        let mut stopped = Vec::new();

        let mut i = 0;
        while i < state.open.len() {
            let position = &state.open[i].position;
            let stop = position.stop_price();
            let hit = if position.is_long() {
                bar.low <= stop
            } else {
                bar.high >= stop
            };
            if hit {
                let fill = if position.is_long() {
                    stop.min(bar.open)
                } else {
                    stop.max(bar.open)
                };
                let trade = state.settle(i, fill, bar.index, bar.timestamp, ExitReason::StopLoss);
                info!(
                    bar = bar.index,
                    position = %trade.position_id,
                    side = %trade.side,
                    price = fill,
                    pnl = trade.pnl,
                    "stop-loss hit"
                );
                stopped.push(trade);
            } else {
                i += 1;
            }
        }

        state.quote = Some(*bar);
        stopped
    }

    /// Make every following order fail with `reason`, or accept again with `None`.
    pub fn set_reject(&self, reason: Option<String>) {
        self.lock().reject = reason;
    }

    pub fn last_price(&self) -> Option<f64> {
        self.lock().quote.map(|q| q.close)
    }

    pub fn open_positions(&self) -> Vec<Position> {
        self.lock().open.iter().map(|o| o.position.clone()).collect()
    }

    /// Every closed round trip so far, in closing order.
    pub fn trades(&self) -> Vec<TradeRecord> {
        self.lock().trades.clone()
    }

    /// Mark-to-market value of the open positions at the last quote.
    pub fn unrealized_pnl(&self) -> f64 {
        let state = self.lock();
        match state.quote {
            Some(q) => state
                .open
                .iter()
                .map(|o| o.position.unrealized_pnl(q.close))
                .sum(),
            None => 0.0,
        }
    }
}

impl PositionStore for PaperBroker {
    fn list_positions(&self, tag: &str, symbol: &str) -> Vec<Position> {
        self.lock()
            .open
            .iter()
            .filter(|o| o.position.belongs_to(tag, symbol))
            .map(|o| o.position.clone())
            .collect()
    }
}

impl ExecutionGateway for PaperBroker {
    fn open_position(&self, request: &OpenRequest) -> Result<PositionId, ExecutionError> {
        let mut state = self.lock();
        if let Some(reason) = &state.reject {
            return Err(ExecutionError::Rejected {
                reason: reason.clone(),
            });
        }
        if request.symbol != self.symbol {
            return Err(ExecutionError::Rejected {
                reason: format!("{} is not traded on this account", request.symbol),
            });
        }
        if !(request.volume > 0.0) {
            return Err(ExecutionError::Rejected {
                reason: format!("volume {} must be positive", request.volume),
            });
        }
        let quote = state.quote.ok_or_else(|| ExecutionError::NoQuote {
            symbol: request.symbol.clone(),
        })?;

        state.next_id += 1;
        let id = PositionId(state.next_id);
        state.open.push(OpenPosition {
            position: Position {
                id,
                symbol: request.symbol.clone(),
                tag: request.tag.clone(),
                side: request.side,
                volume: request.volume,
                entry_price: quote.close,
                stop_loss_distance: request.stop_loss_distance,
                opened_at_bar: quote.index,
            },
            entry_time: quote.timestamp,
        });
        debug!(position = %id, price = quote.close, "paper fill");
        Ok(id)
    }

    fn close_position(&self, id: PositionId) -> Result<(), ExecutionError> {
        let mut state = self.lock();
        if let Some(reason) = &state.reject {
            return Err(ExecutionError::Rejected {
                reason: reason.clone(),
            });
        }
        let idx = state
            .open
            .iter()
            .position(|o| o.position.id == id)
            .ok_or(ExecutionError::UnknownPosition { id })?;
        let quote = state.quote.ok_or_else(|| ExecutionError::NoQuote {
            symbol: self.symbol.clone(),
        })?;

        state.settle(idx, quote.close, quote.index, quote.timestamp, ExitReason::Signal);
        Ok(())
    }
}
