//! Position reconciler: decision + open positions → ordered actions.
//!
//! Closes come first, one per matching position the exit applies to, then at
//! most one open. Positions that belong to another tag or symbol are never
//! touched, even if the store hands them over.

use super::config::StrategyConfig;
use super::decision::{Action, Decision};
use crate::domain::{Instrument, Position};

#[derive(Debug, Clone)]
pub struct PositionReconciler {
    tag: String,
    symbol: String,
    volume: f64,
    stop_loss_distance: f64,
}

impl PositionReconciler {
    /// `stop_loss_distance` is in price units; volume is passed through as-is.
    pub fn new(
        tag: impl Into<String>,
        symbol: impl Into<String>,
        volume: f64,
        stop_loss_distance: f64,
    ) -> Self {
        Self {
            tag: tag.into(),
            symbol: symbol.into(),
            volume,
            stop_loss_distance,
        }
    }

    pub fn from_config(config: &StrategyConfig, instrument: &Instrument) -> Self {
        Self::new(
            config.tag.clone(),
            config.symbol.clone(),
            config.volume,
            instrument.pips_to_price(config.stop_loss_pips),
        )
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn reconcile(&self, decision: &Decision, positions: &[Position]) -> Vec<Action> {
        let mut actions: Vec<Action> = positions
            .iter()
            .filter(|p| p.belongs_to(&self.tag, &self.symbol))
            .filter(|p| decision.exit.closes(p.side))
            .map(|p| Action::ClosePosition { position: p.clone() })
            .collect();

        if let Some(side) = decision.entry.side() {
            actions.push(Action::OpenPosition {
                side,
                volume: self.volume,
                stop_loss_distance: self.stop_loss_distance,
            });
        }

        actions
    }
}
