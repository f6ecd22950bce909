//! Evaluator output and reconciler actions.

use crate::domain::{Position, TradeSide, TrendDirection};
use serde::{Deserialize, Serialize};

/// Entry axis of a decision. Exactly one case per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySignal {
    OpenLong,
    OpenShort,
    NoNewEntry,
}

impl EntrySignal {
    pub fn side(&self) -> Option<TradeSide> {
        match self {
            EntrySignal::OpenLong => Some(TradeSide::Long),
            EntrySignal::OpenShort => Some(TradeSide::Short),
            EntrySignal::NoNewEntry => None,
        }
    }
}

/// Exit axis of a decision, independent of the entry axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitSignal {
    ExitLong,
    ExitShort,
    NoExit,
}

impl ExitSignal {
    /// Exit implied by the trend side alone: Down closes longs, Up closes shorts.
    pub fn from_trend(trend: TrendDirection) -> Self {
        match trend {
            TrendDirection::Down => ExitSignal::ExitLong,
            TrendDirection::Up => ExitSignal::ExitShort,
        }
    }

    /// Whether a position on `side` must be closed under this exit.
    pub fn closes(&self, side: TradeSide) -> bool {
        matches!(
            (self, side),
            (ExitSignal::ExitLong, TradeSide::Long) | (ExitSignal::ExitShort, TradeSide::Short)
        )
    }
}

/// What the rule wants for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub entry: EntrySignal,
    pub exit: ExitSignal,
}

impl Decision {
    /// No entry and no exit: the fail-safe answer.
    pub fn idle() -> Self {
        Self {
            entry: EntrySignal::NoNewEntry,
            exit: ExitSignal::NoExit,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }
}

/// Concrete instruction for the execution gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    ClosePosition {
        position: Position,
    },
    OpenPosition {
        side: TradeSide,
        volume: f64,
        /// Stop distance in price units.
        stop_loss_distance: f64,
    },
}

impl Action {
    pub fn is_close(&self) -> bool {
        matches!(self, Action::ClosePosition { .. })
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Action::OpenPosition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_down_closes_longs_only() {
        let exit = ExitSignal::from_trend(TrendDirection::Down);
        assert!(exit.closes(TradeSide::Long));
        assert!(!exit.closes(TradeSide::Short));
    }

    #[test]
    fn trend_up_closes_shorts_only() {
        let exit = ExitSignal::from_trend(TrendDirection::Up);
        assert!(exit.closes(TradeSide::Short));
        assert!(!exit.closes(TradeSide::Long));
    }

    #[test]
    fn no_exit_closes_nothing() {
        assert!(!ExitSignal::NoExit.closes(TradeSide::Long));
        assert!(!ExitSignal::NoExit.closes(TradeSide::Short));
    }

    #[test]
    fn idle_decision() {
        let d = Decision::idle();
        assert!(d.is_idle());
        assert_eq!(d.entry.side(), None);
    }

    #[test]
    fn decision_serializes_as_variant_names() {
        let d = Decision {
            entry: EntrySignal::OpenLong,
            exit: ExitSignal::ExitShort,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"entry":"OpenLong","exit":"ExitShort"}"#);
    }
}
