//! Strategy parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TAG: &str = "EMA_Reversal_Supertrend";

/// All tunables of the rule in one place.
///
/// Every field has a default, so a partial TOML table deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub symbol: String,
    /// Label written on every position this strategy opens.
    pub tag: String,
    pub fast_period: usize,
    pub slow_period: usize,
    pub trend_period: usize,
    pub trend_multiplier: f64,
    pub stop_loss_pips: f64,
    pub volume: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "EURUSD".into(),
            tag: DEFAULT_TAG.into(),
            fast_period: 100,
            slow_period: 300,
            trend_period: 2,
            trend_multiplier: 30.0,
            stop_loss_pips: 5.0,
            volume: 10_000.0,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptyField("symbol"));
        }
        if self.tag.trim().is_empty() {
            return Err(ConfigError::EmptyField("tag"));
        }
        if self.fast_period == 0 || self.slow_period == 0 || self.trend_period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.fast_period >= self.slow_period {
            return Err(ConfigError::PeriodOrder {
                fast: self.fast_period,
                slow: self.slow_period,
            });
        }
        for (name, value) in [
            ("trend_multiplier", self.trend_multiplier),
            ("stop_loss_pips", self.stop_loss_pips),
            ("volume", self.volume),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Closed bars that must be observed before any decision is trusted.
    pub fn warmup_bars(&self) -> usize {
        self.slow_period
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("indicator periods must be >= 1")]
    ZeroPeriod,

    #[error("fast period {fast} must be shorter than slow period {slow}")]
    PeriodOrder { fast: usize, slow: usize },

    #[error("{name} must be a positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("strategy trades {strategy} but the instrument is {instrument}")]
    InstrumentMismatch { strategy: String, instrument: String },
}
