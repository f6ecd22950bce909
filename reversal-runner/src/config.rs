//! Replay configuration file.
//!
//! ```toml
//! pip_size = 0.0001
//! renko_brick = 0.0010   # optional: replay on Renko bricks
//!
//! [strategy]
//! symbol = "EURUSD"
//! fast_period = 100
//! slow_period = 300
//! ```
//!
//! Every key is optional; missing keys take the strategy defaults.

use anyhow::{Context, Result};
use reversal_core::domain::Instrument;
use reversal_core::strategy::StrategyConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PIP_SIZE: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Price value of one pip for the traded symbol.
    pub pip_size: f64,
    /// Replay on Renko bricks of this size instead of the raw bars.
    pub renko_brick: Option<f64>,
    pub strategy: StrategyConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            pip_size: DEFAULT_PIP_SIZE,
            renko_brick: None,
            strategy: StrategyConfig::default(),
        }
    }
}

impl ReplayConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse replay config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize replay config")
    }

    pub fn validate(&self) -> Result<()> {
        self.strategy.validate().context("invalid [strategy] table")?;
        self.instrument()?;
        if let Some(brick) = self.renko_brick {
            anyhow::ensure!(
                brick > 0.0 && brick.is_finite(),
                "renko_brick must be a positive number, got {brick}"
            );
        }
        Ok(())
    }

    /// Instrument for the configured symbol and pip size.
    pub fn instrument(&self) -> Result<Instrument> {
        Instrument::new(self.strategy.symbol.clone(), self.pip_size)
            .context("invalid instrument settings")
    }
}

/// Read and validate a replay config from a TOML file.
pub fn load_config(path: &Path) -> Result<ReplayConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    ReplayConfig::from_toml(&content).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = ReplayConfig::from_toml("").unwrap();
        assert_eq!(cfg, ReplayConfig::default());
        assert_eq!(cfg.strategy.slow_period, 300);
    }

    #[test]
    fn partial_strategy_table() {
        let cfg = ReplayConfig::from_toml(
            r#"
renko_brick = 0.001

[strategy]
fast_period = 20
slow_period = 50
tag = "renko_rev"
"#,
        )
        .unwrap();
        assert_eq!(cfg.renko_brick, Some(0.001));
        assert_eq!(cfg.strategy.fast_period, 20);
        assert_eq!(cfg.strategy.tag, "renko_rev");
        assert_eq!(cfg.strategy.trend_multiplier, 30.0);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ReplayConfig::from_toml("[strategy]\nfast_period = 300\nslow_period = 100\n").is_err());
        assert!(ReplayConfig::from_toml("pip_size = 0.0\n").is_err());
        assert!(ReplayConfig::from_toml("renko_brick = -1.0\n").is_err());
        assert!(ReplayConfig::from_toml("[strategy\n").is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = ReplayConfig::default();
        cfg.renko_brick = Some(0.0010);
        cfg.strategy.volume = 5_000.0;
        let text = cfg.to_toml().unwrap();
        assert_eq!(ReplayConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn instrument_uses_strategy_symbol() {
        let mut cfg = ReplayConfig::default();
        cfg.strategy.symbol = "USDJPY".into();
        cfg.pip_size = 0.01;
        let inst = cfg.instrument().unwrap();
        assert_eq!(inst.symbol, "USDJPY");
        assert_eq!(inst.pip_size, 0.01);
    }
}
