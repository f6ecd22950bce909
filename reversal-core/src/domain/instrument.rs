use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instrument metadata needed to turn pip distances into price distances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    /// Price value of one pip (0.0001 for most FX majors, 0.01 for JPY pairs).
    pub pip_size: f64,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, pip_size: f64) -> Result<Self, InstrumentError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(InstrumentError::EmptySymbol);
        }
        if !(pip_size > 0.0) || !pip_size.is_finite() {
            return Err(InstrumentError::InvalidPipSize { pip_size });
        }
        Ok(Self { symbol, pip_size })
    }

    /// FX major with a 0.0001 pip.
    pub fn fx_major(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            pip_size: 0.0001,
        }
    }

    pub fn pips_to_price(&self, pips: f64) -> f64 {
        pips * self.pip_size
    }

    pub fn price_to_pips(&self, distance: f64) -> f64 {
        distance / self.pip_size
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstrumentError {
    #[error("instrument symbol must not be empty")]
    EmptySymbol,

    #[error("pip size {pip_size} must be a positive finite number")]
    InvalidPipSize { pip_size: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_pips_on_fx_major() {
        let inst = Instrument::fx_major("EURUSD");
        assert!((inst.pips_to_price(5.0) - 0.0005).abs() < 1e-12);
        assert!((inst.price_to_pips(0.0005) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_pip_size() {
        assert!(Instrument::new("EURUSD", 0.0).is_err());
        assert!(Instrument::new("EURUSD", f64::NAN).is_err());
        assert_eq!(Instrument::new(" ", 0.0001), Err(InstrumentError::EmptySymbol));
    }

    #[test]
    fn jpy_pair_pip() {
        let inst = Instrument::new("USDJPY", 0.01).unwrap();
        assert!((inst.pips_to_price(5.0) - 0.05).abs() < 1e-12);
    }
}
