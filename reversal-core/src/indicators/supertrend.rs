//! Supertrend: volatility-band trend-flip indicator.
//!
//! Bands sit at hl2 ± multiplier * ATR. The upper band only moves down while
//! the previous close stays at or below it, the lower band only moves up while
//! the previous close stays at or above it. Trend flips Down when a close
//! breaks below the lower band and Up when a close breaks above the upper band.
//!
//! Output: the active band (lower band while Up, upper band while Down) plus
//! the trend side per bar. Lookback: period (inherited from ATR).

use super::atr::AtrState;
use super::Indicator;
use crate::domain::{BarSnapshot, TrendDirection};

#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
    name: String,
}

/// Band value and trend side for every bar of a series.
#[derive(Debug, Clone, Default)]
pub struct SupertrendSeries {
    pub band: Vec<f64>,
    pub direction: Vec<Option<TrendDirection>>,
}

impl Supertrend {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Supertrend period must be >= 1");
        assert!(multiplier > 0.0, "Supertrend multiplier must be > 0");
        Self {
            period,
            multiplier,
            name: format!("supertrend_{period}_{multiplier}"),
        }
    }

    pub fn compute_series(&self, bars: &[BarSnapshot]) -> SupertrendSeries {
        let mut state = SupertrendState::new(self.period, self.multiplier);
        let mut series = SupertrendSeries {
            band: Vec::with_capacity(bars.len()),
            direction: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            match state.update(bar) {
                Some((band, dir)) => {
                    series.band.push(band);
                    series.direction.push(Some(dir));
                }
                None => {
                    series.band.push(f64::NAN);
                    series.direction.push(None);
                }
            }
        }
        series
    }
}

impl Indicator for Supertrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[BarSnapshot]) -> Vec<f64> {
        self.compute_series(bars).band
    }
}

#[derive(Debug, Clone, Copy)]
struct Bands {
    upper: f64,
    lower: f64,
    trend: TrendDirection,
}

/// Incremental Supertrend. Starts in an Up trend on the first bar with a valid ATR.
#[derive(Debug, Clone)]
pub struct SupertrendState {
    multiplier: f64,
    atr: AtrState,
    bands: Option<Bands>,
    prev_close: f64,
}

impl SupertrendState {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self {
            multiplier,
            atr: AtrState::new(period),
            bands: None,
            prev_close: f64::NAN,
        }
    }

    /// Feed one bar; returns (active band, trend) once warm.
    pub fn update(&mut self, bar: &BarSnapshot) -> Option<(f64, TrendDirection)> {
        let atr = self.atr.update(bar);
        let prev_close = std::mem::replace(&mut self.prev_close, bar.close);

        let atr = match atr {
            Some(a) if !bar.is_void() => a,
            _ => return None,
        };

        let hl2 = (bar.high + bar.low) / 2.0;
        let basic_upper = hl2 + self.multiplier * atr;
        let basic_lower = hl2 - self.multiplier * atr;

        let next = match self.bands {
            None => Bands {
                upper: basic_upper,
                lower: basic_lower,
                trend: TrendDirection::Up,
            },
            Some(prev) => {
                let upper = if prev_close <= prev.upper {
                    basic_upper.min(prev.upper)
                } else {
                    basic_upper
                };
                let lower = if prev_close >= prev.lower {
                    basic_lower.max(prev.lower)
                } else {
                    basic_lower
                };
                let trend = match prev.trend {
                    TrendDirection::Up if bar.close < lower => TrendDirection::Down,
                    TrendDirection::Down if bar.close > upper => TrendDirection::Up,
                    unchanged => unchanged,
                };
                Bands { upper, lower, trend }
            }
        };
        self.bands = Some(next);

        let band = match next.trend {
            TrendDirection::Up => next.lower,
            TrendDirection::Down => next.upper,
        };
        Some((band, next.trend))
    }
}
