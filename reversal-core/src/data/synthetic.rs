//! Seeded random-walk bars for demos, benches and tests.

use crate::domain::BarSnapshot;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Minute bars whose close random-walks from `start_price`.
///
/// Each bar opens at the previous close. The wick extends up to `wick` beyond
/// the body on either side, so every bar is sane. The same seed always
/// yields the same series.
#[derive(Debug, Clone)]
pub struct SyntheticBars {
    pub start: DateTime<Utc>,
    pub start_price: f64,
    /// Largest close-to-close move per bar.
    pub step: f64,
    pub wick: f64,
    pub seed: u64,
}

impl Default for SyntheticBars {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2025, 10, 7, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            start_price: 1.1000,
            step: 0.0002,
            wick: 0.0005,
            seed: 42,
        }
    }
}

impl SyntheticBars {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn generate(&self, count: usize) -> Vec<BarSnapshot> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut bars = Vec::with_capacity(count);
        let mut prev_close = self.start_price;

        for i in 0..count {
            let open = prev_close;
            let close = (open + rng.gen_range(-self.step..=self.step)).max(self.step);
            let high = open.max(close) + rng.gen_range(0.0..=self.wick);
            let low = open.min(close) - rng.gen_range(0.0..=self.wick);
            bars.push(BarSnapshot {
                index: i,
                timestamp: self.start + Duration::minutes(i as i64),
                open,
                high,
                low,
                close,
            });
            prev_close = close;
        }
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_series;

    #[test]
    fn same_seed_same_series() {
        let a = SyntheticBars::with_seed(7).generate(200);
        let b = SyntheticBars::with_seed(7).generate(200);
        assert_eq!(a, b);
        assert_ne!(a, SyntheticBars::with_seed(8).generate(200));
    }

    #[test]
    fn bars_are_sane_and_ordered() {
        let bars = SyntheticBars::default().generate(3000);
        assert_eq!(bars.len(), 3000);
        assert_eq!(bars[0].open, 1.1000);
        assert!(validate_series(&bars).is_ok());
        assert!(bars.windows(2).all(|w| w[1].open == w[0].close));
    }
}
