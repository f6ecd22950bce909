//! In-memory feed over a fixed bar series with precomputed indicators.

use super::{FeedError, IndicatorFeed};
use crate::domain::{BarSnapshot, IndicatorSnapshot, TrendDirection};
use crate::indicators::{Ema, Indicator, Supertrend};
use crate::strategy::StrategyConfig;

/// Bars plus fast EMA, slow EMA and Supertrend, all computed once up front.
///
/// Bars are re-indexed to their position in the series so that a bar and its
/// indicator snapshot always share an index.
#[derive(Debug, Clone)]
pub struct SeriesFeed {
    bars: Vec<BarSnapshot>,
    fast: Vec<f64>,
    slow: Vec<f64>,
    band: Vec<f64>,
    trend: Vec<Option<TrendDirection>>,
}

impl SeriesFeed {
    pub fn new(
        mut bars: Vec<BarSnapshot>,
        fast_period: usize,
        slow_period: usize,
        trend_period: usize,
        trend_multiplier: f64,
    ) -> Self {
        for (i, bar) in bars.iter_mut().enumerate() {
            bar.index = i;
        }
        let fast = Ema::new(fast_period).compute(&bars);
        let slow = Ema::new(slow_period).compute(&bars);
        let st = Supertrend::new(trend_period, trend_multiplier).compute_series(&bars);
        Self {
            bars,
            fast,
            slow,
            band: st.band,
            trend: st.direction,
        }
    }

    pub fn from_config(bars: Vec<BarSnapshot>, config: &StrategyConfig) -> Self {
        Self::new(
            bars,
            config.fast_period,
            config.slow_period,
            config.trend_period,
            config.trend_multiplier,
        )
    }

    pub fn bars(&self) -> &[BarSnapshot] {
        &self.bars
    }

    pub fn fast_average(&self, index: usize) -> Option<f64> {
        self.fast.get(index).copied()
    }

    pub fn slow_average(&self, index: usize) -> Option<f64> {
        self.slow.get(index).copied()
    }

    /// Active Supertrend band at `index` (NaN during warm-up).
    pub fn trend_band(&self, index: usize) -> Option<f64> {
        self.band.get(index).copied()
    }

    fn check_range(&self, index: usize) -> Result<(), FeedError> {
        if index >= self.bars.len() {
            return Err(FeedError::OutOfRange {
                index,
                len: self.bars.len(),
            });
        }
        Ok(())
    }
}

impl IndicatorFeed for SeriesFeed {
    fn bar(&self, index: usize) -> Result<BarSnapshot, FeedError> {
        self.check_range(index)?;
        Ok(self.bars[index])
    }

    fn indicators(&self, index: usize) -> Result<IndicatorSnapshot, FeedError> {
        self.check_range(index)?;
        let trend = self.trend[index].ok_or(FeedError::NotWarm { index })?;
        let snapshot = IndicatorSnapshot {
            index,
            trend,
            fast_average: self.fast[index],
            slow_average: self.slow[index],
        };
        if !snapshot.is_ready() {
            return Err(FeedError::NotWarm { index });
        }
        Ok(snapshot)
    }

    fn len(&self) -> usize {
        self.bars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1.1000 + (i as f64 * 0.3).sin() * 0.002).collect()
    }

    #[test]
    fn snapshot_index_matches_bar_index() {
        let feed = SeriesFeed::new(make_bars(&closes(40)), 3, 5, 2, 3.0);
        let bar = feed.bar(20).unwrap();
        let ind = feed.indicators(20).unwrap();
        assert_eq!(bar.index, 20);
        assert_eq!(ind.index, 20);
        assert_eq!(Some(ind.slow_average), feed.slow_average(20));
    }

    #[test]
    fn not_warm_before_slow_average_seeds() {
        let feed = SeriesFeed::new(make_bars(&closes(40)), 3, 10, 2, 3.0);
        assert_eq!(feed.indicators(5), Err(FeedError::NotWarm { index: 5 }));
        assert!(feed.indicators(9).is_ok());
    }

    #[test]
    fn out_of_range() {
        let feed = SeriesFeed::new(make_bars(&closes(4)), 1, 2, 1, 1.0);
        assert_eq!(feed.bar(4), Err(FeedError::OutOfRange { index: 4, len: 4 }));
        assert_eq!(feed.len(), 4);
    }

    #[test]
    fn reindexes_sliced_bars() {
        let bars = make_bars(&closes(30));
        let feed = SeriesFeed::new(bars[10..].to_vec(), 3, 5, 2, 3.0);
        assert_eq!(feed.bar(0).unwrap().index, 0);
        assert_eq!(feed.bar(0).unwrap().close, bars[10].close);
    }
}
