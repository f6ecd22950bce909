//! Indicator feed: per-bar market data and indicator values, addressed by bar index.
//!
//! When the strategy is evaluated for bar `N`, index `N-1` is the most recently
//! closed bar and `N` is the bar still forming.

pub mod series;

pub use series::SeriesFeed;

use crate::domain::{BarSnapshot, IndicatorSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FeedError {
    #[error("bar index {index} is outside the feed (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("indicators are not warmed up at bar {index}")]
    NotWarm { index: usize },
}

/// Source of bar and indicator snapshots.
pub trait IndicatorFeed: Send + Sync {
    fn bar(&self, index: usize) -> Result<BarSnapshot, FeedError>;

    /// Indicator values computed at bar `index`. Must carry the same index.
    fn indicators(&self, index: usize) -> Result<IndicatorSnapshot, FeedError>;

    /// Number of bars currently available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
