//! Per-bar chart stream records.
//!
//! One `ChartUpdate` per bar, shaped like the live display message
//! `{timestamp, price, ema100, ema300, supertrend, signal}`. The field names
//! are fixed by the display; they carry the configured fast/slow averages
//! whatever their periods. Values still warming up serialize as `null`.

use chrono::{DateTime, Utc};
use reversal_core::feed::{IndicatorFeed, SeriesFeed};
use reversal_core::strategy::{Decision, EntrySignal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChartSignal {
    Buy,
    Sell,
    Hold,
}

impl ChartSignal {
    /// Entry side of the bar's decision. Skipped bars and exits are `Hold`.
    pub fn from_decision(decision: Option<&Decision>) -> Self {
        match decision.map(|d| d.entry) {
            Some(EntrySignal::OpenLong) => ChartSignal::Buy,
            Some(EntrySignal::OpenShort) => ChartSignal::Sell,
            Some(EntrySignal::NoNewEntry) | None => ChartSignal::Hold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartUpdate {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub ema100: Option<f64>,
    pub ema300: Option<f64>,
    pub supertrend: Option<f64>,
    pub signal: ChartSignal,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl ChartUpdate {
    /// Chart point for bar `index` of `feed`, or `None` past the end.
    pub fn at(feed: &SeriesFeed, index: usize, decision: Option<&Decision>) -> Option<Self> {
        let bar = feed.bar(index).ok()?;
        Some(Self {
            timestamp: bar.timestamp,
            price: bar.close,
            ema100: finite(feed.fast_average(index)),
            ema300: finite(feed.slow_average(index)),
            supertrend: finite(feed.trend_band(index)),
            signal: ChartSignal::from_decision(decision),
        })
    }
}
