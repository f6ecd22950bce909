//! Historical replay: a bar series driven through the strategy runner against
//! the paper broker.
//!
//! Per bar `i`:
//! 1. the broker receives bar `i` as its quote and fires any stops it touches
//! 2. the runner evaluates bar `i - 1` (closed) with bar `i` forming
//! 3. a chart point is recorded for bar `i`

use crate::chart::ChartUpdate;
use crate::paper::PaperBroker;
use reversal_core::domain::{BarError, BarSnapshot, ExitReason, Instrument, Position, TradeRecord};
use reversal_core::engine::{BarReport, RunSummary, StrategyRunner};
use reversal_core::feed::{IndicatorFeed, SeriesFeed};
use reversal_core::strategy::{ConfigError, StrategyConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Bumped when the persisted summary layout changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid strategy configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid bar data: {0}")]
    Bars(#[from] BarError),

    #[error("no bars to replay")]
    Empty,
}

/// Headline numbers of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub schema_version: u32,
    pub symbol: String,
    pub tag: String,
    pub bars: usize,
    pub run: RunSummary,
    pub trades: usize,
    pub winners: usize,
    pub stop_outs: usize,
    pub realized_pnl: f64,
    pub open_positions: usize,
    pub unrealized_pnl: f64,
}

impl ReplaySummary {
    pub fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            0.0
        } else {
            self.winners as f64 / self.trades as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub config: StrategyConfig,
    pub instrument: Instrument,
    pub reports: Vec<BarReport>,
    pub trades: Vec<TradeRecord>,
    /// Positions still open after the last bar.
    pub open_positions: Vec<Position>,
    pub chart: Vec<ChartUpdate>,
    pub summary: ReplaySummary,
}

/// Replay `bars` bar by bar. Bars are re-indexed from 0.
///
/// Bars must be individually sane. Timestamps may repeat, as Renko bricks
/// built from one source bar share its timestamp.
pub fn replay(
    bars: Vec<BarSnapshot>,
    config: &StrategyConfig,
    instrument: &Instrument,
) -> Result<ReplayResult, ReplayError> {
    if bars.is_empty() {
        return Err(ReplayError::Empty);
    }
    config.validate()?;
    for bar in &bars {
        bar.validate()?;
    }

    let feed = SeriesFeed::from_config(bars, config);
    let broker = PaperBroker::new(instrument.symbol.clone());
    let mut runner =
        StrategyRunner::new(config.clone(), instrument, feed, broker.clone(), broker.clone())?;

    let len = runner.feed().len();
    let mut run = RunSummary::default();
    let mut reports = Vec::with_capacity(len);
    let mut chart = Vec::with_capacity(len);

    for index in 0..len {
        let Ok(bar) = runner.feed().bar(index) else {
            break;
        };
        broker.on_quote(&bar);

        let report = runner.on_bar(index);
        run.record(&report);
        if let Some(point) = ChartUpdate::at(runner.feed(), index, report.decision.as_ref()) {
            chart.push(point);
        }
        reports.push(report);
    }

    let trades = broker.trades();
    let open_positions = broker.open_positions();
    let summary = ReplaySummary {
        schema_version: SCHEMA_VERSION,
        symbol: config.symbol.clone(),
        tag: config.tag.clone(),
        bars: len,
        run,
        trades: trades.len(),
        winners: trades.iter().filter(|t| t.is_winner()).count(),
        stop_outs: trades
            .iter()
            .filter(|t| t.exit_reason == ExitReason::StopLoss)
            .count(),
        realized_pnl: trades.iter().map(|t| t.pnl).sum(),
        open_positions: open_positions.len(),
        unrealized_pnl: broker.unrealized_pnl(),
    };

    info!(
        symbol = %summary.symbol,
        bars = summary.bars,
        trades = summary.trades,
        stop_outs = summary.stop_outs,
        realized_pnl = summary.realized_pnl,
        "replay finished"
    );

    Ok(ReplayResult {
        config: config.clone(),
        instrument: instrument.clone(),
        reports,
        trades,
        open_positions,
        chart,
        summary,
    })
}
