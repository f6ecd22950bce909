//! Per-bar driver: feed → evaluator → reconciler → gateway.
//!
//! On each bar the runner reads the bar that just closed, the bar now forming
//! and the indicator snapshot of the closed bar. It asks the evaluator for a
//! decision, lists the strategy's tagged positions, reconciles, then executes
//! closes before the open. A failed action is reported and never retried
//! within the same bar.

use super::warmup::WarmupState;
use crate::domain::{Instrument, PositionId};
use crate::feed::{FeedError, IndicatorFeed};
use crate::gateway::{ExecutionError, ExecutionGateway, OpenRequest, PositionStore};
use crate::strategy::{
    Action, ConfigError, Decision, EvaluationError, PositionReconciler, SignalEvaluator,
    StrategyConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Why a bar produced no decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Bar 0 has no closed predecessor.
    NoClosedBar,
    NotWarm { bars_until_warm: usize },
    Feed(FeedError),
    Evaluation(EvaluationError),
}

/// Result of handing one action to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: Action,
    /// Id assigned by the gateway to a newly opened position.
    pub opened: Option<PositionId>,
    pub error: Option<ExecutionError>,
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened on one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarReport {
    pub index: usize,
    pub decision: Option<Decision>,
    pub outcomes: Vec<ActionOutcome>,
    pub skipped: Option<SkipReason>,
}

impl BarReport {
    fn skipped(index: usize, reason: SkipReason) -> Self {
        Self {
            index,
            decision: None,
            outcomes: Vec::new(),
            skipped: Some(reason),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.outcomes.iter().map(|o| &o.action)
    }

    pub fn opened(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.outcomes.iter().filter_map(|o| o.opened)
    }

    pub fn closes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action.is_close() && o.succeeded())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub bars_evaluated: usize,
    pub bars_skipped: usize,
    pub opens: usize,
    pub closes: usize,
    pub execution_failures: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &BarReport) {
        if report.is_skipped() {
            self.bars_skipped += 1;
            return;
        }
        self.bars_evaluated += 1;
        self.opens += report.opened().count();
        self.closes += report.closes();
        self.execution_failures += report.failures().count();
    }
}

/// Owns the collaborators for one strategy instance.
pub struct StrategyRunner<F, S, G> {
    config: StrategyConfig,
    evaluator: SignalEvaluator,
    reconciler: PositionReconciler,
    warmup: WarmupState,
    feed: F,
    store: S,
    gateway: G,
}

impl<F, S, G> StrategyRunner<F, S, G>
where
    F: IndicatorFeed,
    S: PositionStore,
    G: ExecutionGateway,
{
    pub fn new(
        config: StrategyConfig,
        instrument: &Instrument,
        feed: F,
        store: S,
        gateway: G,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if instrument.symbol != config.symbol {
            return Err(ConfigError::InstrumentMismatch {
                strategy: config.symbol.clone(),
                instrument: instrument.symbol.clone(),
            });
        }
        Ok(Self {
            evaluator: SignalEvaluator::new(),
            reconciler: PositionReconciler::from_config(&config, instrument),
            warmup: WarmupState::new(config.warmup_bars()),
            config,
            feed,
            store,
            gateway,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handle the bar at `index` opening. Bar `index - 1` has just closed.
    pub fn on_bar(&mut self, index: usize) -> BarReport {
        if index == 0 {
            return BarReport::skipped(index, SkipReason::NoClosedBar);
        }

        self.warmup.observe(index);
        if !self.warmup.is_warm() {
            let bars_until_warm = self.warmup.bars_until_warm();
            debug!(bar = index, bars_until_warm, "warming up");
            return BarReport::skipped(index, SkipReason::NotWarm { bars_until_warm });
        }

        let decision = match self.decide(index) {
            Ok(decision) => decision,
            Err(reason) => return BarReport::skipped(index, reason),
        };

        let positions = self
            .store
            .list_positions(&self.config.tag, &self.config.symbol);
        let actions = self.reconciler.reconcile(&decision, &positions);
        debug!(
            bar = index,
            entry = ?decision.entry,
            exit = ?decision.exit,
            open_positions = positions.len(),
            actions = actions.len(),
            "evaluated"
        );

        let outcomes = actions
            .into_iter()
            .map(|action| self.execute(index, action))
            .collect();

        BarReport {
            index,
            decision: Some(decision),
            outcomes,
            skipped: None,
        }
    }

    /// Walk every bar the feed holds, in order.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        for index in 0..self.feed.len() {
            let report = self.on_bar(index);
            summary.record(&report);
        }
        info!(
            bars_evaluated = summary.bars_evaluated,
            bars_skipped = summary.bars_skipped,
            opens = summary.opens,
            closes = summary.closes,
            execution_failures = summary.execution_failures,
            "run finished"
        );
        summary
    }

    fn decide(&self, index: usize) -> Result<Decision, SkipReason> {
        let closed = index - 1;
        let previous = self.feed.bar(closed).map_err(|e| self.feed_skip(index, e))?;
        let current = self
            .feed
            .bar(index)
            .map_err(|e| self.feed_skip(index, e))?
            .forming();
        let indicators = self
            .feed
            .indicators(closed)
            .map_err(|e| self.feed_skip(index, e))?;

        self.evaluator
            .evaluate(&previous, &current, &indicators)
            .map_err(|e| {
                warn!(bar = index, error = %e, "skipping bar");
                SkipReason::Evaluation(e)
            })
    }

    fn feed_skip(&self, index: usize, err: FeedError) -> SkipReason {
        match err {
            FeedError::NotWarm { .. } => debug!(bar = index, error = %err, "indicators not ready"),
            FeedError::OutOfRange { .. } => warn!(bar = index, error = %err, "feed lookup failed"),
        }
        SkipReason::Feed(err)
    }

    fn execute(&self, index: usize, action: Action) -> ActionOutcome {
        match &action {
            Action::ClosePosition { position } => {
                match self.gateway.close_position(position.id) {
                    Ok(()) => {
                        info!(
                            bar = index,
                            position = %position.id,
                            side = %position.side,
                            "closed position"
                        );
                        ActionOutcome {
                            action,
                            opened: None,
                            error: None,
                        }
                    }
                    Err(e) => {
                        error!(bar = index, position = %position.id, error = %e, "close failed");
                        ActionOutcome {
                            action,
                            opened: None,
                            error: Some(e),
                        }
                    }
                }
            }
            Action::OpenPosition {
                side,
                volume,
                stop_loss_distance,
            } => {
                let request = OpenRequest {
                    side: *side,
                    symbol: self.config.symbol.clone(),
                    volume: *volume,
                    stop_loss_distance: *stop_loss_distance,
                    tag: self.config.tag.clone(),
                };
                match self.gateway.open_position(&request) {
                    Ok(id) => {
                        info!(
                            bar = index,
                            position = %id,
                            side = %side,
                            volume,
                            "opened position"
                        );
                        ActionOutcome {
                            action,
                            opened: Some(id),
                            error: None,
                        }
                    }
                    Err(e) => {
                        error!(bar = index, side = %side, error = %e, "open failed");
                        ActionOutcome {
                            action,
                            opened: None,
                            error: Some(e),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BarSnapshot, IndicatorSnapshot, Position, TradeSide, TrendDirection};
    use crate::indicators::make_ohlc_bars;
    use std::sync::Mutex;

    struct FixedFeed {
        bars: Vec<BarSnapshot>,
        snapshots: Vec<IndicatorSnapshot>,
    }

    impl IndicatorFeed for FixedFeed {
        fn bar(&self, index: usize) -> Result<BarSnapshot, FeedError> {
            self.bars.get(index).copied().ok_or(FeedError::OutOfRange {
                index,
                len: self.bars.len(),
            })
        }

        fn indicators(&self, index: usize) -> Result<IndicatorSnapshot, FeedError> {
            self.snapshots
                .get(index)
                .copied()
                .ok_or(FeedError::NotWarm { index })
        }

        fn len(&self) -> usize {
            self.bars.len()
        }
    }

    #[derive(Default)]
    struct Recorder {
        positions: Mutex<Vec<Position>>,
        opened: Mutex<Vec<OpenRequest>>,
        closed: Mutex<Vec<PositionId>>,
    }

    impl PositionStore for &Recorder {
        fn list_positions(&self, _tag: &str, _symbol: &str) -> Vec<Position> {
            self.positions.lock().unwrap().clone()
        }
    }

    impl ExecutionGateway for &Recorder {
        fn open_position(&self, request: &OpenRequest) -> Result<PositionId, ExecutionError> {
            let mut opened = self.opened.lock().unwrap();
            opened.push(request.clone());
            Ok(PositionId(opened.len() as u64))
        }

        fn close_position(&self, id: PositionId) -> Result<(), ExecutionError> {
            self.closed.lock().unwrap().push(id);
            Ok(())
        }
    }

    fn config() -> StrategyConfig {
        StrategyConfig {
            fast_period: 1,
            slow_period: 2,
            ..Default::default()
        }
    }

    /// Bar 2 pulls back below the slow average in an uptrend; bar 3 forms bullish.
    /// Bar 2 itself forms bearish, so only bar 3 opens.
    fn long_setup() -> FixedFeed {
        let bars = make_ohlc_bars(&[
            (1.2000, 1.2010, 1.1995, 1.2005),
            (1.2005, 1.2020, 1.2000, 1.2015),
            (1.2070, 1.2090, 1.2040, 1.2060),
            (1.2080, 1.2100, 1.2075, 1.2095),
        ]);
        let snapshots = (0..4)
            .map(|index| IndicatorSnapshot {
                index,
                trend: TrendDirection::Up,
                fast_average: 1.2100,
                slow_average: 1.2050,
            })
            .collect();
        FixedFeed { bars, snapshots }
    }

    #[test]
    fn first_bar_has_nothing_to_evaluate() {
        let rec = Recorder::default();
        let mut runner =
            StrategyRunner::new(config(), &Instrument::fx_major("EURUSD"), long_setup(), &rec, &rec)
                .unwrap();
        assert_eq!(runner.on_bar(0).skipped, Some(SkipReason::NoClosedBar));
    }

    #[test]
    fn skips_until_warm() {
        let rec = Recorder::default();
        let mut runner =
            StrategyRunner::new(config(), &Instrument::fx_major("EURUSD"), long_setup(), &rec, &rec)
                .unwrap();
        let report = runner.on_bar(1);
        assert_eq!(
            report.skipped,
            Some(SkipReason::NotWarm { bars_until_warm: 1 })
        );
        assert!(rec.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn opens_tagged_long_with_stop() {
        let rec = Recorder::default();
        let mut runner =
            StrategyRunner::new(config(), &Instrument::fx_major("EURUSD"), long_setup(), &rec, &rec)
                .unwrap();
        let report = runner.on_bar(3);
        assert_eq!(report.opened().collect::<Vec<_>>(), vec![PositionId(1)]);

        let opened = rec.opened.lock().unwrap();
        assert_eq!(opened[0].side, TradeSide::Long);
        assert_eq!(opened[0].tag, "EMA_Reversal_Supertrend");
        assert_eq!(opened[0].symbol, "EURUSD");
        assert!((opened[0].stop_loss_distance - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn rejects_instrument_for_another_symbol() {
        let rec = Recorder::default();
        let result = StrategyRunner::new(
            config(),
            &Instrument::fx_major("GBPUSD"),
            long_setup(),
            &rec,
            &rec,
        );
        assert!(matches!(result, Err(ConfigError::InstrumentMismatch { .. })));
    }

    #[test]
    fn summary_counts_skips_and_opens() {
        let rec = Recorder::default();
        let mut runner =
            StrategyRunner::new(config(), &Instrument::fx_major("EURUSD"), long_setup(), &rec, &rec)
                .unwrap();
        let summary = runner.run();
        assert_eq!(summary.bars_skipped, 2);
        assert_eq!(summary.bars_evaluated, 2);
        assert_eq!(summary.opens, 1);
    }
}
