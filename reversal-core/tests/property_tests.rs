//! Property tests for the decision rule.
//!
//! Uses proptest to verify:
//! 1. Exclusivity: a decision never opens both sides
//! 2. Idempotence: the same inputs always give the same decision
//! 3. Exit independence: exits follow the trend alone
//! 4. Strictness: a long needs every sub-condition strictly
//! 5. Reconciler scope: foreign positions are never touched

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use reversal_core::domain::{
    BarSnapshot, FormingBar, IndicatorSnapshot, Position, PositionId, TradeSide, TrendDirection,
};
use reversal_core::strategy::{
    Action, EntrySignal, ExitSignal, PositionReconciler, SignalEvaluator,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.1000..1.3000_f64).prop_map(|p| (p * 10_000.0).round() / 10_000.0)
}

fn arb_trend() -> impl Strategy<Value = TrendDirection> {
    prop_oneof![Just(TrendDirection::Up), Just(TrendDirection::Down)]
}

fn arb_side() -> impl Strategy<Value = TradeSide> {
    prop_oneof![Just(TradeSide::Long), Just(TradeSide::Short)]
}

/// (closed bar, forming bar) with a sane closed range.
fn arb_bars() -> impl Strategy<Value = (BarSnapshot, FormingBar)> {
    (arb_price(), arb_price(), arb_price(), arb_price()).prop_map(|(a, b, open, close)| {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let mid = (low + high) / 2.0;
        let closed = BarSnapshot {
            index: 10,
            timestamp: Utc.with_ymd_and_hms(2025, 10, 7, 0, 10, 0).unwrap(),
            open: mid,
            high,
            low,
            close: mid,
        };
        (closed, FormingBar { index: 11, open, close })
    })
}

fn arb_snapshot() -> impl Strategy<Value = IndicatorSnapshot> {
    (arb_trend(), arb_price(), arb_price()).prop_map(|(trend, fast, slow)| IndicatorSnapshot {
        index: 10,
        trend,
        fast_average: fast,
        slow_average: slow,
    })
}

fn position(id: u64, side: TradeSide, tag: &str, symbol: &str) -> Position {
    Position {
        id: PositionId(id),
        symbol: symbol.into(),
        tag: tag.into(),
        side,
        volume: 10_000.0,
        entry_price: 1.2,
        stop_loss_distance: 0.0005,
        opened_at_bar: 0,
    }
}

proptest! {
    #[test]
    fn entry_matches_trend_side((prev, cur) in arb_bars(), ind in arb_snapshot()) {
        let d = SignalEvaluator::new().evaluate(&prev, &cur, &ind).unwrap();
        match d.entry {
            EntrySignal::OpenLong => prop_assert_eq!(ind.trend, TrendDirection::Up),
            EntrySignal::OpenShort => prop_assert_eq!(ind.trend, TrendDirection::Down),
            EntrySignal::NoNewEntry => {}
        }
    }

    #[test]
    fn evaluation_is_idempotent((prev, cur) in arb_bars(), ind in arb_snapshot()) {
        let evaluator = SignalEvaluator::new();
        let first = evaluator.evaluate(&prev, &cur, &ind).unwrap();
        let second = evaluator.evaluate(&prev, &cur, &ind).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Swapping the averages between bullish and bearish order never changes the exit.
    #[test]
    fn exit_ignores_averages(
        (prev, cur) in arb_bars(),
        trend in arb_trend(),
        a in arb_price(),
        b in arb_price(),
    ) {
        let evaluator = SignalEvaluator::new();
        let bullish = IndicatorSnapshot { index: 10, trend, fast_average: a.max(b), slow_average: a.min(b) };
        let bearish = IndicatorSnapshot { index: 10, trend, fast_average: a.min(b), slow_average: a.max(b) };
        let d1 = evaluator.evaluate(&prev, &cur, &bullish).unwrap();
        let d2 = evaluator.evaluate(&prev, &cur, &bearish).unwrap();
        prop_assert_eq!(d1.exit, d2.exit);
        prop_assert_eq!(d1.exit, ExitSignal::from_trend(trend));
    }

    #[test]
    fn long_requires_every_condition_strictly((prev, cur) in arb_bars(), ind in arb_snapshot()) {
        let d = SignalEvaluator::new().evaluate(&prev, &cur, &ind).unwrap();
        let expected = ind.trend == TrendDirection::Up
            && ind.fast_average > ind.slow_average
            && prev.low < ind.slow_average
            && cur.close > cur.open;
        prop_assert_eq!(d.entry == EntrySignal::OpenLong, expected);
    }

    #[test]
    fn short_requires_every_condition_strictly((prev, cur) in arb_bars(), ind in arb_snapshot()) {
        let d = SignalEvaluator::new().evaluate(&prev, &cur, &ind).unwrap();
        let expected = ind.trend == TrendDirection::Down
            && ind.fast_average < ind.slow_average
            && prev.high > ind.slow_average
            && cur.close < cur.open;
        prop_assert_eq!(d.entry == EntrySignal::OpenShort, expected);
    }

    #[test]
    fn reconciler_never_touches_foreign_positions(
        (prev, cur) in arb_bars(),
        ind in arb_snapshot(),
        sides in proptest::collection::vec(arb_side(), 0..6),
    ) {
        let d = SignalEvaluator::new().evaluate(&prev, &cur, &ind).unwrap();
        let mut positions = Vec::new();
        for (i, side) in sides.iter().enumerate() {
            let (tag, symbol) = match i % 3 {
                0 => ("rev", "EURUSD"),
                1 => ("other", "EURUSD"),
                _ => ("rev", "GBPUSD"),
            };
            positions.push(position(i as u64, *side, tag, symbol));
        }
        let actions = PositionReconciler::new("rev", "EURUSD", 10_000.0, 0.0005)
            .reconcile(&d, &positions);

        let mut seen_open = false;
        for action in &actions {
            match action {
                Action::ClosePosition { position } => {
                    prop_assert!(!seen_open, "close after open");
                    prop_assert!(position.belongs_to("rev", "EURUSD"));
                    prop_assert!(d.exit.closes(position.side));
                }
                Action::OpenPosition { .. } => {
                    prop_assert!(!seen_open, "more than one open");
                    seen_open = true;
                }
            }
        }
    }
}
