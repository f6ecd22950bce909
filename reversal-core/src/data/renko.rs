//! Fixed-size Renko bricks built from bar closes.

use crate::domain::BarSnapshot;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenkoError {
    #[error("brick size {0} must be a positive finite number")]
    InvalidBrickSize(f64),

    #[error("bar {index} has non-finite close {close}")]
    NonFiniteClose { index: usize, close: f64 },

    #[error("bar {index} moves {bricks} bricks at once (limit {})", MAX_BRICKS_PER_BAR)]
    TooManyBricks { index: usize, bricks: f64 },
}

/// Most bricks a single source bar may produce.
pub const MAX_BRICKS_PER_BAR: f64 = 10_000.0;

/// Convert a bar series into Renko bricks of exactly `brick_size`.
///
/// The first close anchors the chart. Each later close emits as many bricks as
/// it has travelled whole brick sizes away from the last brick close, each
/// stamped with the source bar's timestamp. Bricks open at the previous brick
/// close, so high/low are just the body. Bricks are indexed from 0.
///
/// NaN closes are skipped. An infinite close, or a move of more than
/// [`MAX_BRICKS_PER_BAR`] bricks from one bar, is an error.
pub fn build_renko(bars: &[BarSnapshot], brick_size: f64) -> Result<Vec<BarSnapshot>, RenkoError> {
    if !(brick_size > 0.0) || !brick_size.is_finite() {
        return Err(RenkoError::InvalidBrickSize(brick_size));
    }

    let mut bricks = Vec::new();
    let Some(first) = bars.iter().find(|b| b.close.is_finite()) else {
        return Ok(bricks);
    };
    let mut last_close = first.close;

    for bar in bars.iter().filter(|b| !b.close.is_nan()) {
        if bar.close.is_infinite() {
            return Err(RenkoError::NonFiniteClose {
                index: bar.index,
                close: bar.close,
            });
        }
        let bricks_due = ((bar.close - last_close) / brick_size).abs().floor();
        if bricks_due > MAX_BRICKS_PER_BAR {
            return Err(RenkoError::TooManyBricks {
                index: bar.index,
                bricks: bricks_due,
            });
        }
        let mut emitted = 0.0;
        while emitted <= bricks_due && (bar.close - last_close).abs() >= brick_size {
            let direction = if bar.close > last_close { 1.0 } else { -1.0 };
            let close = last_close + direction * brick_size;
            bricks.push(BarSnapshot {
                index: bricks.len(),
                timestamp: bar.timestamp,
                open: last_close,
                high: last_close.max(close),
                low: last_close.min(close),
                close,
            });
            last_close = close;
            emitted += 1.0;
        }
    }

    debug!(bars = bars.len(), bricks = bricks.len(), brick_size, "built renko bricks");
    Ok(bricks)
}
