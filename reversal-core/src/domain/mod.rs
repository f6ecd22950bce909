//! Domain types: bars, indicator snapshots, positions, trades, instruments.

pub mod bar;
pub mod ids;
pub mod instrument;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::{validate_series, BarError, BarSnapshot, FormingBar};
pub use ids::PositionId;
pub use instrument::{Instrument, InstrumentError};
pub use position::{Position, TradeSide};
pub use signal::{IndicatorSnapshot, TrendDirection};
pub use trade::{ExitReason, TradeRecord};
