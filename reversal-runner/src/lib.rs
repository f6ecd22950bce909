//! Reversal Runner: replay the reversal strategy over historical bars.
//!
//! This crate builds on `reversal-core` to provide:
//! - TOML replay configuration
//! - An in-memory paper broker with stop-loss handling and a trade tape
//! - The bar-by-bar replay driver
//! - Chart stream records and artifact export

pub mod chart;
pub mod config;
pub mod export;
pub mod paper;
pub mod replay;

pub use chart::{ChartSignal, ChartUpdate};
pub use config::{load_config, ReplayConfig};
pub use export::{
    export_chart_jsonl, export_summary_json, export_trades_csv, generate_report, load_summary,
    save_artifacts,
};
pub use paper::PaperBroker;
pub use replay::{replay, ReplayError, ReplayResult, ReplaySummary};
