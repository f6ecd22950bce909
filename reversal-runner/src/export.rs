//! Replay artifacts: summary JSON, trade tape CSV, chart stream JSON lines
//! and a short Markdown report.
//!
//! The summary carries a `schema_version`; unknown versions are rejected on load.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reversal_core::domain::TradeRecord;

use crate::chart::ChartUpdate;
use crate::replay::{ReplayResult, ReplaySummary, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_summary_json(summary: &ReplaySummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize replay summary")
}

/// Parse a summary, rejecting schema versions newer than this build.
pub fn import_summary_json(json: &str) -> Result<ReplaySummary> {
    let summary: ReplaySummary =
        serde_json::from_str(json).context("failed to deserialize replay summary")?;
    if summary.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            summary.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(summary)
}

/// One JSON object per line, in bar order.
pub fn export_chart_jsonl(chart: &[ChartUpdate]) -> Result<String> {
    let mut out = String::with_capacity(chart.len() * 128);
    for point in chart {
        out.push_str(&serde_json::to_string(point).context("failed to serialize chart update")?);
        out.push('\n');
    }
    Ok(out)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: position_id, symbol, tag, side, entry_bar, entry_time,
/// entry_price, exit_bar, exit_time, exit_price, volume, pnl, bars_held,
/// exit_reason
pub fn export_trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "position_id",
        "symbol",
        "tag",
        "side",
        "entry_bar",
        "entry_time",
        "entry_price",
        "exit_bar",
        "exit_time",
        "exit_price",
        "volume",
        "pnl",
        "bars_held",
        "exit_reason",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.position_id.0.to_string(),
            &t.symbol,
            &t.tag,
            &t.side.to_string(),
            &t.entry_bar.to_string(),
            &t.entry_time.to_rfc3339(),
            &format!("{:.5}", t.entry_price),
            &t.exit_bar.to_string(),
            &t.exit_time.to_rfc3339(),
            &format!("{:.5}", t.exit_price),
            &format!("{:.2}", t.volume),
            &format!("{:.2}", t.pnl),
            &t.bars_held().to_string(),
            &format!("{:?}", t.exit_reason),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

pub fn generate_report(result: &ReplayResult) -> String {
    let s = &result.summary;
    let cfg = &result.config;
    let mut md = String::with_capacity(1024);

    md.push_str("# Replay Report\n\n");
    md.push_str("| Field | Value |\n| --- | --- |\n");
    let _ = writeln!(md, "| Symbol | {} |", s.symbol);
    let _ = writeln!(md, "| Tag | {} |", s.tag);
    let _ = writeln!(
        md,
        "| Averages | EMA {} / EMA {} |",
        cfg.fast_period, cfg.slow_period
    );
    let _ = writeln!(
        md,
        "| Supertrend | {} x {} |",
        cfg.trend_period, cfg.trend_multiplier
    );
    let _ = writeln!(
        md,
        "| Bars | {} ({} evaluated, {} skipped) |",
        s.bars, s.run.bars_evaluated, s.run.bars_skipped
    );
    let _ = writeln!(md, "| Trades | {} ({} stop-outs) |", s.trades, s.stop_outs);
    let _ = writeln!(md, "| Win rate | {:.1}% |", s.win_rate() * 100.0);
    let _ = writeln!(md, "| Realized P&L | {:.2} |", s.realized_pnl);
    let _ = writeln!(
        md,
        "| Open at end | {} ({:.2} unrealized) |",
        s.open_positions, s.unrealized_pnl
    );
    if s.run.execution_failures > 0 {
        let _ = writeln!(md, "| Execution failures | **{}** |", s.run.execution_failures);
    }
    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write the full artifact set for one replay.
///
/// Creates `{symbol}_{timestamp}/` under `output_dir` containing
/// `summary.json`, `trades.csv`, `chart.jsonl` and `report.md`, and returns
/// its path.
pub fn save_artifacts(result: &ReplayResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.summary.symbol,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write_file(&run_dir.join("summary.json"), &export_summary_json(&result.summary)?)?;
    write_file(&run_dir.join("trades.csv"), &export_trades_csv(&result.trades)?)?;
    write_file(&run_dir.join("chart.jsonl"), &export_chart_jsonl(&result.chart)?)?;
    write_file(&run_dir.join("report.md"), &generate_report(result))?;

    Ok(run_dir)
}

/// Load the summary from an artifact directory.
pub fn load_summary(dir: &Path) -> Result<ReplaySummary> {
    let path = dir.join("summary.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_summary_json(&json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
