//! Reversal CLI: replay and synthetic data commands.
//!
//! Commands:
//! - `replay`: run the EMA/Supertrend reversal strategy over a bar CSV
//! - `generate`: write a seeded random-walk bar CSV

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reversal_core::data::{build_renko, load_bars_csv, write_bars_csv, SyntheticBars};
use reversal_runner::{load_config, replay, save_artifacts, ReplayConfig, ReplayResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "reversal",
    about = "EMA/Supertrend reversal strategy: historical replay and data tools"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the strategy over a Date,Open,High,Low,Close CSV.
    Replay {
        /// Bar data file.
        #[arg(long)]
        csv: PathBuf,

        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replay on Renko bricks of this price size.
        #[arg(long)]
        renko_brick: Option<f64>,

        #[arg(long)]
        symbol: Option<String>,

        /// Fast EMA period.
        #[arg(long)]
        fast: Option<usize>,

        /// Slow EMA period.
        #[arg(long)]
        slow: Option<usize>,

        /// Where to write summary.json, trades.csv, chart.jsonl and report.md.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Write synthetic minute bars to a CSV file.
    Generate {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 3000)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs);

    match cli.command {
        Commands::Replay {
            csv,
            config,
            renko_brick,
            symbol,
            fast,
            slow,
            output_dir,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)?,
                None => ReplayConfig::default(),
            };
            if let Some(brick) = renko_brick {
                cfg.renko_brick = Some(brick);
            }
            if let Some(symbol) = symbol {
                cfg.strategy.symbol = symbol;
            }
            if let Some(fast) = fast {
                cfg.strategy.fast_period = fast;
            }
            if let Some(slow) = slow {
                cfg.strategy.slow_period = slow;
            }
            cfg.validate().context("invalid settings after applying flags")?;
            run_replay(&csv, &cfg, &output_dir)
        }
        Commands::Generate { out, bars, seed } => run_generate(&out, bars, seed),
    }
}

fn run_replay(csv: &Path, cfg: &ReplayConfig, output_dir: &Path) -> Result<()> {
    let mut bars =
        load_bars_csv(csv).with_context(|| format!("failed to load bars from {}", csv.display()))?;
    info!(bars = bars.len(), path = %csv.display(), "loaded bars");

    if let Some(brick) = cfg.renko_brick {
        bars = build_renko(&bars, brick)?;
        info!(bricks = bars.len(), brick, "built renko bricks");
    }

    let instrument = cfg.instrument()?;
    let result = replay(bars, &cfg.strategy, &instrument)?;
    print_summary(&result);

    let run_dir = save_artifacts(&result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn run_generate(out: &Path, count: usize, seed: u64) -> Result<()> {
    let bars = SyntheticBars::with_seed(seed).generate(count);
    let file = File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    write_bars_csv(BufWriter::new(file), &bars)?;
    info!(bars = count, seed, path = %out.display(), "wrote synthetic bars");
    Ok(())
}

fn print_summary(result: &ReplayResult) {
    let s = &result.summary;
    println!("Symbol:         {} ({})", s.symbol, s.tag);
    println!(
        "Bars:           {} ({} evaluated, {} skipped)",
        s.bars, s.run.bars_evaluated, s.run.bars_skipped
    );
    println!(
        "Trades:         {} ({} winners, {} stop-outs)",
        s.trades, s.winners, s.stop_outs
    );
    println!("Win rate:       {:.1}%", s.win_rate() * 100.0);
    println!("Realized P&L:   {:.2}", s.realized_pnl);
    println!(
        "Open positions: {} ({:.2} unrealized)",
        s.open_positions, s.unrealized_pnl
    );
    if s.run.execution_failures > 0 {
        println!("Failed orders:  {}", s.run.execution_failures);
    }
}
