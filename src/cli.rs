//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{parse_dd_recover, validate_run_config};
use crate::domain::error::VolguardError;
use crate::domain::frame::DailyFrame;
use crate::domain::plan::{build_execution_plan, ExecutionPlan, VolCapMode};
use crate::domain::risk::{apply_risk, RiskConfig, RiskOutput};
use crate::domain::stats::{annualize, rolling_vol};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Window for the per-ticker vol snapshots handed to the planner.
const SNAPSHOT_VOL_WINDOW: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "volguard", about = "Portfolio risk overlay and execution gating")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the risk overlay over a full history and write audit + plan artifacts
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the [report] out_dir from the config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build only the as-of execution plan (decision time, no audit artifact)
    Plan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, output } => run_pipeline(&config, output.as_ref(), true),
        Command::Plan { config, output } => run_pipeline(&config, output.as_ref(), false),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = VolguardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config OK: {}", config_path.display());
    ExitCode::SUCCESS
}

fn run_pipeline(config_path: &PathBuf, output: Option<&PathBuf>, write_audit: bool) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match run_pipeline_inner(&adapter, output, write_audit) {
        Ok(plan) => {
            eprintln!(
                "Plan as of {}: scale={:.2}, gross={:.2}, cash={:.2}",
                plan.as_of, plan.scale, plan.gross_exposure, plan.cash_weight
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_pipeline_inner(
    adapter: &FileConfigAdapter,
    output: Option<&PathBuf>,
    write_audit: bool,
) -> Result<ExecutionPlan, VolguardError> {
    // Stage 2: Load input frames
    let data_port = build_data_port(adapter)?;
    let prices = data_port.load_frame("prices")?;
    let weights = data_port.load_frame("weights")?;
    eprintln!(
        "Loaded {} days x {} tickers",
        prices.len(),
        prices.tickers.len()
    );
    if prices.is_empty() {
        return Err(VolguardError::Data {
            reason: "price frame is empty".into(),
        });
    }
    let returns = prices.to_returns();

    // Stage 3: Risk overlay
    let risk_cfg = build_risk_config(adapter)?;
    let cost_bps = adapter.get_double("costs", "transaction_cost_bps", 0.0);
    let out = apply_risk(&weights, &returns, cost_bps, &risk_cfg)?;
    eprintln!(
        "Risk overlay done: {} audit rows, {} killed",
        out.audit.len(),
        out.audit.iter().filter(|r| r.killed).count()
    );

    // Stage 4: As-of execution plan from the last audit row
    let plan = build_plan_for_last_day(adapter, &weights, &returns, &out);

    // Stage 5: Persist artifacts
    let out_dir = output.cloned().unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("report", "out_dir")
                .unwrap_or_else(|| "reports".to_string()),
        )
    });
    let name = adapter
        .get_string("report", "name")
        .unwrap_or_else(|| "run".to_string());
    let report = JsonReportAdapter::new(out_dir.clone());
    if write_audit {
        report.write_audit(&out.audit, &name)?;
    }
    report.write_plan(&plan, &name)?;
    eprintln!("Artifacts written to {}", out_dir.display());

    Ok(plan)
}

fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvAdapter, VolguardError> {
    let mut port = CsvAdapter::new();
    for key in ["prices", "weights"] {
        let path = adapter
            .get_string("data", key)
            .ok_or_else(|| VolguardError::ConfigMissing {
                section: "data".to_string(),
                key: key.to_string(),
            })?;
        port = port.with_file(key, PathBuf::from(path));
    }
    Ok(port)
}

pub fn build_risk_config(adapter: &FileConfigAdapter) -> Result<RiskConfig, VolguardError> {
    let dd_recover = parse_dd_recover(adapter)?;
    RiskConfig::new(
        adapter.get_double("risk", "target_vol_ann", 0.12),
        adapter.get_int("risk", "vol_lookback", 20).max(0) as usize,
        adapter.get_double("risk", "max_leverage", 1.0),
        adapter.get_double("risk", "dd_kill", 0.20),
        dd_recover,
    )
}

fn build_plan_for_last_day(
    adapter: &dyn ConfigPort,
    weights: &DailyFrame,
    returns: &DailyFrame,
    out: &RiskOutput,
) -> ExecutionPlan {
    let last = weights.len() - 1;
    let as_of = weights.dates[last];
    let proposed: Vec<(String, f64)> = weights
        .tickers
        .iter()
        .cloned()
        .zip(weights.row(last).iter().copied())
        .collect();

    let snapshots = vol_snapshots(returns);
    let max_ticker_vol_ann = adapter.get_double("plan", "max_ticker_vol_ann", 0.35);
    let mode = adapter
        .get_string("plan", "vol_cap_mode")
        .and_then(|s| VolCapMode::parse(&s))
        .unwrap_or(VolCapMode::Scale);

    build_execution_plan(
        as_of,
        &proposed,
        out.audit.last(),
        Some(&snapshots),
        max_ticker_vol_ann,
        mode,
    )
}

/// Latest 20-day annualized vol per ticker; tickers still in warm-up are
/// omitted (the planner skips the cap for them).
fn vol_snapshots(returns: &DailyFrame) -> HashMap<String, f64> {
    let mut snaps = HashMap::new();
    for ticker in &returns.tickers {
        let Some(series) = returns.column(ticker) else {
            continue;
        };
        if let Some(Some(vol)) = rolling_vol(&series, SNAPSHOT_VOL_WINDOW).last() {
            snaps.insert(ticker.clone(), annualize(*vol));
        }
    }
    snaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_skip_warmup_tickers() {
        let dates: Vec<chrono::NaiveDate> = (0..5)
            .map(|i| chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i))
            .collect();
        let frame = DailyFrame::new(
            dates,
            vec!["AAA".into()],
            vec![vec![0.01], vec![-0.02], vec![0.00], vec![0.01], vec![0.02]],
        )
        .unwrap();
        assert!(vol_snapshots(&frame).is_empty());
    }

    #[test]
    fn snapshots_annualize_latest_window() {
        let n = 30;
        let dates: Vec<chrono::NaiveDate> = (0..n)
            .map(|i| {
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
            })
            .collect();
        let rets: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![if i % 2 == 0 { 0.01 } else { -0.01 }])
            .collect();
        let frame = DailyFrame::new(dates, vec!["AAA".into()], rets).unwrap();

        let snaps = vol_snapshots(&frame);
        let vol = snaps["AAA"];
        assert!((vol - annualize(0.01)).abs() < 1e-12);
    }

    #[test]
    fn risk_config_from_ini() {
        let adapter = FileConfigAdapter::from_string(
            "[risk]\ntarget_vol_ann = 0.15\nvol_lookback = 10\ndd_kill = 0.30\ndd_recover = 0.10\n",
        )
        .unwrap();
        let cfg = build_risk_config(&adapter).unwrap();
        assert_eq!(cfg.target_vol_ann, 0.15);
        assert_eq!(cfg.vol_lookback, 10);
        assert_eq!(cfg.max_leverage, 1.0);
        assert_eq!(cfg.dd_recover, Some(0.10));
    }
}
