//! TrendCast CLI: regional series selection and linear-trend projection.
//!
//! Commands:
//! - `presets`: list the built-in dashboards
//! - `groups`: list the groups of a table with their coverage
//! - `project`: select series, project them, print or save the report

use anyhow::{bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use trendcast_core::holdout::HoldoutConfig;
use trendcast_core::selector::{all_groups, SelectionMode};
use trendcast_core::stats::SeriesSummary;
use trendcast_runner::export::export_json;
use trendcast_runner::{
    load_csv, run_dashboard, save_report, DashboardConfig, DashboardReport, DashboardRequest,
    PipelineError, Preset, SeriesOutcome,
};

#[derive(Parser)]
#[command(
    name = "trendcast",
    about = "TrendCast CLI: select regional series and project their linear trend"
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG still applies.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in dashboard presets.
    Presets,
    /// List the groups of a table with their period coverage.
    Groups {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Select series and project them.
    Project {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Period used to rank --top/--bottom. Defaults to the latest period.
        #[arg(long)]
        ranking_period: Option<i32>,

        /// Observed periods to include before the forecast.
        #[arg(long)]
        tail: Option<usize>,

        /// Number of periods to forecast.
        #[arg(long)]
        horizon: Option<usize>,

        /// Run the hold-out accuracy diagnostic per projected series.
        #[arg(long, default_value_t = false)]
        holdout: bool,

        /// Seed for the hold-out shuffle.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Share of observations held out for testing.
        #[arg(long, default_value_t = 0.2)]
        test_share: f64,

        /// Project series one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Save report.json, points.csv and manifest.json under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full report as JSON instead of a text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Source table (CSV).
    #[arg(long)]
    csv: PathBuf,

    #[command(flatten)]
    dashboard: DashboardArgs,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DashboardArgs {
    /// Built-in preset: growth-rate, per-capita, sector-grdp.
    #[arg(long)]
    preset: Option<String>,

    /// Path to a dashboard TOML config.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl DashboardArgs {
    fn load(&self) -> Result<DashboardConfig> {
        match (&self.preset, &self.config) {
            (Some(name), None) => Ok(Preset::from_name(name)?.config()),
            (None, Some(path)) => Ok(DashboardConfig::from_file(path)?),
            _ => bail!("exactly one of --preset or --config is required"),
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SelectionArgs {
    /// Project the named groups, in the given order.
    #[arg(long, num_args = 1..)]
    select: Vec<String>,

    /// Project the per-period average over all groups.
    #[arg(long)]
    all: bool,

    /// Project the N highest groups at the ranking period.
    #[arg(long)]
    top: Option<usize>,

    /// Project the N lowest groups at the ranking period.
    #[arg(long)]
    bottom: Option<usize>,
}

impl SelectionArgs {
    fn mode(&self) -> SelectionMode {
        if self.all {
            SelectionMode::AggregateAll
        } else if let Some(k) = self.top {
            SelectionMode::TopN(k)
        } else if let Some(k) = self.bottom {
            SelectionMode::BottomN(k)
        } else {
            SelectionMode::Explicit(self.select.clone())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Presets => run_presets(),
        Commands::Groups { source } => run_groups(&source),
        Commands::Project {
            source,
            selection,
            ranking_period,
            tail,
            horizon,
            holdout,
            seed,
            test_share,
            sequential,
            output_dir,
            json,
        } => {
            let mut config = source.dashboard.load()?;
            if let Some(tail) = tail {
                config.projection.history_tail = tail;
            }
            if let Some(horizon) = horizon {
                config.projection.horizon = horizon;
            }
            config.validate()?;

            let holdout = holdout.then_some(HoldoutConfig { test_share, seed });
            let request = DashboardRequest::new(selection.mode(), config.projection_params())
                .with_ranking_period(ranking_period)
                .with_parallelism(!sequential)
                .with_holdout(holdout);

            run_project(&source, &config, &request, output_dir, json)
        }
    }
}

fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn run_presets() -> Result<()> {
    for preset in Preset::ALL {
        let c = preset.config();
        println!("{:<12} {}", c.name, c.title);
        println!(
            "{:<12} group={} period={} value={} unit={}",
            "", c.group_column, c.period_column, c.value_column, c.unit
        );
    }
    Ok(())
}

fn run_groups(source: &SourceArgs) -> Result<()> {
    let config = source.dashboard.load()?;
    let loaded = load_csv(&source.csv, &config)?;
    let groups = all_groups(&loaded.dataset, &config.selector_columns());

    println!("{} groups in {}", groups.len(), source.csv.display());
    for series in &groups {
        match SeriesSummary::of(series) {
            Some(s) => println!(
                "  {:<40} {:>3} obs  {}-{}  last {:.2}",
                s.series, s.count, s.first_period, s.last_period, s.last_value
            ),
            None => println!("  {:<40}   0 obs", series.name()),
        }
    }
    Ok(())
}

fn run_project(
    source: &SourceArgs,
    config: &DashboardConfig,
    request: &DashboardRequest,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let loaded = load_csv(&source.csv, config)?;

    let report = match run_dashboard(&loaded.dataset, config, request) {
        Ok(report) => report,
        Err(PipelineError::EmptySelection) => {
            println!("No series selected; nothing to project.");
            return Ok(());
        }
    };

    if json {
        println!("{}", export_json(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(dir) = output_dir {
        let paths = save_report(&report, &dir, &loaded.fingerprint)?;
        println!(
            "Artifacts saved to: {}",
            paths.manifest.parent().unwrap_or(dir.as_path()).display()
        );
    }

    Ok(())
}

fn print_summary(report: &DashboardReport) {
    println!();
    println!("=== {} ===", report.title);
    if !report.unit.is_empty() {
        println!("Unit:           {}", report.unit);
    }
    if let Some(period) = report.ranking_period {
        println!("Ranked at:      {period}");
    }
    println!(
        "Series:         {} projected, {} skipped",
        report.projected_count(),
        report.projections.skipped().count()
    );

    for entry in &report.projections.entries {
        println!();
        println!("--- {} ---", entry.series);

        if let Some(s) = report.summaries.iter().find(|s| s.series == entry.series) {
            println!(
                "Observed:       {} periods, {}-{}, mean {:.2}, min {:.2}, max {:.2}",
                s.count, s.first_period, s.last_period, s.mean, s.min, s.max
            );
        }
        if let Some(last) = report
            .changes
            .iter()
            .find(|c| c.series == entry.series)
            .and_then(|c| c.changes.last())
        {
            if let Some(change) = last.change {
                println!("Last change:    {change:+.2} ({})", last.period);
            }
        }

        match &entry.outcome {
            SeriesOutcome::Projected(result) => {
                println!(
                    "Trend:          {:+.4} per period (R² {:.3})",
                    result.model.slope, result.model.r_squared
                );
                for p in &result.points {
                    println!("  {:>6}  {:>14.2}  {}", p.period, p.value, p.kind.as_str());
                }
            }
            SeriesOutcome::Skipped { reason } => {
                println!("Skipped:        {reason}");
            }
        }

        if let Some(h) = report.holdout.iter().find(|h| h.series == entry.series) {
            let r2 = h
                .r_squared
                .map(|r| format!("{r:.3}"))
                .unwrap_or_else(|| "n/a".into());
            println!(
                "Hold-out:       {} train / {} test, MAE {:.3}, RMSE {:.3}, R² {}",
                h.n_train, h.n_test, h.mae, h.rmse, r2
            );
        }
    }
}
