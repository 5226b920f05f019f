//! Growth sensitivity table for a case
//!
//! Usage: cargo run --bin sensitivity_sweep -- --from -0.03 --to 0.03 --steps 13

use anyhow::Context;
use cashflow_forecast::{
    assumptions::CaseFile,
    projection::ProjectionConfig,
    report::rupiah_millions,
    sensitivity::{shift_grid, sweep},
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "sensitivity_sweep", about = "Project a case under a grid of uniform growth shifts")]
struct Args {
    /// JSON case file (defaults to the built-in café case)
    #[arg(long, env = "FORECAST_CASE")]
    case: Option<PathBuf>,

    /// Lowest monthly growth shift
    #[arg(long, default_value_t = -0.03, allow_hyphen_values = true)]
    from: f64,

    /// Highest monthly growth shift
    #[arg(long, default_value_t = 0.03, allow_hyphen_values = true)]
    to: f64,

    /// Number of grid points
    #[arg(long, default_value_t = 13)]
    steps: usize,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let case = match &args.case {
        Some(path) => CaseFile::from_json_path(path)
            .with_context(|| format!("failed to load case file {}", path.display()))?,
        None => CaseFile::default_cafe(),
    };

    let config = ProjectionConfig {
        projection_months: case.months,
        starting_balance: case.starting_balance,
    };
    let shifts = shift_grid(args.from, args.to, args.steps);

    let start = Instant::now();
    let points = sweep(&case.categories, &config, &shifts).context("sensitivity sweep failed")?;
    log::info!("{} projections in {:?}", points.len(), start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("Sensitivity: {} ({} months)", case.name, case.months);
    println!("{:>8} {:>18} {:>18} {:>18} {:>10}",
        "Shift", "Final Balance", "Min Balance", "Mean Net CF", "Deficit");
    println!("{}", "-".repeat(76));

    for p in &points {
        let deficit = p
            .first_deficit_month
            .map(|m| format!("M{}", m + 1))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>7.2}% {:>18} {:>18} {:>18} {:>10}",
            p.shift * 100.0,
            rupiah_millions(p.final_balance),
            rupiah_millions(p.min_balance),
            rupiah_millions(p.mean_net_cash_flow),
            deficit,
        );
    }

    Ok(())
}
