//! Cash-flow forecast CLI
//!
//! Runs every scenario of a case, prints the analysis report and writes the
//! CSV exports. Pass --json for a machine-readable report on stdout.

use anyhow::Context;
use cashflow_forecast::{
    assumptions::CaseFile,
    model::load_categories,
    report::{
        self, month_label, percent, rupiah_millions, with_thousands, AnalysisReport, KeyMetrics,
        StatisticsCsvRow,
    },
    BreakEvenResult, ProjectionResult, ScenarioComparison, ScenarioRunner,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cashflow_forecast", version, about = "Multi-scenario cash-flow forecast and break-even analysis")]
struct Args {
    /// JSON case file (defaults to the built-in café case)
    #[arg(long, env = "FORECAST_CASE")]
    case: Option<PathBuf>,

    /// CSV of category baselines (Category,Kind,Baseline,GrowthRate) replacing the case's categories
    #[arg(long, env = "FORECAST_CATEGORIES")]
    categories: Option<PathBuf>,

    /// Override the projection horizon
    #[arg(long, env = "FORECAST_MONTHS")]
    months: Option<u32>,

    /// Override the starting cash balance
    #[arg(long, env = "FORECAST_STARTING_BALANCE", allow_hyphen_values = true)]
    starting_balance: Option<f64>,

    /// Directory for the CSV exports
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip writing CSV exports
    #[arg(long)]
    no_export: bool,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut case = match &args.case {
        Some(path) => CaseFile::from_json_path(path)
            .with_context(|| format!("failed to load case file {}", path.display()))?,
        None => CaseFile::default_cafe(),
    };
    if let Some(path) = &args.categories {
        let categories = load_categories(path)
            .with_context(|| format!("failed to load categories from {}", path.display()))?;
        case = case.with_categories(categories);
    }
    if let Some(months) = args.months {
        case = case.with_months(months);
    }
    if let Some(balance) = args.starting_balance {
        case = case.with_starting_balance(balance);
    }

    let runner = ScenarioRunner::new(case)?;
    let results = runner.run_all().context("projection failed")?;
    let comparison = cashflow_forecast::compare(&results)?;
    let break_even = runner.break_even().context("break-even analysis failed")?;
    let metrics = KeyMetrics::from_results(&results, &comparison);
    let statistics = report::reference_result(&results)
        .map(report::statistics_rows)
        .unwrap_or_default();
    let case = runner.case();

    if !args.no_export {
        let summary = metrics
            .as_ref()
            .map(|m| m.summary_rows(break_even.as_ref()))
            .unwrap_or_default();
        let written = report::write_reports(&args.output_dir, &results, &comparison, case.start_month, &summary)
            .with_context(|| format!("failed to write reports to {}", args.output_dir.display()))?;
        if !args.json {
            for path in &written {
                println!("Wrote {}", path.display());
            }
            println!();
        }
    }

    if args.json {
        let report = AnalysisReport {
            case_name: case.name.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            start_month: case.start_month,
            chart_series: report::chart_series(&results),
            results,
            comparison,
            key_metrics: metrics,
            descriptive_statistics: statistics,
            break_even,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "=".repeat(80));
    println!("CASH FLOW FORECAST - {}", case.name.to_uppercase());
    println!("{}", "=".repeat(80));
    println!("Analysis date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!(
        "Periods: {} months ({} to {}), scenarios: {}",
        case.months,
        month_label(case.start_month, 0),
        month_label(case.start_month, case.months.saturating_sub(1)),
        results.len(),
    );

    for result in results.values() {
        print_projection(result, case);
    }

    if let Some(metrics) = &metrics {
        print_statistics(metrics, &statistics);
        print_key_metrics(metrics);
    }
    print_comparison(&comparison);
    if let Some(be) = &break_even {
        print_break_even(be);
    }

    Ok(())
}

fn print_projection(result: &ProjectionResult, case: &CaseFile) {
    println!("\n{} (in million IDR):", result.scenario.label());
    println!("{:<10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Month", "Opening", "Inflows", "Outflows", "Net CF", "Closing");
    println!("{}", "-".repeat(75));

    for p in &result.points {
        println!("{:<10} {:>12.1} {:>12.1} {:>12.1} {:>12.1} {:>12.1}",
            month_label(case.start_month, p.month_index),
            p.opening_balance / 1_000_000.0,
            p.revenue / 1_000_000.0,
            p.cost / 1_000_000.0,
            p.net_cash_flow / 1_000_000.0,
            p.ending_balance / 1_000_000.0,
        );
    }
}

fn print_statistics(m: &KeyMetrics, rows: &[StatisticsCsvRow]) {
    println!("\nDescriptive Statistics ({}, in million IDR):", m.reference.label());
    println!("{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Series", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max");
    println!("{}", "-".repeat(96));

    for r in rows {
        println!("{:<16} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            r.series,
            r.count,
            r.mean / 1_000_000.0,
            r.std_dev / 1_000_000.0,
            r.min / 1_000_000.0,
            r.q1 / 1_000_000.0,
            r.median / 1_000_000.0,
            r.q3 / 1_000_000.0,
            r.max / 1_000_000.0,
        );
    }
}

fn print_key_metrics(m: &KeyMetrics) {
    let pct = |v: Option<f64>| v.map(percent).unwrap_or_else(|| "n/a".to_string());

    println!("\nKey Metrics ({}):", m.reference.label());
    println!("  Average Monthly Inflows:  {:>16}", rupiah_millions(m.avg_monthly_revenue));
    println!("  Average Monthly Outflows: {:>16}", rupiah_millions(m.avg_monthly_cost));
    println!("  Average Net Cash Flow:    {:>16}", rupiah_millions(m.avg_net_cash_flow));
    println!("  Total Inflows (Period):   {:>16}", rupiah_millions(m.total_revenue));
    println!("  Total Outflows (Period):  {:>16}", rupiah_millions(m.total_cost));
    println!("  Revenue Growth Rate:      {:>16}", pct(m.revenue_growth_pct));
    println!("  Expense Ratio:            {:>16}", pct(m.expense_ratio_pct));

    println!("\nStatistics:");
    println!("  Cash Flow Volatility:     {:>16}", rupiah_millions(m.volatility));
    match (m.revenue_cost_correlation, m.correlation_strength) {
        (Some(r), Some(strength)) => {
            println!("  Inflow/Outflow Correlation: {:>14.3}", r);
            println!("    -> {}", strength.description());
        }
        _ => println!("  Inflow/Outflow Correlation: n/a (insufficient variance)"),
    }
    println!("  Inflow Trend:             {:>16} per month", rupiah_millions(m.revenue_trend));
    println!("  Outflow Trend:            {:>16} per month", rupiah_millions(m.cost_trend));
}

fn print_comparison(comparison: &ScenarioComparison) {
    println!("\nScenario Comparison:");
    println!("{:<14} {:>16} {:>16} {:>16} {:>18} {:>18}",
        "Scenario", "Final Balance", "Total Inflow", "Total Outflow", "Cumulative Net CF", "Avg Monthly CF");
    println!("{}", "-".repeat(103));

    for r in &comparison.ranking {
        println!("{:<14} {:>16} {:>16} {:>16} {:>18} {:>18}",
            r.scenario.label(),
            rupiah_millions(r.final_balance),
            rupiah_millions(r.total_revenue),
            rupiah_millions(r.total_cost),
            rupiah_millions(r.cumulative_net_cash_flow),
            rupiah_millions(r.average_monthly_cash_flow),
        );
    }

    println!("\nRisk Analysis:");
    if let (Some(best), Some(worst)) = (comparison.best(), comparison.worst()) {
        println!("  Best Case:  {} ({})", rupiah_millions(best.final_balance), best.scenario.label());
        println!("  Worst Case: {} ({})", rupiah_millions(worst.final_balance), worst.scenario.label());
    }
    if let Some(spread) = comparison.spread {
        println!("  Risk Range: {}", rupiah_millions(spread));
    }
    if let Some(pct) = comparison.spread_pct_of_base {
        println!("  Scenario Spread: {}", percent(pct));
    }
}

fn print_break_even(be: &BreakEvenResult) {
    println!("\nBreak-Even Analysis:");
    println!("  BE Revenue:       {:>16} / month", rupiah_millions(be.break_even_revenue));
    println!("  BE Transactions:  {:>16} / month", with_thousands(be.break_even_transactions as f64, 0));
    println!("  Current Revenue:  {:>16} / month", rupiah_millions(be.current_revenue));
    println!("  Margin Ratio:     {:>16}", percent(be.contribution_margin_ratio * 100.0));
    println!("  Safety Margin:    {:>16}", percent(be.safety_margin_pct));
    println!("  Status: {}", be.status.description());
}
