//! Plain-record export of projection results
//!
//! Spreadsheet, slide and chart tooling consume these records; nothing here
//! feeds back into the computations.

mod format;

pub use format::{month_label, percent, rupiah_millions, with_thousands};

use crate::breakeven::BreakEvenResult;
use crate::error::Result;
use crate::model::ScenarioName;
use crate::projection::stats::{self, CorrelationStrength, SeriesDescription};
use crate::projection::{ProjectionPoint, ProjectionResult};
use crate::scenario::ScenarioComparison;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default file name for the long-format projection export
pub const PROJECTION_CSV: &str = "scenario_projection.csv";

/// Default file name for the metric summary export
pub const SUMMARY_CSV: &str = "analysis_summary.csv";

/// Default file name for the per-scenario comparison table
pub const COMPARISON_CSV: &str = "scenario_comparison.csv";

/// Default file name for the reference scenario's descriptive statistics
pub const STATISTICS_CSV: &str = "descriptive_statistics.csv";

/// One projected month of one scenario, as written to CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionCsvRow {
    #[serde(rename = "Scenario")]
    pub scenario: String,
    #[serde(rename = "MonthIndex")]
    pub month_index: u32,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "OpeningBalance")]
    pub opening_balance: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "NetCashFlow")]
    pub net_cash_flow: f64,
    #[serde(rename = "EndingBalance")]
    pub ending_balance: f64,
    #[serde(rename = "CumulativeNetCashFlow")]
    pub cumulative_net_cash_flow: f64,
    /// Empty where the prior balance is not positive
    #[serde(rename = "BalanceGrowthPct")]
    pub balance_growth_pct: Option<f64>,
}

/// One scenario's line in the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCsvRow {
    #[serde(rename = "Scenario")]
    pub scenario: String,
    #[serde(rename = "FinalBalance")]
    pub final_balance: f64,
    #[serde(rename = "TotalInflow")]
    pub total_inflow: f64,
    #[serde(rename = "TotalOutflow")]
    pub total_outflow: f64,
    #[serde(rename = "CumulativeNetCashFlow")]
    pub cumulative_net_cash_flow: f64,
    #[serde(rename = "AverageMonthlyCashFlow")]
    pub average_monthly_cash_flow: f64,
}

/// Descriptive statistics of one monthly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsCsvRow {
    #[serde(rename = "Series")]
    pub series: String,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "Std")]
    pub std_dev: f64,
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Q1")]
    pub q1: f64,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Q3")]
    pub q3: f64,
    #[serde(rename = "Max")]
    pub max: f64,
}

impl StatisticsCsvRow {
    fn new(series: &str, d: SeriesDescription) -> Self {
        Self {
            series: series.to_string(),
            count: d.count,
            mean: d.mean,
            std_dev: d.std_dev,
            min: d.min,
            q1: d.q1,
            median: d.median,
            q3: d.q3,
            max: d.max,
        }
    }
}

/// Per-month series for the cumulative cash flow and balance growth charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub cumulative_net_cash_flow: Vec<f64>,
    pub balance_growth_pct: Vec<Option<f64>>,
}

/// A formatted metric for the summary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl SummaryRow {
    fn new(metric: &str, value: String) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

/// Headline metrics of the reference scenario plus the cross-scenario risk range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub reference: ScenarioName,
    pub avg_monthly_revenue: f64,
    pub avg_monthly_cost: f64,
    pub avg_net_cash_flow: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub revenue_growth_pct: Option<f64>,
    pub expense_ratio_pct: Option<f64>,
    pub volatility: f64,
    pub revenue_cost_correlation: Option<f64>,
    pub correlation_strength: Option<CorrelationStrength>,
    pub revenue_trend: f64,
    pub cost_trend: f64,
    pub final_balance: f64,
    pub best_final_balance: f64,
    pub worst_final_balance: f64,
    pub risk_range: Option<f64>,
}

impl KeyMetrics {
    /// Metrics for the base scenario (or the first available one)
    pub fn from_results(
        results: &BTreeMap<ScenarioName, ProjectionResult>,
        comparison: &ScenarioComparison,
    ) -> Option<Self> {
        let reference = reference_result(results)?;
        let s = &reference.summary;

        Some(Self {
            reference: reference.scenario,
            avg_monthly_revenue: s.mean_revenue,
            avg_monthly_cost: s.mean_cost,
            avg_net_cash_flow: s.mean_net_cash_flow,
            total_revenue: s.total_revenue,
            total_cost: s.total_cost,
            revenue_growth_pct: s.revenue_growth_pct,
            expense_ratio_pct: s.expense_ratio.map(|r| r * 100.0),
            volatility: s.std_dev_net_cash_flow,
            revenue_cost_correlation: s.revenue_cost_correlation,
            correlation_strength: s.revenue_cost_correlation.map(CorrelationStrength::from_coefficient),
            revenue_trend: s.revenue_trend_slope,
            cost_trend: s.cost_trend_slope,
            final_balance: s.final_balance,
            best_final_balance: comparison.best()?.final_balance,
            worst_final_balance: comparison.worst()?.final_balance,
            risk_range: comparison.spread,
        })
    }

    /// Rows for the summary sheet
    pub fn summary_rows(&self, break_even: Option<&BreakEvenResult>) -> Vec<SummaryRow> {
        let optional_pct = |v: Option<f64>| v.map(percent).unwrap_or_else(|| "n/a".to_string());

        let mut rows = vec![
            SummaryRow::new("Avg Monthly Revenue", rupiah_millions(self.avg_monthly_revenue)),
            SummaryRow::new("Avg Monthly Expenses", rupiah_millions(self.avg_monthly_cost)),
            SummaryRow::new("Avg Net Cash Flow", rupiah_millions(self.avg_net_cash_flow)),
            SummaryRow::new("Revenue Growth Rate", optional_pct(self.revenue_growth_pct)),
            SummaryRow::new("Expense Ratio", optional_pct(self.expense_ratio_pct)),
            SummaryRow::new("Cash Flow Volatility", rupiah_millions(self.volatility)),
            SummaryRow::new(
                "Revenue/Cost Correlation",
                match (self.revenue_cost_correlation, self.correlation_strength) {
                    (Some(r), Some(strength)) => format!("{:.3} ({})", r, strength.description()),
                    _ => "n/a".to_string(),
                },
            ),
            SummaryRow::new(
                &format!("Final Balance ({})", self.reference.label()),
                rupiah_millions(self.final_balance),
            ),
            SummaryRow::new("Final Balance (Best)", rupiah_millions(self.best_final_balance)),
            SummaryRow::new("Final Balance (Worst)", rupiah_millions(self.worst_final_balance)),
            SummaryRow::new(
                "Risk Range",
                self.risk_range.map(rupiah_millions).unwrap_or_else(|| "n/a".to_string()),
            ),
        ];

        if let Some(be) = break_even {
            rows.push(SummaryRow::new("Break-Even Revenue", rupiah_millions(be.break_even_revenue)));
            rows.push(SummaryRow::new(
                "Break-Even Transactions",
                with_thousands(be.break_even_transactions as f64, 0),
            ));
            rows.push(SummaryRow::new("Safety Margin", percent(be.safety_margin_pct)));
        }

        rows
    }
}

/// Everything a run produced, for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub case_name: String,
    pub generated_at: String,
    pub start_month: NaiveDate,
    pub results: BTreeMap<ScenarioName, ProjectionResult>,
    pub comparison: ScenarioComparison,
    pub key_metrics: Option<KeyMetrics>,
    pub descriptive_statistics: Vec<StatisticsCsvRow>,
    pub chart_series: BTreeMap<ScenarioName, ChartSeries>,
    pub break_even: Option<BreakEvenResult>,
}

/// The scenario headline metrics are reported for: base, or the first available
pub fn reference_result(results: &BTreeMap<ScenarioName, ProjectionResult>) -> Option<&ProjectionResult> {
    results.get(&ScenarioName::Base).or_else(|| results.values().next())
}

/// Chart inputs for every scenario
pub fn chart_series(results: &BTreeMap<ScenarioName, ProjectionResult>) -> BTreeMap<ScenarioName, ChartSeries> {
    results
        .iter()
        .map(|(&name, result)| {
            let series = ChartSeries {
                cumulative_net_cash_flow: result.cumulative_net_cash_flows(),
                balance_growth_pct: result.balance_growth_pct(),
            };
            (name, series)
        })
        .collect()
}

/// Descriptive statistics of inflows, outflows, net cash flow and closing balance
pub fn statistics_rows(result: &ProjectionResult) -> Vec<StatisticsCsvRow> {
    let series: [(&str, fn(&ProjectionPoint) -> f64); 4] = [
        ("Total Inflows", |p| p.revenue),
        ("Total Outflows", |p| p.cost),
        ("Net Cash Flow", |p| p.net_cash_flow),
        ("Closing Balance", |p| p.ending_balance),
    ];

    series
        .into_iter()
        .filter_map(|(label, field)| {
            let values: Vec<f64> = result.points.iter().map(field).collect();
            stats::describe(&values).map(|d| StatisticsCsvRow::new(label, d))
        })
        .collect()
}

/// Comparison table rows in ranking order
pub fn comparison_rows(comparison: &ScenarioComparison) -> Vec<ComparisonCsvRow> {
    comparison
        .ranking
        .iter()
        .map(|r| ComparisonCsvRow {
            scenario: r.scenario.as_str().to_string(),
            final_balance: r.final_balance,
            total_inflow: r.total_revenue,
            total_outflow: r.total_cost,
            cumulative_net_cash_flow: r.cumulative_net_cash_flow,
            average_monthly_cash_flow: r.average_monthly_cash_flow,
        })
        .collect()
}

/// Flatten results into CSV rows, scenario by scenario in month order
pub fn projection_rows(
    results: &BTreeMap<ScenarioName, ProjectionResult>,
    start_month: NaiveDate,
) -> Vec<ProjectionCsvRow> {
    results
        .values()
        .flat_map(|result| {
            let cumulative = result.cumulative_net_cash_flows();
            let growth = result.balance_growth_pct();
            result
                .points
                .iter()
                .zip(cumulative.into_iter().zip(growth))
                .map(move |(p, (cumulative_net_cash_flow, balance_growth_pct))| ProjectionCsvRow {
                    scenario: result.scenario.as_str().to_string(),
                    month_index: p.month_index,
                    month: month_label(start_month, p.month_index),
                    opening_balance: p.opening_balance,
                    revenue: p.revenue,
                    cost: p.cost,
                    net_cash_flow: p.net_cash_flow,
                    ending_balance: p.ending_balance,
                    cumulative_net_cash_flow,
                    balance_growth_pct,
                })
        })
        .collect()
}

/// Write the long-format projection table
pub fn write_projection_csv<W: Write>(
    writer: W,
    results: &BTreeMap<ScenarioName, ProjectionResult>,
    start_month: NaiveDate,
) -> Result<()> {
    write_rows(writer, &projection_rows(results, start_month))
}

/// Write the Metric/Value summary table
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<()> {
    write_rows(writer, rows)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every CSV export into `dir`, returning the paths written
pub fn write_reports(
    dir: &Path,
    results: &BTreeMap<ScenarioName, ProjectionResult>,
    comparison: &ScenarioComparison,
    start_month: NaiveDate,
    summary: &[SummaryRow],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let projection_path = dir.join(PROJECTION_CSV);
    write_projection_csv(File::create(&projection_path)?, results, start_month)?;

    let summary_path = dir.join(SUMMARY_CSV);
    write_summary_csv(File::create(&summary_path)?, summary)?;

    let comparison_path = dir.join(COMPARISON_CSV);
    write_rows(File::create(&comparison_path)?, &comparison_rows(comparison))?;

    let statistics_path = dir.join(STATISTICS_CSV);
    let statistics = reference_result(results).map(statistics_rows).unwrap_or_default();
    write_rows(File::create(&statistics_path)?, &statistics)?;

    log::info!("reports written to {}", dir.display());
    Ok(vec![projection_path, summary_path, comparison_path, statistics_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryBaseline, ScenarioProfile};
    use crate::projection::project;
    use crate::scenario::compare;

    fn results() -> BTreeMap<ScenarioName, ProjectionResult> {
        let categories = vec![
            CategoryBaseline::revenue("Sales", 750_000_000.0, 0.05),
            CategoryBaseline::fixed_cost("Operating Costs", 625_000_000.0, 0.0),
        ];
        let mut results = BTreeMap::new();
        for name in [ScenarioName::Base, ScenarioName::Optimistic] {
            let result = project(425_000_000.0, &categories, 3, &ScenarioProfile::unshifted(name)).unwrap();
            results.insert(name, result);
        }
        results
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
    }

    #[test]
    fn test_projection_rows_follow_scenario_then_month() {
        let rows = projection_rows(&results(), start());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].scenario, "optimistic");
        assert_eq!(rows[3].scenario, "base");
        assert_eq!(rows[2].month, "Jan 2025");
        assert!((rows[3].ending_balance - 587_500_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_write_projection_csv() {
        let mut buffer = Vec::new();
        write_projection_csv(&mut buffer, &results(), start()).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "Scenario,MonthIndex,Month,OpeningBalance,Revenue,Cost,NetCashFlow,EndingBalance,\
CumulativeNetCashFlow,BalanceGrowthPct"
            )
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("optimistic,0,Nov 2024,425000000"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_summary_rows_and_csv() {
        let results = results();
        let comparison = compare(&results).unwrap();
        let metrics = KeyMetrics::from_results(&results, &comparison).unwrap();
        assert_eq!(metrics.reference, ScenarioName::Base);
        assert_eq!(metrics.risk_range, None);

        let rows = metrics.summary_rows(None);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].metric, "Avg Monthly Revenue");
        // Flat costs have no variance, so there is no correlation to label
        assert_eq!(rows[6].metric, "Revenue/Cost Correlation");
        assert_eq!(rows[6].value, "n/a");
        assert_eq!(rows[7].metric, "Final Balance (Base Case)");
        assert_eq!(rows[10].value, "n/a");

        let mut buffer = Vec::new();
        write_summary_csv(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Metric,Value\n"));
        assert!(text.contains("Risk Range,n/a"));
    }

    #[test]
    fn test_summary_rows_with_break_even() {
        let results = results();
        let comparison = compare(&results).unwrap();
        let metrics = KeyMetrics::from_results(&results, &comparison).unwrap();
        let be = crate::breakeven::compute_break_even(325_000_000.0, 50_000.0, 17_500.0, 750_000_000.0).unwrap();

        let rows = metrics.summary_rows(Some(&be));
        assert_eq!(rows.len(), 14);
        assert_eq!(rows[11].value, "Rp 500.0M");
        assert_eq!(rows[12].value, "10,000");
        assert_eq!(rows[13].value, "50.0%");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let results = results();
        let comparison = compare(&results).unwrap();
        let report = AnalysisReport {
            case_name: "Test".into(),
            generated_at: "2024-11-30T00:00:00".into(),
            start_month: start(),
            key_metrics: KeyMetrics::from_results(&results, &comparison),
            descriptive_statistics: statistics_rows(&results[&ScenarioName::Base]),
            chart_series: chart_series(&results),
            results,
            comparison,
            break_even: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["results"]["base"]["points"].is_array());
        assert_eq!(json["start_month"], "2024-11-01");
        assert_eq!(json["chart_series"]["optimistic"]["cumulative_net_cash_flow"].as_array().unwrap().len(), 3);
        assert_eq!(json["descriptive_statistics"][3]["Series"], "Closing Balance");
    }

    #[test]
    fn test_projection_rows_carry_chart_series() {
        let rows = projection_rows(&results(), start());
        let base: Vec<_> = rows.iter().filter(|r| r.scenario == "base").collect();

        let mut cumulative = 0.0;
        let mut prior = 425_000_000.0;
        for row in &base {
            cumulative += row.net_cash_flow;
            assert!((row.cumulative_net_cash_flow - cumulative).abs() < 1e-3);
            let growth = row.balance_growth_pct.unwrap();
            assert!((growth - (row.ending_balance / prior - 1.0) * 100.0).abs() < 1e-9);
            prior = row.ending_balance;
        }
    }

    #[test]
    fn test_balance_growth_blank_after_non_positive_balance() {
        let categories = vec![
            CategoryBaseline::revenue("Sales", 100.0, 0.0),
            CategoryBaseline::fixed_cost("Rent", 150.0, 0.0),
        ];
        let mut results = BTreeMap::new();
        let result = project(60.0, &categories, 3, &ScenarioProfile::unshifted(ScenarioName::Base)).unwrap();
        results.insert(ScenarioName::Base, result);

        // Balances: 10, -40, -90
        let rows = projection_rows(&results, start());
        assert!(rows[0].balance_growth_pct.is_some());
        assert!(rows[1].balance_growth_pct.is_some());
        assert_eq!(rows[2].balance_growth_pct, None);

        let mut buffer = Vec::new();
        write_projection_csv(&mut buffer, &results, start()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        // Missing growth is written as an empty trailing field
        assert!(text.lines().nth(3).unwrap().ends_with(','));
    }

    #[test]
    fn test_statistics_rows_describe_reference_scenario() {
        let results = results();
        let base = reference_result(&results).unwrap();
        assert_eq!(base.scenario, ScenarioName::Base);

        let rows = statistics_rows(base);
        let labels: Vec<_> = rows.iter().map(|r| r.series.as_str()).collect();
        assert_eq!(labels, vec!["Total Inflows", "Total Outflows", "Net Cash Flow", "Closing Balance"]);

        let inflows = &rows[0];
        assert_eq!(inflows.count, 3);
        assert!((inflows.min - 787_500_000.0).abs() < 1e-3);
        assert!((inflows.median - 826_875_000.0).abs() < 1e-3);
        assert_eq!(rows[1].std_dev, 0.0);
        assert_eq!(rows[3].max, base.summary.final_balance);
    }

    #[test]
    fn test_comparison_rows_follow_ranking() {
        let results = results();
        let comparison = compare(&results).unwrap();
        let rows = comparison_rows(&comparison);

        // Both scenarios are unshifted, so the tie keeps scenario order
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scenario, "optimistic");
        assert_eq!(rows[1].scenario, "base");
        let s = &results[&ScenarioName::Optimistic].summary;
        assert_eq!(rows[0].cumulative_net_cash_flow, s.cumulative_net_cash_flow);
        assert_eq!(rows[0].average_monthly_cash_flow, s.mean_net_cash_flow);
        assert_eq!(rows[0].total_outflow, 3.0 * 625_000_000.0);
    }

    #[test]
    fn test_write_reports_creates_all_files() {
        let dir = Path::new("target").join("report-export-test");
        let _ = std::fs::remove_dir_all(&dir);

        let results = results();
        let comparison = compare(&results).unwrap();
        let summary = KeyMetrics::from_results(&results, &comparison).unwrap().summary_rows(None);

        let written = write_reports(&dir, &results, &comparison, start(), &summary).unwrap();
        assert_eq!(
            written,
            vec![
                dir.join(PROJECTION_CSV),
                dir.join(SUMMARY_CSV),
                dir.join(COMPARISON_CSV),
                dir.join(STATISTICS_CSV),
            ]
        );

        let projection = std::fs::read_to_string(dir.join(PROJECTION_CSV)).unwrap();
        assert_eq!(projection.lines().count(), 7);
        let summary_text = std::fs::read_to_string(dir.join(SUMMARY_CSV)).unwrap();
        assert_eq!(summary_text.lines().count(), summary.len() + 1);
        let comparison_text = std::fs::read_to_string(dir.join(COMPARISON_CSV)).unwrap();
        assert!(comparison_text.starts_with(
            "Scenario,FinalBalance,TotalInflow,TotalOutflow,CumulativeNetCashFlow,AverageMonthlyCashFlow\n"
        ));
        let statistics_text = std::fs::read_to_string(dir.join(STATISTICS_CSV)).unwrap();
        assert!(statistics_text.starts_with("Series,Count,Mean,Std,Min,Q1,Median,Q3,Max\n"));
        assert_eq!(statistics_text.lines().count(), 5);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
