//! Projection output records

use super::stats;
use crate::model::ScenarioName;
use serde::{Deserialize, Serialize};

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 0-based month index (0 = first projected month)
    pub month_index: u32,

    /// Ending balance of the previous month
    pub opening_balance: f64,

    pub revenue: f64,
    pub cost: f64,

    /// revenue - cost
    pub net_cash_flow: f64,

    /// opening_balance + net_cash_flow
    pub ending_balance: f64,

    /// Projected amount per category, in input order
    pub category_amounts: Vec<f64>,
}

/// Complete projection for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub scenario: ScenarioName,

    /// Balance before the first projected month
    pub starting_balance: f64,

    /// Monthly points, strictly ordered by month index
    pub points: Vec<ProjectionPoint>,

    pub summary: ProjectionSummary,
}

impl ProjectionResult {
    /// Build a result and derive its summary from the points
    pub fn from_points(scenario: ScenarioName, starting_balance: f64, points: Vec<ProjectionPoint>) -> Self {
        let summary = ProjectionSummary::from_points(starting_balance, &points);
        Self {
            scenario,
            starting_balance,
            points,
            summary,
        }
    }

    /// Running sum of net cash flow, month by month
    pub fn cumulative_net_cash_flows(&self) -> Vec<f64> {
        self.points
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p.net_cash_flow;
                Some(*acc)
            })
            .collect()
    }

    /// Month-over-month change in ending balance (%); None where the prior balance is not positive
    pub fn balance_growth_pct(&self) -> Vec<Option<f64>> {
        let mut prior = self.starting_balance;
        self.points
            .iter()
            .map(|p| {
                let growth = (prior > 0.0).then(|| (p.ending_balance / prior - 1.0) * 100.0);
                prior = p.ending_balance;
                growth
            })
            .collect()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,

    pub mean_net_cash_flow: f64,
    /// Population standard deviation of monthly net cash flow
    pub std_dev_net_cash_flow: f64,
    /// OLS slope of revenue against month index
    pub revenue_trend_slope: f64,
    /// OLS slope of cost against month index
    pub cost_trend_slope: f64,

    pub final_balance: f64,
    pub cumulative_net_cash_flow: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub mean_revenue: f64,
    pub mean_cost: f64,

    /// Lowest ending balance over the horizon
    pub min_balance: f64,
    /// First month whose ending balance is negative
    pub first_deficit_month: Option<u32>,

    /// Last month's revenue relative to the first month's (%)
    pub revenue_growth_pct: Option<f64>,
    /// Mean cost / mean revenue
    pub expense_ratio: Option<f64>,
    /// Pearson correlation of monthly revenue and cost
    pub revenue_cost_correlation: Option<f64>,
}

impl ProjectionSummary {
    pub fn from_points(starting_balance: f64, points: &[ProjectionPoint]) -> Self {
        let revenues: Vec<f64> = points.iter().map(|p| p.revenue).collect();
        let costs: Vec<f64> = points.iter().map(|p| p.cost).collect();
        let nets: Vec<f64> = points.iter().map(|p| p.net_cash_flow).collect();

        let mean_revenue = stats::mean(&revenues);
        let mean_cost = stats::mean(&costs);

        let revenue_growth_pct = match (revenues.first(), revenues.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => Some((last / first - 1.0) * 100.0),
            _ => None,
        };

        Self {
            total_months: points.len() as u32,
            mean_net_cash_flow: stats::mean(&nets),
            std_dev_net_cash_flow: stats::population_std_dev(&nets),
            revenue_trend_slope: stats::ols_slope(&revenues),
            cost_trend_slope: stats::ols_slope(&costs),
            final_balance: points.last().map(|p| p.ending_balance).unwrap_or(starting_balance),
            cumulative_net_cash_flow: nets.iter().sum(),
            total_revenue: revenues.iter().sum(),
            total_cost: costs.iter().sum(),
            mean_revenue,
            mean_cost,
            min_balance: points
                .iter()
                .map(|p| p.ending_balance)
                .reduce(f64::min)
                .unwrap_or(starting_balance),
            first_deficit_month: points
                .iter()
                .find(|p| p.ending_balance < 0.0)
                .map(|p| p.month_index),
            revenue_growth_pct,
            expense_ratio: (mean_revenue > 0.0).then(|| mean_cost / mean_revenue),
            revenue_cost_correlation: stats::correlation(&revenues, &costs),
        }
    }
}
