//! Scenario runner and comparator
//!
//! The runner projects every profile of a case independently and in order;
//! the comparator ranks the finished results and measures the spread between
//! the best and worst case.

use crate::assumptions::CaseFile;
use crate::breakeven::BreakEvenResult;
use crate::error::{ForecastError, Result};
use crate::model::{ScenarioName, ScenarioProfile};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runs all scenarios of one case
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(CaseFile::default_cafe())?;
/// let results = runner.run_all()?;
/// let comparison = compare(&results)?;
/// ```
pub struct ScenarioRunner {
    case: CaseFile,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(case: CaseFile) -> Result<Self> {
        case.validate()?;
        let config = ProjectionConfig {
            projection_months: case.months,
            starting_balance: case.starting_balance,
        };
        let engine = ProjectionEngine::new(case.categories.clone(), config);
        Ok(Self { case, engine })
    }

    pub fn case(&self) -> &CaseFile {
        &self.case
    }

    /// Project a single profile against the case's baselines
    pub fn run(&self, profile: &ScenarioProfile) -> Result<ProjectionResult> {
        self.engine.project(profile)
    }

    /// Project every profile of the case, one after another
    pub fn run_all(&self) -> Result<BTreeMap<ScenarioName, ProjectionResult>> {
        let mut results = BTreeMap::new();
        for profile in &self.case.profiles {
            let result = self.run(profile)?;
            log::info!(
                "{}: final balance {:.2}, mean net flow {:.2}",
                profile.name().label(),
                result.summary.final_balance,
                result.summary.mean_net_cash_flow,
            );
            results.insert(profile.name(), result);
        }
        Ok(results)
    }

    pub fn break_even(&self) -> Result<Option<BreakEvenResult>> {
        self.case.break_even()
    }
}

/// One entry of the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScenario {
    pub scenario: ScenarioName,
    pub final_balance: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub cumulative_net_cash_flow: f64,
    /// Mean monthly net cash flow
    pub average_monthly_cash_flow: f64,
}

/// Ranking and risk range across scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Scenarios by final ending balance, highest first
    pub ranking: Vec<RankedScenario>,

    /// Optimistic final balance minus pessimistic final balance
    pub spread: Option<f64>,

    /// Spread relative to the base case final balance (%)
    pub spread_pct_of_base: Option<f64>,
}

impl ScenarioComparison {
    /// Highest final balance; None only for a comparison built by hand with no ranking
    pub fn best(&self) -> Option<&RankedScenario> {
        self.ranking.first()
    }

    pub fn worst(&self) -> Option<&RankedScenario> {
        self.ranking.last()
    }
}

/// Rank results by final balance and compute the optimistic/pessimistic spread
pub fn compare(results: &BTreeMap<ScenarioName, ProjectionResult>) -> Result<ScenarioComparison> {
    if results.is_empty() {
        return Err(ForecastError::invalid("results", "must contain at least one scenario"));
    }

    let mut ranking: Vec<RankedScenario> = results
        .iter()
        .map(|(&scenario, result)| RankedScenario {
            scenario,
            final_balance: result.summary.final_balance,
            total_revenue: result.summary.total_revenue,
            total_cost: result.summary.total_cost,
            cumulative_net_cash_flow: result.summary.cumulative_net_cash_flow,
            average_monthly_cash_flow: result.summary.mean_net_cash_flow,
        })
        .collect();
    // Stable sort: ties keep scenario order from the map
    ranking.sort_by(|a, b| b.final_balance.total_cmp(&a.final_balance));

    let final_of = |name: ScenarioName| results.get(&name).map(|r| r.summary.final_balance);

    let spread = match (final_of(ScenarioName::Optimistic), final_of(ScenarioName::Pessimistic)) {
        (Some(best), Some(worst)) => Some(best - worst),
        _ => None,
    };

    let spread_pct_of_base = match (spread, final_of(ScenarioName::Base)) {
        (Some(spread), Some(base)) if base != 0.0 => Some(spread / base * 100.0),
        _ => None,
    };

    Ok(ScenarioComparison {
        ranking,
        spread,
        spread_pct_of_base,
    })
}
