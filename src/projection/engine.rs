//! Core projection engine for monthly scenario cash flows

use crate::error::{ForecastError, Result};
use crate::model::{CategoryBaseline, ScenarioProfile};
use super::state::ProjectionState;
use super::cashflows::{ProjectionPoint, ProjectionResult};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of months to project
    pub projection_months: u32,

    /// Cash balance before the first projected month; may be negative
    pub starting_balance: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_months: 9,
            starting_balance: 0.0,
        }
    }
}

/// Projects a fixed set of category baselines under any scenario profile
pub struct ProjectionEngine {
    categories: Vec<CategoryBaseline>,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given categories and config
    pub fn new(categories: Vec<CategoryBaseline>, config: ProjectionConfig) -> Self {
        Self { categories, config }
    }

    pub fn categories(&self) -> &[CategoryBaseline] {
        &self.categories
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for one profile.
    ///
    /// Every input is validated before the first month is computed, so an
    /// error never comes with partial output.
    pub fn project(&self, profile: &ScenarioProfile) -> Result<ProjectionResult> {
        let rates = validate_inputs(
            self.config.starting_balance,
            &self.categories,
            self.config.projection_months,
            profile,
        )?;

        let mut state = ProjectionState::new(self.config.starting_balance);
        let mut points = Vec::with_capacity(self.config.projection_months as usize);

        for _ in 0..self.config.projection_months {
            points.push(self.calculate_month(&rates, &mut state));
        }

        log::debug!(
            "{} scenario: {} months, final balance {:.2}",
            profile.name().as_str(),
            points.len(),
            state.balance,
        );

        Ok(ProjectionResult::from_points(
            profile.name(),
            self.config.starting_balance,
            points,
        ))
    }

    /// Compound every category to the current month and close it on the state
    fn calculate_month(&self, rates: &[f64], state: &mut ProjectionState) -> ProjectionPoint {
        let month_index = state.month_index;
        let periods = state.growth_periods();

        let category_amounts: Vec<f64> = self
            .categories
            .iter()
            .zip(rates)
            .map(|(category, rate)| category.baseline() * (1.0 + rate).powf(periods))
            .collect();

        let mut revenue = 0.0;
        let mut cost = 0.0;
        for (category, amount) in self.categories.iter().zip(&category_amounts) {
            if category.kind().is_revenue() {
                revenue += amount;
            } else {
                cost += amount;
            }
        }

        let net_cash_flow = revenue - cost;
        // Incremental roll-forward keeps balance[m] == balance[m-1] + net[m] exact
        let (opening_balance, ending_balance) = state.close_month(net_cash_flow);

        ProjectionPoint {
            month_index,
            opening_balance,
            revenue,
            cost,
            net_cash_flow,
            ending_balance,
            category_amounts,
        }
    }
}

/// Project `categories` for `months` under `profile`, starting from `starting_balance`
pub fn project(
    starting_balance: f64,
    categories: &[CategoryBaseline],
    months: u32,
    profile: &ScenarioProfile,
) -> Result<ProjectionResult> {
    let config = ProjectionConfig {
        projection_months: months,
        starting_balance,
    };
    ProjectionEngine::new(categories.to_vec(), config).project(profile)
}

/// Check every precondition and return the effective monthly rate per category
pub fn validate_inputs(
    starting_balance: f64,
    categories: &[CategoryBaseline],
    months: u32,
    profile: &ScenarioProfile,
) -> Result<Vec<f64>> {
    if months < 1 {
        return Err(ForecastError::invalid(
            "months",
            format!("must be at least 1 (got {})", months),
        ));
    }

    if !starting_balance.is_finite() {
        return Err(ForecastError::invalid(
            "starting balance",
            format!("must be a finite number (got {})", starting_balance),
        ));
    }

    let rates = categories
        .iter()
        .map(|category| {
            let name = category.name();

            if !category.baseline().is_finite() || category.baseline() < 0.0 {
                return Err(ForecastError::invalid(
                    format!("baseline amount for category {:?}", name),
                    format!("must be a non-negative number (got {})", category.baseline()),
                ));
            }

            check_rate(name, category.growth_rate())?;
            let effective = profile.effective_rate(category);
            check_rate(name, effective)?;
            Ok(effective)
        })
        .collect::<Result<Vec<f64>>>()?;

    check_horizon(starting_balance, categories, &rates, months)?;
    Ok(rates)
}

/// Reject inputs whose compounded amounts or running balance leave the f64 range
fn check_horizon(starting_balance: f64, categories: &[CategoryBaseline], rates: &[f64], months: u32) -> Result<()> {
    let mut peak_revenue = 0.0;
    let mut peak_cost = 0.0;

    for (category, rate) in categories.iter().zip(rates) {
        // Growth is monotonic, so the first or last month holds the largest amount
        let growth = (1.0 + rate).powf(months as f64).max(1.0 + rate);
        let peak = category.baseline() * growth;
        if !peak.is_finite() {
            return Err(ForecastError::invalid(
                format!("projected amount for category {:?}", category.name()),
                format!(
                    "overflows within {} months (baseline {}, rate {})",
                    months,
                    category.baseline(),
                    rate
                ),
            ));
        }
        if category.kind().is_revenue() {
            peak_revenue += peak;
        } else {
            peak_cost += peak;
        }
    }

    if !peak_revenue.is_finite() || !peak_cost.is_finite() {
        return Err(ForecastError::invalid(
            "projected monthly totals",
            format!("overflow within {} months", months),
        ));
    }

    let balance_bound = starting_balance.abs() + months as f64 * f64::max(peak_revenue, peak_cost);
    if !balance_bound.is_finite() {
        return Err(ForecastError::invalid(
            "projected balance",
            format!("overflows within {} months", months),
        ));
    }

    Ok(())
}

fn check_rate(category: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() {
        return Err(ForecastError::invalid(
            format!("growth rate for category {:?}", category),
            format!("must be a finite number (got {})", rate),
        ));
    }
    if rate <= -1.0 {
        return Err(ForecastError::invalid(
            format!("growth rate for category {:?}", category),
            format!("is <= -100% ({})", rate),
        ));
    }
    Ok(())
}
