//! Case configuration: starting position, category baselines, scenario
//! profiles and break-even inputs for one analysis run

mod defaults;

use crate::breakeven::{self, BreakEvenResult, ProductMix};
use crate::error::{ForecastError, Result};
use crate::model::{total_baseline, CategoryBaseline, CategoryKind, ScenarioProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Explicit per-transaction economics for the break-even block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenInputs {
    pub fixed_costs: f64,
    pub revenue_per_transaction: f64,
    pub variable_cost_per_transaction: f64,
    pub current_monthly_revenue: f64,
}

/// Everything needed for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    /// Business name used in report headings
    pub name: String,

    /// Cash on hand before the first projected month
    pub starting_balance: f64,

    /// Projection horizon
    pub months: u32,

    /// Calendar month of month index 0 (day is ignored)
    pub start_month: NaiveDate,

    pub categories: Vec<CategoryBaseline>,

    pub profiles: Vec<ScenarioProfile>,

    /// Explicit break-even economics; takes precedence over the derived forms
    #[serde(default)]
    pub break_even: Option<BreakEvenInputs>,

    /// Weighted sales mix for the break-even margin
    #[serde(default)]
    pub product_mix: Option<ProductMix>,

    /// Average revenue per transaction, used to derive break-even from the baseline month
    #[serde(default)]
    pub average_ticket: Option<f64>,
}

impl CaseFile {
    /// Built-in nine-month café case with optimistic, base and pessimistic profiles
    pub fn default_cafe() -> Self {
        defaults::cafe_case()
    }

    /// Load a case from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let case: CaseFile = serde_json::from_reader(std::io::BufReader::new(file))?;
        log::info!("loaded case {:?} from {}", case.name, path.as_ref().display());
        case.validate()?;
        Ok(case)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let case: CaseFile = serde_json::from_str(json)?;
        case.validate()?;
        Ok(case)
    }

    /// Structural checks that don't belong to any single computation
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(ForecastError::invalid("profiles", "must contain at least one scenario"));
        }

        let mut seen = BTreeSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.name()) {
                return Err(ForecastError::invalid(
                    "profiles",
                    format!("define scenario {:?} more than once", profile.name().as_str()),
                ));
            }
        }

        let mut names = BTreeSet::new();
        for category in &self.categories {
            if !names.insert(category.name()) {
                log::warn!("category {:?} appears more than once; both lines are projected", category.name());
            }
        }

        for profile in &self.profiles {
            for key in profile.modifier().unknown_categories(&self.categories) {
                log::warn!(
                    "{} profile shifts unknown category {:?}; the shift is ignored",
                    profile.name().as_str(),
                    key,
                );
            }
        }

        Ok(())
    }

    /// Replace the category baselines (e.g. with a CSV file's contents)
    pub fn with_categories(mut self, categories: Vec<CategoryBaseline>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn with_starting_balance(mut self, starting_balance: f64) -> Self {
        self.starting_balance = starting_balance;
        self
    }

    /// Break-even for the case, if it carries enough inputs.
    ///
    /// Explicit inputs win, then the product mix (with fixed costs and current
    /// revenue from the baseline month), then the average ticket.
    pub fn break_even(&self) -> Result<Option<BreakEvenResult>> {
        if let Some(inputs) = &self.break_even {
            return breakeven::compute_break_even(
                inputs.fixed_costs,
                inputs.revenue_per_transaction,
                inputs.variable_cost_per_transaction,
                inputs.current_monthly_revenue,
            )
            .map(Some);
        }

        if let Some(mix) = &self.product_mix {
            let fixed = total_baseline(&self.categories, CategoryKind::FixedCost);
            let revenue = total_baseline(&self.categories, CategoryKind::Revenue);
            return mix.break_even(fixed, revenue).map(Some);
        }

        match self.average_ticket {
            Some(ticket) => breakeven::break_even_from_baseline(&self.categories, ticket).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for CaseFile {
    fn default() -> Self {
        Self::default_cafe()
    }
}
