//! Revenue and cost line items with their monthly growth assumptions

use serde::{Deserialize, Serialize};

/// How a category contributes to net cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Cash inflow (sales, catering, events)
    Revenue,
    /// Cost that does not scale with transaction volume (rent, salaries)
    FixedCost,
    /// Cost that scales with transaction volume (ingredients, packaging)
    VariableCost,
}

impl CategoryKind {
    pub fn is_revenue(&self) -> bool {
        matches!(self, CategoryKind::Revenue)
    }

    pub fn is_cost(&self) -> bool {
        !self.is_revenue()
    }

    /// Parse the identifiers used in category files
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" | "inflow" => Some(CategoryKind::Revenue),
            "fixed_cost" | "fixed" => Some(CategoryKind::FixedCost),
            "variable_cost" | "variable" => Some(CategoryKind::VariableCost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Revenue => "revenue",
            CategoryKind::FixedCost => "fixed_cost",
            CategoryKind::VariableCost => "variable_cost",
        }
    }
}

/// A named revenue or cost line with its current monthly amount and growth rate.
///
/// The baseline is the amount for the current month, i.e. the month whose
/// closing balance is the projection's starting balance. Fields are private
/// so a baseline cannot change once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBaseline {
    name: String,
    kind: CategoryKind,
    baseline: f64,
    growth_rate: f64,
}

impl CategoryBaseline {
    pub fn new(name: impl Into<String>, kind: CategoryKind, baseline: f64, growth_rate: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            baseline,
            growth_rate,
        }
    }

    pub fn revenue(name: impl Into<String>, baseline: f64, growth_rate: f64) -> Self {
        Self::new(name, CategoryKind::Revenue, baseline, growth_rate)
    }

    pub fn fixed_cost(name: impl Into<String>, baseline: f64, growth_rate: f64) -> Self {
        Self::new(name, CategoryKind::FixedCost, baseline, growth_rate)
    }

    pub fn variable_cost(name: impl Into<String>, baseline: f64, growth_rate: f64) -> Self {
        Self::new(name, CategoryKind::VariableCost, baseline, growth_rate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    /// Current monthly amount
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Expected monthly growth rate (0.05 = 5% per month)
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }
}

/// Sum of baselines for the categories matching `kind`
pub fn total_baseline(categories: &[CategoryBaseline], kind: CategoryKind) -> f64 {
    categories
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.baseline)
        .sum()
}
