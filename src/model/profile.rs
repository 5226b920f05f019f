//! Scenario profiles: named growth assumptions layered on category baselines

use super::category::{CategoryBaseline, CategoryKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    Optimistic,
    Base,
    Pessimistic,
}

impl ScenarioName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Optimistic => "optimistic",
            ScenarioName::Base => "base",
            ScenarioName::Pessimistic => "pessimistic",
        }
    }

    /// Human-readable label for report headings
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioName::Optimistic => "Optimistic",
            ScenarioName::Base => "Base Case",
            ScenarioName::Pessimistic => "Pessimistic",
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Additive shift applied to each category's own monthly growth rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModifier {
    /// Same shift for every category
    Uniform(f64),
    /// Separate shifts for revenue and for cost categories
    ByKind { revenue: f64, cost: f64 },
    /// Shift by category name; categories not listed keep their own rate
    PerCategory(BTreeMap<String, f64>),
}

impl GrowthModifier {
    /// Shift applied to `category`
    pub fn shift_for(&self, category: &CategoryBaseline) -> f64 {
        match self {
            GrowthModifier::Uniform(shift) => *shift,
            GrowthModifier::ByKind { revenue, cost } => match category.kind() {
                CategoryKind::Revenue => *revenue,
                CategoryKind::FixedCost | CategoryKind::VariableCost => *cost,
            },
            GrowthModifier::PerCategory(shifts) => {
                shifts.get(category.name()).copied().unwrap_or(0.0)
            }
        }
    }

    /// Per-category keys that match none of `categories`
    pub fn unknown_categories<'a>(&'a self, categories: &[CategoryBaseline]) -> Vec<&'a str> {
        match self {
            GrowthModifier::PerCategory(shifts) => shifts
                .keys()
                .filter(|key| !categories.iter().any(|c| c.name() == key.as_str()))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for GrowthModifier {
    fn default() -> Self {
        GrowthModifier::Uniform(0.0)
    }
}

/// A named set of growth assumptions. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    name: ScenarioName,
    #[serde(default)]
    modifier: GrowthModifier,
}

impl ScenarioProfile {
    pub fn new(name: ScenarioName, modifier: GrowthModifier) -> Self {
        Self { name, modifier }
    }

    /// Profile that projects every category at its own growth rate
    pub fn unshifted(name: ScenarioName) -> Self {
        Self::new(name, GrowthModifier::default())
    }

    pub fn name(&self) -> ScenarioName {
        self.name
    }

    pub fn modifier(&self) -> &GrowthModifier {
        &self.modifier
    }

    /// Monthly growth rate the projection compounds for `category`
    pub fn effective_rate(&self, category: &CategoryBaseline) -> f64 {
        category.growth_rate() + self.modifier.shift_for(category)
    }
}
