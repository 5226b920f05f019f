//! Built-in café case (amounts in IDR per month)

use super::CaseFile;
use crate::model::{CategoryBaseline, GrowthModifier, ScenarioName, ScenarioProfile};
use chrono::NaiveDate;

pub(super) fn cafe_case() -> CaseFile {
    let categories = vec![
        // Revenue: 750M per month
        CategoryBaseline::revenue("Beverage Sales", 480_000_000.0, 0.030),
        CategoryBaseline::revenue("Food Sales", 230_000_000.0, 0.025),
        CategoryBaseline::revenue("Catering & Events", 40_000_000.0, 0.040),
        // Costs: 625M per month
        CategoryBaseline::variable_cost("Ingredients", 225_000_000.0, 0.025),
        CategoryBaseline::variable_cost("Packaging", 37_500_000.0, 0.025),
        CategoryBaseline::fixed_cost("Salaries", 180_000_000.0, 0.0),
        CategoryBaseline::fixed_cost("Rent", 85_000_000.0, 0.0),
        CategoryBaseline::fixed_cost("Utilities", 35_000_000.0, 0.010),
        CategoryBaseline::fixed_cost("Marketing", 25_000_000.0, 0.005),
        CategoryBaseline::fixed_cost("Maintenance", 37_500_000.0, 0.0),
    ];

    let profiles = vec![
        ScenarioProfile::new(
            ScenarioName::Optimistic,
            GrowthModifier::ByKind { revenue: 0.02, cost: 0.005 },
        ),
        ScenarioProfile::unshifted(ScenarioName::Base),
        ScenarioProfile::new(
            ScenarioName::Pessimistic,
            GrowthModifier::ByKind { revenue: -0.03, cost: 0.01 },
        ),
    ];

    CaseFile {
        name: "Café Sumarecon Bekasi".to_string(),
        starting_balance: 425_000_000.0,
        months: 9,
        start_month: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
        categories,
        profiles,
        break_even: None,
        product_mix: None,
        average_ticket: Some(55_000.0),
    }
}
