//! Break-even analysis: how many transactions cover fixed costs, and how far
//! current revenue sits above that level

use crate::error::{ForecastError, Result};
use crate::model::{total_baseline, CategoryBaseline, CategoryKind};
use serde::{Deserialize, Serialize};

/// Safety margin (%) above which the business is comfortably above break-even
pub const SAFE_MARGIN_PCT: f64 = 15.0;

/// Safety margin (%) above which the position is acceptable but worth monitoring
pub const MONITOR_MARGIN_PCT: f64 = 8.0;

/// Largest transaction count that survives the round trip through f64 (2^53)
const MAX_TRANSACTIONS: f64 = 9_007_199_254_740_992.0;

/// Classification of the safety margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyStatus {
    Safe,
    Monitor,
    Attention,
}

impl SafetyStatus {
    pub fn from_margin_pct(margin_pct: f64) -> Self {
        if margin_pct > SAFE_MARGIN_PCT {
            SafetyStatus::Safe
        } else if margin_pct > MONITOR_MARGIN_PCT {
            SafetyStatus::Monitor
        } else {
            SafetyStatus::Attention
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SafetyStatus::Safe => "safe (high safety margin)",
            SafetyStatus::Monitor => "fairly safe (needs monitoring)",
            SafetyStatus::Attention => "needs attention (thin margin)",
        }
    }
}

/// Break-even position for one set of unit economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Total monthly fixed costs
    pub fixed_costs: f64,

    pub revenue_per_transaction: f64,

    /// Revenue per transaction minus variable cost per transaction
    pub contribution_margin_per_transaction: f64,

    /// Contribution margin as a share of revenue per transaction
    pub contribution_margin_ratio: f64,

    /// Whole transactions needed per month to cover fixed costs
    pub break_even_transactions: u64,

    /// break_even_transactions * revenue_per_transaction
    pub break_even_revenue: f64,

    pub current_revenue: f64,

    /// (current - break-even) / break-even, in percent; negative below break-even
    pub safety_margin_pct: f64,

    pub status: SafetyStatus,
}

impl BreakEvenResult {
    /// fixed costs / contribution margin ratio, before rounding up to whole transactions
    pub fn unrounded_break_even_revenue(&self) -> f64 {
        self.fixed_costs / self.contribution_margin_ratio
    }

    /// True when current revenue is at or above break-even
    pub fn is_covered(&self) -> bool {
        self.safety_margin_pct >= 0.0
    }
}

/// Compute break-even transactions, revenue and safety margin
pub fn compute_break_even(
    fixed_costs: f64,
    revenue_per_transaction: f64,
    variable_cost_per_transaction: f64,
    current_monthly_revenue: f64,
) -> Result<BreakEvenResult> {
    if !fixed_costs.is_finite() || fixed_costs <= 0.0 {
        return Err(ForecastError::invalid(
            "fixed costs",
            format!("must be a positive number (got {})", fixed_costs),
        ));
    }
    check_non_negative("revenue per transaction", revenue_per_transaction)?;
    check_non_negative("variable cost per transaction", variable_cost_per_transaction)?;
    check_non_negative("current monthly revenue", current_monthly_revenue)?;

    let margin = revenue_per_transaction - variable_cost_per_transaction;
    if margin <= 0.0 {
        return Err(ForecastError::invalid(
            "contribution margin per transaction",
            format!(
                "must be positive (revenue {} - variable cost {} = {})",
                revenue_per_transaction, variable_cost_per_transaction, margin
            ),
        ));
    }

    let transactions = (fixed_costs / margin).ceil();
    if transactions > MAX_TRANSACTIONS {
        return Err(ForecastError::invalid(
            "break-even transaction count",
            format!(
                "exceeds {} (fixed costs {} / margin {})",
                MAX_TRANSACTIONS, fixed_costs, margin
            ),
        ));
    }
    let break_even_transactions = transactions as u64;
    let break_even_revenue = break_even_transactions as f64 * revenue_per_transaction;
    let safety_margin_pct = (current_monthly_revenue - break_even_revenue) / break_even_revenue * 100.0;

    Ok(BreakEvenResult {
        fixed_costs,
        revenue_per_transaction,
        contribution_margin_per_transaction: margin,
        contribution_margin_ratio: margin / revenue_per_transaction,
        break_even_transactions,
        break_even_revenue,
        current_revenue: current_monthly_revenue,
        safety_margin_pct,
        status: SafetyStatus::from_margin_pct(safety_margin_pct),
    })
}

/// Break-even derived from a representative baseline month.
///
/// Fixed costs are the `FixedCost` baselines, the contribution margin ratio is
/// (revenue - variable cost) / revenue over the same month, and
/// `average_ticket` converts revenue into a transaction count.
pub fn break_even_from_baseline(categories: &[CategoryBaseline], average_ticket: f64) -> Result<BreakEvenResult> {
    if !average_ticket.is_finite() || average_ticket <= 0.0 {
        return Err(ForecastError::invalid(
            "average ticket",
            format!("must be a positive number (got {})", average_ticket),
        ));
    }

    let revenue = total_baseline(categories, CategoryKind::Revenue);
    if revenue <= 0.0 {
        return Err(ForecastError::invalid(
            "baseline revenue",
            format!("must be positive to derive a contribution margin (got {})", revenue),
        ));
    }

    let fixed = total_baseline(categories, CategoryKind::FixedCost);
    let variable = total_baseline(categories, CategoryKind::VariableCost);
    let transactions = revenue / average_ticket;

    log::debug!(
        "baseline break-even: revenue {:.2}, fixed {:.2}, variable {:.2}, {:.1} transactions",
        revenue, fixed, variable, transactions,
    );

    compute_break_even(fixed, average_ticket, variable / transactions, revenue)
}

/// One product in a sales mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    /// Relative share of transactions; normalised across the mix
    pub share: f64,
    pub price: f64,
    pub variable_cost: f64,
}

/// Sales mix used to weight per-transaction economics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductMix {
    pub lines: Vec<ProductLine>,
}

impl ProductMix {
    pub fn new(lines: Vec<ProductLine>) -> Self {
        Self { lines }
    }

    /// Share-weighted (price, variable cost) per transaction
    pub fn weighted_unit_economics(&self) -> Result<(f64, f64)> {
        if self.lines.is_empty() {
            return Err(ForecastError::invalid("product mix", "must contain at least one product"));
        }

        let mut total_share = 0.0;
        let mut price = 0.0;
        let mut variable = 0.0;
        for line in &self.lines {
            if !line.share.is_finite() || line.share <= 0.0 {
                return Err(ForecastError::invalid(
                    format!("share for product {:?}", line.name),
                    format!("must be positive (got {})", line.share),
                ));
            }
            total_share += line.share;
            price += line.share * line.price;
            variable += line.share * line.variable_cost;
        }

        Ok((price / total_share, variable / total_share))
    }

    /// Break-even using the weighted-average contribution margin of the mix
    pub fn break_even(&self, fixed_costs: f64, current_monthly_revenue: f64) -> Result<BreakEvenResult> {
        let (price, variable) = self.weighted_unit_economics()?;
        compute_break_even(fixed_costs, price, variable, current_monthly_revenue)
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ForecastError::invalid(
            field,
            format!("must be a non-negative number (got {})", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_break_even() {
        let result = compute_break_even(325_000_000.0, 50_000.0, 17_500.0, 750_000_000.0).unwrap();

        assert_relative_eq!(result.contribution_margin_per_transaction, 32_500.0);
        assert_relative_eq!(result.contribution_margin_ratio, 0.65);
        assert_eq!(result.break_even_transactions, 10_000);
        assert_relative_eq!(result.break_even_revenue, 500_000_000.0);
        assert_relative_eq!(result.safety_margin_pct, 50.0);
        assert_eq!(result.status, SafetyStatus::Safe);
        assert!(result.is_covered());
    }

    #[test]
    fn test_transactions_round_up() {
        let result = compute_break_even(1_000.0, 10.0, 7.0, 2_000.0).unwrap();
        // 1000 / 3 = 333.33 -> 334
        assert_eq!(result.break_even_transactions, 334);
        assert_relative_eq!(result.break_even_revenue, 3_340.0);
        assert!(result.break_even_revenue >= result.unrounded_break_even_revenue());
    }

    #[test]
    fn test_break_even_inversion() {
        let (fixed, price, variable) = (187_300.0, 42.0, 15.5);
        let result = compute_break_even(fixed, price, variable, 0.0).unwrap();

        let count = result.break_even_transactions as f64;
        let net = count * price - (fixed + count * variable);
        // Ceiling overshoots by less than one transaction's margin
        assert!(net >= 0.0);
        assert!(net < result.contribution_margin_per_transaction);
    }

    #[test]
    fn test_negative_safety_margin_is_reported() {
        let result = compute_break_even(100_000.0, 20.0, 10.0, 150_000.0).unwrap();
        assert_relative_eq!(result.safety_margin_pct, -25.0);
        assert_eq!(result.status, SafetyStatus::Attention);
        assert!(!result.is_covered());
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(SafetyStatus::from_margin_pct(15.1), SafetyStatus::Safe);
        assert_eq!(SafetyStatus::from_margin_pct(15.0), SafetyStatus::Monitor);
        assert_eq!(SafetyStatus::from_margin_pct(8.5), SafetyStatus::Monitor);
        assert_eq!(SafetyStatus::from_margin_pct(8.0), SafetyStatus::Attention);
    }

    #[test]
    fn test_non_positive_margin_rejected() {
        let err = compute_break_even(1_000.0, 10.0, 10.0, 5_000.0).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("contribution margin"));

        assert!(compute_break_even(1_000.0, 10.0, 12.0, 5_000.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_unrepresentable_transaction_count_rejected() {
        let err = compute_break_even(1e30, 1.0, 0.5, 1e30).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("break-even transaction count"));

        // Just inside the limit still yields an exact count
        let result = compute_break_even(2f64.powi(52), 1.0, 0.5, 0.0).unwrap();
        assert_eq!(result.break_even_transactions, 1u64 << 53);
    }

    #[test]
    fn test_non_positive_fixed_costs_rejected() {
        assert!(compute_break_even(0.0, 10.0, 5.0, 100.0).unwrap_err().is_invalid_input());
        assert!(compute_break_even(-5.0, 10.0, 5.0, 100.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_break_even_from_baseline() {
        let categories = vec![
            CategoryBaseline::revenue("Sales", 750_000.0, 0.05),
            CategoryBaseline::fixed_cost("Rent", 200_000.0, 0.0),
            CategoryBaseline::fixed_cost("Salaries", 100_000.0, 0.0),
            CategoryBaseline::variable_cost("Ingredients", 300_000.0, 0.02),
        ];

        let result = break_even_from_baseline(&categories, 50.0).unwrap();

        assert_relative_eq!(result.fixed_costs, 300_000.0);
        assert_relative_eq!(result.contribution_margin_ratio, 0.6, epsilon = 1e-12);
        assert_relative_eq!(result.unrounded_break_even_revenue(), 500_000.0, epsilon = 1e-6);
        assert_eq!(result.break_even_transactions, 10_000);
        assert_relative_eq!(result.safety_margin_pct, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_break_even_from_baseline_without_revenue() {
        let categories = vec![CategoryBaseline::fixed_cost("Rent", 200.0, 0.0)];
        assert!(break_even_from_baseline(&categories, 50.0).unwrap_err().is_invalid_input());
        assert!(break_even_from_baseline(&categories, 0.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_product_mix_weighting() {
        let mix = ProductMix::new(vec![
            ProductLine { name: "Coffee".into(), share: 3.0, price: 40.0, variable_cost: 12.0 },
            ProductLine { name: "Pastry".into(), share: 1.0, price: 30.0, variable_cost: 16.0 },
        ]);

        let (price, variable) = mix.weighted_unit_economics().unwrap();
        assert_relative_eq!(price, 37.5);
        assert_relative_eq!(variable, 13.0);

        let result = mix.break_even(24_500.0, 50_000.0).unwrap();
        assert_relative_eq!(result.contribution_margin_per_transaction, 24.5);
        assert_eq!(result.break_even_transactions, 1_000);
    }

    #[test]
    fn test_empty_mix_rejected() {
        assert!(ProductMix::default().weighted_unit_economics().unwrap_err().is_invalid_input());
    }
}
