//! Growth sensitivity sweep
//!
//! Projects the same baselines under a grid of uniform growth shifts. Each
//! projection is independent, so the grid runs on rayon's thread pool.

use crate::error::Result;
use crate::model::{CategoryBaseline, GrowthModifier, ScenarioName, ScenarioProfile};
use crate::projection::{ProjectionConfig, ProjectionEngine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one shift in the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Uniform monthly growth shift applied to every category
    pub shift: f64,
    pub final_balance: f64,
    pub min_balance: f64,
    pub mean_net_cash_flow: f64,
    /// First month with a negative ending balance
    pub first_deficit_month: Option<u32>,
}

/// Evenly spaced shifts from `from` to `to` inclusive
pub fn shift_grid(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (steps - 1) as f64;
            (0..steps).map(|i| from + step * i as f64).collect()
        }
    }
}

/// Project every shift; output order matches `shifts`.
///
/// Fails with the first invalid-input error if any shift pushes a category
/// rate to -100% or below.
pub fn sweep(
    categories: &[CategoryBaseline],
    config: &ProjectionConfig,
    shifts: &[f64],
) -> Result<Vec<SensitivityPoint>> {
    let engine = ProjectionEngine::new(categories.to_vec(), config.clone());

    let points = shifts
        .par_iter()
        .map(|&shift| {
            let profile = ScenarioProfile::new(ScenarioName::Base, GrowthModifier::Uniform(shift));
            let result = engine.project(&profile)?;
            Ok(SensitivityPoint {
                shift,
                final_balance: result.summary.final_balance,
                min_balance: result.summary.min_balance,
                mean_net_cash_flow: result.summary.mean_net_cash_flow,
                first_deficit_month: result.summary.first_deficit_month,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("sensitivity sweep: {} shifts projected", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn categories() -> Vec<CategoryBaseline> {
        vec![
            CategoryBaseline::revenue("Sales", 750.0, 0.0),
            CategoryBaseline::fixed_cost("Costs", 625.0, 0.0),
        ]
    }

    #[test]
    fn test_shift_grid() {
        let grid = shift_grid(-0.02, 0.02, 5);
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[0], -0.02);
        assert_relative_eq!(grid[2], 0.0, epsilon = 1e-15);
        assert_relative_eq!(grid[4], 0.02, epsilon = 1e-15);
        assert!(shift_grid(0.0, 1.0, 0).is_empty());
        assert_eq!(shift_grid(0.01, 1.0, 1), vec![0.01]);
    }

    #[test]
    fn test_sweep_preserves_order() {
        let config = ProjectionConfig { projection_months: 6, starting_balance: 100.0 };
        let shifts = shift_grid(-0.05, 0.05, 11);
        let points = sweep(&categories(), &config, &shifts).unwrap();

        assert_eq!(points.len(), shifts.len());
        for (point, shift) in points.iter().zip(&shifts) {
            assert_eq!(point.shift, *shift);
        }
    }

    #[test]
    fn test_uniform_shift_scales_net_flow() {
        // With a uniform shift both lines grow together, so net flow grows with them
        let config = ProjectionConfig { projection_months: 6, starting_balance: 100.0 };
        let points = sweep(&categories(), &config, &[-0.05, 0.0, 0.05]).unwrap();

        assert!(points[0].final_balance < points[1].final_balance);
        assert!(points[1].final_balance < points[2].final_balance);
        assert_relative_eq!(points[1].final_balance, 100.0 + 6.0 * 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_rejects_degenerate_shift() {
        let config = ProjectionConfig { projection_months: 3, starting_balance: 0.0 };
        let err = sweep(&categories(), &config, &[0.0, -1.0]).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
