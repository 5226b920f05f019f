//! Descriptive statistics over monthly series
//!
//! All functions take the series in month order. Empty input yields 0.0 for
//! the location/scale measures so callers never divide by zero.

use serde::{Deserialize, Serialize};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N, not N-1)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their index (0, 1, 2, ...)
///
/// A single point has no trend and returns 0.0.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    sxy / sxx
}

/// Pearson correlation coefficient
///
/// None when the series differ in length, are empty, or either has zero variance.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }

    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// Sample standard deviation (divides by N-1); 0.0 below two points
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Quantile of an ascending-sorted series, linearly interpolated between ranks
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Count, location, spread and five-number summary of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescription {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe a series; None when it is empty
pub fn describe(values: &[f64]) -> Option<SeriesDescription> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(SeriesDescription {
        count: values.len(),
        mean: mean(values),
        std_dev: sample_std_dev(values),
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Qualitative reading of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    /// Above 0.8 is strong, above 0.5 moderate, anything else weak
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.8 {
            CorrelationStrength::Strong
        } else if r > 0.5 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong positive correlation",
            CorrelationStrength::Moderate => "moderate positive correlation",
            CorrelationStrength::Weak => "weak correlation",
        }
    }
}
