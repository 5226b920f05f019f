//! Cash-flow forecasting engine for small-business scenario analysis
//!
//! This library provides:
//! - Monthly cash-flow projections with compound category growth
//! - Summary statistics (mean, population volatility, OLS trend)
//! - Break-even analysis from unit economics, product mixes or a baseline month
//! - Multi-scenario running, ranking and risk range
//! - Growth sensitivity sweeps
//! - CSV and JSON export of plain result records

pub mod error;
pub mod model;
pub mod assumptions;
pub mod projection;
pub mod breakeven;
pub mod scenario;
pub mod sensitivity;
pub mod report;

// Re-export commonly used types
pub use error::{ForecastError, Result};
pub use model::{CategoryBaseline, CategoryKind, GrowthModifier, ScenarioName, ScenarioProfile};
pub use assumptions::CaseFile;
pub use projection::{project, ProjectionEngine, ProjectionPoint, ProjectionResult, ProjectionSummary};
pub use breakeven::{compute_break_even, BreakEvenResult, SafetyStatus};
pub use scenario::{compare, ScenarioComparison, ScenarioRunner};
