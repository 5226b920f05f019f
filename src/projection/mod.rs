//! Monthly cash-flow projection engine and summary statistics

mod state;
mod engine;
mod cashflows;
pub mod stats;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig, project, validate_inputs};
pub use cashflows::{ProjectionPoint, ProjectionResult, ProjectionSummary};
