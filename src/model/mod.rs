//! Input records: category baselines, scenario profiles and their loaders

mod category;
mod profile;
pub mod loader;

pub use category::{CategoryBaseline, CategoryKind, total_baseline};
pub use profile::{GrowthModifier, ScenarioName, ScenarioProfile};
pub use loader::{load_categories, load_categories_from_reader};
