//! Load category baselines from a CSV file
//!
//! Expected header: `Category,Kind,Baseline,GrowthRate`

use super::{CategoryBaseline, CategoryKind};
use crate::error::{ForecastError, Result};
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the category file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Baseline")]
    baseline: f64,
    #[serde(rename = "GrowthRate")]
    growth_rate: f64,
}

impl CsvRow {
    fn to_category(self) -> Result<CategoryBaseline> {
        let kind = CategoryKind::parse(&self.kind).ok_or_else(|| {
            ForecastError::Parse(format!("Unknown Kind for category {:?}: {}", self.category, self.kind))
        })?;

        Ok(CategoryBaseline::new(self.category.trim(), kind, self.baseline, self.growth_rate))
    }
}

/// Load all categories from a CSV file, preserving file order
pub fn load_categories<P: AsRef<Path>>(path: P) -> Result<Vec<CategoryBaseline>> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load categories from any reader (e.g., string buffer, stdin)
pub fn load_categories_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<CategoryBaseline>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<CategoryBaseline>> {
    let mut categories = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        categories.push(row.to_category()?);
    }

    log::debug!("loaded {} categories", categories.len());
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_categories_from_reader() {
        let data = "\
Category,Kind,Baseline,GrowthRate
Beverage Sales,revenue,480000000,0.03
Rent,fixed_cost,85000000,0
Coffee Beans,variable_cost,120000000,0.025
";
        let categories = load_categories_from_reader(data.as_bytes()).unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name(), "Beverage Sales");
        assert_eq!(categories[0].kind(), CategoryKind::Revenue);
        assert_eq!(categories[1].baseline(), 85_000_000.0);
        assert_eq!(categories[2].growth_rate(), 0.025);
    }

    #[test]
    fn test_load_bundled_categories() {
        let categories = load_categories("data/categories.csv").expect("Failed to load categories");
        assert_eq!(categories, crate::assumptions::CaseFile::default_cafe().categories);
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let data = "Category,Kind,Baseline,GrowthRate\nTax,levy,10,0\n";
        let err = load_categories_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
    }

    #[test]
    fn test_non_numeric_baseline_is_csv_error() {
        let data = "Category,Kind,Baseline,GrowthRate\nRent,fixed_cost,lots,0\n";
        let err = load_categories_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::Csv(_)));
    }
}
