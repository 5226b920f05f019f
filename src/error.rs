//! Error types shared by the projection, break-even and configuration layers

use thiserror::Error;

/// Errors raised by the forecasting library
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A precondition on caller-supplied input was violated.
    ///
    /// Raised before any output is produced; `field` names the offending
    /// input and `constraint` the rule it broke.
    #[error("invalid input: {field} {constraint}")]
    InvalidInput { field: String, constraint: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ForecastError {
    pub fn invalid(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// True for precondition violations (as opposed to I/O or parse failures)
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ForecastError::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field_and_constraint() {
        let err = ForecastError::invalid("months", "must be at least 1 (got 0)");
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "invalid input: months must be at least 1 (got 0)");
    }

    #[test]
    fn test_parse_error_is_not_invalid_input() {
        let err = ForecastError::Parse("Unknown Kind: tax".into());
        assert!(!err.is_invalid_input());
    }
}
