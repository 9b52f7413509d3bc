use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A required field was absent or outside the numeric domain of a formula
    /// (zero denominator, non-finite value, negative base for a fractional power).
    #[error("Missing or invalid input: {0}")]
    MissingOrInvalidInput(String),

    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AnalysisError {
    pub fn missing(field: &str) -> Self {
        AnalysisError::MissingOrInvalidInput(format!("{} is unavailable", field))
    }

    pub fn zero_denominator(field: &str) -> Self {
        AnalysisError::MissingOrInvalidInput(format!("{} is zero", field))
    }
}
