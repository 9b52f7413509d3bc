use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AnalysisError;

const MAX_TICKER_LEN: usize = 15;

/// Upper-cased, validated ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Trim and upper-case `input`. Accepts letters, digits and `.` `-` `^` `=`
    /// (index and FX symbols such as `^GSPC` or `EURUSD=X`).
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::InvalidTicker("empty ticker".to_string()));
        }

        let normalized = trimmed.to_ascii_uppercase();
        if normalized.len() > MAX_TICKER_LEN {
            return Err(AnalysisError::InvalidTicker(format!(
                "{} exceeds {} characters",
                normalized, MAX_TICKER_LEN
            )));
        }

        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(AnalysisError::InvalidTicker(format!(
                "{} contains invalid character '{}'",
                normalized, bad
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}
