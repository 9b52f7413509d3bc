//! Return on invested capital and economic value added.

use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};

use crate::metrics::divide;

/// Debt plus equity, when both are known
pub fn invested_capital(total_debt: Option<f64>, total_equity: Option<f64>) -> Option<f64> {
    Some(total_debt? + total_equity?)
}

/// EBIT over invested capital
pub fn roic(
    ebit: Option<f64>,
    total_debt: Option<f64>,
    total_equity: Option<f64>,
) -> Result<f64, AnalysisError> {
    divide(ebit, invested_capital(total_debt, total_equity), "EBIT", "invested capital")
}

/// ROIC minus WACC
pub fn eva(roic: Option<f64>, wacc: Option<f64>) -> Result<f64, AnalysisError> {
    let roic = roic.ok_or_else(|| AnalysisError::missing("ROIC"))?;
    let wacc = wacc.ok_or_else(|| AnalysisError::missing("WACC"))?;
    Ok(roic - wacc)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueCreation {
    CreatesValue,
    DestroysValue,
    InsufficientData,
}

impl ValueCreation {
    pub fn classify(roic: Option<f64>, wacc: Option<f64>) -> Self {
        match (roic, wacc) {
            (Some(r), Some(w)) if r > w => ValueCreation::CreatesValue,
            (Some(_), Some(_)) => ValueCreation::DestroysValue,
            _ => ValueCreation::InsufficientData,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            ValueCreation::CreatesValue => "Creates value (ROIC > WACC)",
            ValueCreation::DestroysValue => "Destroys value (ROIC <= WACC)",
            ValueCreation::InsufficientData => "Insufficient data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_roic() {
        let r = roic(Some(30.0), Some(100.0), Some(200.0)).unwrap();
        assert_abs_diff_eq!(r, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_roic_needs_every_input() {
        assert!(roic(None, Some(100.0), Some(200.0)).is_err());
        assert!(roic(Some(30.0), None, Some(200.0)).is_err());
        assert!(roic(Some(30.0), Some(100.0), None).is_err());
        // debt exactly offsets negative equity
        assert!(roic(Some(30.0), Some(100.0), Some(-100.0)).is_err());
    }

    #[test]
    fn test_eva() {
        assert_abs_diff_eq!(eva(Some(0.15), Some(0.09)).unwrap(), 0.06, epsilon = 1e-12);
        assert!(eva(None, Some(0.09)).is_err());
        assert!(eva(Some(0.15), None).is_err());
    }

    #[test]
    fn test_value_creation() {
        assert_eq!(ValueCreation::classify(Some(0.12), Some(0.08)), ValueCreation::CreatesValue);
        assert_eq!(ValueCreation::classify(Some(0.08), Some(0.08)), ValueCreation::DestroysValue);
        assert_eq!(ValueCreation::classify(Some(0.02), Some(0.08)), ValueCreation::DestroysValue);
        assert_eq!(ValueCreation::classify(None, Some(0.08)), ValueCreation::InsufficientData);
        assert_eq!(ValueCreation::classify(Some(0.12), None), ValueCreation::InsufficientData);
    }
}
