use analysis_core::{AnalysisError, BalanceSheet, CashFlow};
use serde::{Deserialize, Serialize};

use crate::metrics::divide;

/// Operating cash flow over current liabilities
pub fn cash_flow_ratio(cash_flow: &CashFlow, balance_sheet: &BalanceSheet) -> Result<f64, AnalysisError> {
    divide(
        cash_flow.operating_cash_flow,
        balance_sheet.total_current_liabilities,
        "operating cash flow",
        "current liabilities",
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityStatus {
    Excellent,
    Acceptable,
    Concerning,
    InsufficientData,
}

impl LiquidityStatus {
    /// Grade the four liquidity ratios. Needs all of them.
    pub fn classify(
        current_ratio: Option<f64>,
        quick_ratio: Option<f64>,
        cash_ratio: Option<f64>,
        cash_flow_ratio: Option<f64>,
    ) -> Self {
        let (Some(current), Some(quick), Some(cash), Some(cash_flow)) =
            (current_ratio, quick_ratio, cash_ratio, cash_flow_ratio)
        else {
            return LiquidityStatus::InsufficientData;
        };

        if current > 1.5 && quick > 1.0 && cash > 0.5 && cash_flow > 0.4 {
            LiquidityStatus::Excellent
        } else if current < 1.0 || quick < 0.5 || cash < 0.2 || cash_flow < 0.2 {
            LiquidityStatus::Concerning
        } else {
            LiquidityStatus::Acceptable
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            LiquidityStatus::Excellent => "Excellent liquidity",
            LiquidityStatus::Acceptable => "Acceptable liquidity",
            LiquidityStatus::Concerning => "Concerning liquidity",
            LiquidityStatus::InsufficientData => "Insufficient data",
        }
    }
}
