//! Weighted average cost of capital.
//!
//! Cost of equity comes from CAPM, `Re = Rf + beta * (Rm - Rf)`. Debt is
//! priced at a flat rate once the company carries any, and is tax-shielded:
//!
//! `WACC = E/(E+D) * Re + D/(E+D) * Rd * (1 - Tc)`
//!
//! where `E` is market capitalisation and `D` is long-term plus short-term debt.

use analysis_core::{AnalysisError, BalanceSheet, MarketData};
use serde::{Deserialize, Serialize};

pub const RISK_FREE_RATE: f64 = 0.0435;
pub const MARKET_RETURN: f64 = 0.085;
pub const CORPORATE_TAX_RATE: f64 = 0.21;
pub const COST_OF_DEBT: f64 = 0.055;

/// Market assumptions feeding the WACC calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalParams {
    pub risk_free_rate: f64,
    /// Expected market return (Rm). The equity premium is `Rm - Rf`.
    pub market_return: f64,
    pub tax_rate: f64,
    /// Pre-tax cost of debt applied when total debt is positive.
    pub cost_of_debt: f64,
}

impl Default for CostOfCapitalParams {
    fn default() -> Self {
        Self {
            risk_free_rate: RISK_FREE_RATE,
            market_return: MARKET_RETURN,
            tax_rate: CORPORATE_TAX_RATE,
            cost_of_debt: COST_OF_DEBT,
        }
    }
}

/// Result of the WACC step. `total_debt` is available whenever the inputs
/// were well-formed, even if WACC itself is not.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostOfCapital {
    pub wacc: Option<f64>,
    pub total_debt: Option<f64>,
}

/// Compute WACC and total debt. Any malformed input (a non-finite figure)
/// makes both values unavailable.
pub fn cost_of_capital(
    market: &MarketData,
    balance_sheet: &BalanceSheet,
    params: &CostOfCapitalParams,
) -> CostOfCapital {
    match try_cost_of_capital(market, balance_sheet, params) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("WACC and total debt unavailable: {}", e);
            CostOfCapital::default()
        }
    }
}

fn try_cost_of_capital(
    market: &MarketData,
    balance_sheet: &BalanceSheet,
    params: &CostOfCapitalParams,
) -> Result<CostOfCapital, AnalysisError> {
    let price = well_formed(market.price, "price")?;
    let shares = well_formed(market.shares_outstanding, "shares outstanding")?;
    let beta = well_formed(market.beta, "beta")?;
    let long_term_debt = well_formed(balance_sheet.long_term_debt, "long-term debt")?;
    let short_term_debt = well_formed(balance_sheet.short_term_debt, "short-term debt")?;

    let total_debt = long_term_debt.unwrap_or(0.0) + short_term_debt.unwrap_or(0.0);
    if !total_debt.is_finite() {
        return Err(AnalysisError::MissingOrInvalidInput(format!(
            "total debt overflows ({})",
            total_debt
        )));
    }

    let market_cap = match (price, shares) {
        (Some(p), Some(s)) => Some(p * s),
        _ => None,
    };
    let cost_of_equity =
        beta.map(|b| params.risk_free_rate + b * (params.market_return - params.risk_free_rate));
    let cost_of_debt = if total_debt > 0.0 { params.cost_of_debt } else { 0.0 };

    let wacc = match (market_cap, cost_of_equity) {
        (Some(equity), Some(re)) if equity + total_debt != 0.0 => {
            let capital = equity + total_debt;
            let value = (equity / capital) * re
                + (total_debt / capital) * cost_of_debt * (1.0 - params.tax_rate);
            value.is_finite().then_some(value)
        }
        _ => None,
    };

    Ok(CostOfCapital {
        wacc,
        total_debt: Some(total_debt),
    })
}

fn well_formed(value: Option<f64>, field: &str) -> Result<Option<f64>, AnalysisError> {
    match value {
        Some(v) if !v.is_finite() => Err(AnalysisError::MissingOrInvalidInput(format!(
            "{} is not a finite number ({})",
            field, v
        ))),
        other => Ok(other),
    }
}
