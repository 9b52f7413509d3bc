//! Debt sustainability ratios and the risky/healthy verdict built on them.

use analysis_core::{AnalysisError, BalanceSheet, CashFlow, IncomeStatement};
use serde::{Deserialize, Serialize};

use crate::metrics::{divide, resolve, Indicator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvencyRatios {
    pub debt_to_equity: Option<f64>,
    pub debt_to_assets: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub cash_flow_to_debt: Option<f64>,
    /// EBIT stands in for EBITDA.
    pub net_debt_to_ebitda: Option<f64>,
}

pub fn solvency_ratios(
    total_debt: Option<f64>,
    balance_sheet: &BalanceSheet,
    income: &IncomeStatement,
    cash_flow: &CashFlow,
) -> SolvencyRatios {
    SolvencyRatios {
        debt_to_equity: resolve(
            Indicator::DebtToEquity,
            divide(total_debt, balance_sheet.total_stockholder_equity, "total debt", "equity"),
        ),
        debt_to_assets: resolve(
            Indicator::DebtToAssets,
            divide(total_debt, balance_sheet.total_assets, "total debt", "total assets"),
        ),
        interest_coverage: resolve(
            Indicator::InterestCoverage,
            divide(income.ebit, income.interest_expense, "EBIT", "interest expense"),
        ),
        cash_flow_to_debt: resolve(
            Indicator::CashFlowToDebt,
            divide(cash_flow.operating_cash_flow, total_debt, "operating cash flow", "total debt"),
        ),
        net_debt_to_ebitda: resolve(
            Indicator::NetDebtToEbitda,
            net_debt_to_ebitda(total_debt, balance_sheet.cash, income.ebit),
        ),
    }
}

fn net_debt_to_ebitda(
    total_debt: Option<f64>,
    cash: Option<f64>,
    ebit: Option<f64>,
) -> Result<f64, AnalysisError> {
    let net_debt = total_debt.map(|d| d - cash.unwrap_or(0.0));
    divide(net_debt, ebit, "total debt", "EBIT")
}

/// A single solvency threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolvencyCheck {
    DebtToEquity,
    DebtToAssets,
    InterestCoverage,
    CashFlowToDebt,
    NetDebtToEbitda,
}

impl SolvencyCheck {
    pub fn description(&self) -> &'static str {
        match self {
            SolvencyCheck::DebtToEquity => "Debt/Equity >= 1 indicates excess leverage",
            SolvencyCheck::DebtToAssets => "Debt/Assets >= 0.5 indicates heavy indebtedness",
            SolvencyCheck::InterestCoverage => "Interest coverage < 3 suggests difficulty servicing interest",
            SolvencyCheck::CashFlowToDebt => "Operating cash flow/Debt < 0.2 leaves a thin repayment margin",
            SolvencyCheck::NetDebtToEbitda => "Net debt/EBITDA > 3 implies financial pressure",
        }
    }

    fn triggered(&self, value: f64) -> bool {
        match self {
            SolvencyCheck::DebtToEquity => value >= 1.0,
            SolvencyCheck::DebtToAssets => value >= 0.5,
            SolvencyCheck::InterestCoverage => value < 3.0,
            SolvencyCheck::CashFlowToDebt => value < 0.2,
            SolvencyCheck::NetDebtToEbitda => value > 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvencyAlert {
    pub check: SolvencyCheck,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolvencyStatus {
    Healthy,
    Risky,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvencyAssessment {
    pub status: SolvencyStatus,
    pub alerts: Vec<SolvencyAlert>,
}

impl SolvencyAssessment {
    /// Risky if any available ratio crosses its threshold. Unavailable ratios
    /// are skipped.
    pub fn assess(ratios: &SolvencyRatios) -> Self {
        let checks = [
            (SolvencyCheck::DebtToEquity, ratios.debt_to_equity),
            (SolvencyCheck::DebtToAssets, ratios.debt_to_assets),
            (SolvencyCheck::InterestCoverage, ratios.interest_coverage),
            (SolvencyCheck::CashFlowToDebt, ratios.cash_flow_to_debt),
            (SolvencyCheck::NetDebtToEbitda, ratios.net_debt_to_ebitda),
        ];

        let alerts: Vec<SolvencyAlert> = checks
            .into_iter()
            .filter_map(|(check, value)| {
                value
                    .filter(|&v| check.triggered(v))
                    .map(|value| SolvencyAlert { check, value })
            })
            .collect();

        let status = if alerts.is_empty() {
            SolvencyStatus::Healthy
        } else {
            SolvencyStatus::Risky
        };

        Self { status, alerts }
    }

    pub fn to_label(&self) -> &'static str {
        match self.status {
            SolvencyStatus::Healthy => "Healthy debt structure",
            SolvencyStatus::Risky => "Risky indebtedness",
        }
    }
}
