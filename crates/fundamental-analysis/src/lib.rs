//! Metric engine: turns a [`RawSnapshot`] into valuation, solvency, liquidity
//! and growth indicators.
//!
//! Every indicator is computed independently. A missing or degenerate input
//! makes that indicator unavailable (`None`) and never affects the others.

pub mod analysis;
pub mod cost_of_capital;
pub mod growth;
pub mod liquidity;
pub mod metrics;
pub mod returns;
pub mod solvency;
pub mod valuation;

#[cfg(test)]
mod tests;

use analysis_core::RawSnapshot;

pub use analysis::CompanyAnalysis;
pub use cost_of_capital::{cost_of_capital, CostOfCapital, CostOfCapitalParams};
pub use growth::{cagr, fcf_growth, growth_rates, historical_growth, GrowthProfile, GrowthRates};
pub use liquidity::{cash_flow_ratio, LiquidityStatus};
pub use metrics::{DerivedMetrics, Indicator};
pub use returns::{eva, invested_capital, roic, ValueCreation};
pub use solvency::{
    solvency_ratios, SolvencyAlert, SolvencyAssessment, SolvencyCheck, SolvencyRatios, SolvencyStatus,
};
pub use valuation::price_to_fcf;

use metrics::resolve;

pub struct FundamentalAnalysisEngine {
    params: CostOfCapitalParams,
}

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self {
            params: CostOfCapitalParams::default(),
        }
    }

    pub fn with_params(params: CostOfCapitalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CostOfCapitalParams {
        &self.params
    }

    pub fn compute(&self, snapshot: &RawSnapshot) -> DerivedMetrics {
        compute_with(snapshot, &self.params)
    }

    /// Derived metrics plus the four classifications
    pub fn analyze(&self, snapshot: &RawSnapshot) -> CompanyAnalysis {
        CompanyAnalysis::from_snapshot(snapshot, self.compute(snapshot))
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute every derived indicator with the default cost-of-capital assumptions.
pub fn compute(snapshot: &RawSnapshot) -> DerivedMetrics {
    compute_with(snapshot, &CostOfCapitalParams::default())
}

pub fn compute_with(snapshot: &RawSnapshot, params: &CostOfCapitalParams) -> DerivedMetrics {
    let CostOfCapital { wacc, total_debt } =
        cost_of_capital(&snapshot.market, &snapshot.balance_sheet, params);

    let roic = resolve(
        Indicator::Roic,
        returns::roic(
            snapshot.income.ebit,
            total_debt,
            snapshot.balance_sheet.total_stockholder_equity,
        ),
    );
    let eva = resolve(Indicator::Eva, returns::eva(roic, wacc));

    let price_to_fcf = resolve(
        Indicator::PriceToFcf,
        valuation::price_to_fcf(&snapshot.market, &snapshot.cash_flow),
    );

    let growth = growth_rates(&snapshot.history);

    let cash_flow_ratio = resolve(
        Indicator::CashFlowRatio,
        liquidity::cash_flow_ratio(&snapshot.cash_flow, &snapshot.balance_sheet),
    );

    let solvency = solvency_ratios(
        total_debt,
        &snapshot.balance_sheet,
        &snapshot.income,
        &snapshot.cash_flow,
    );

    DerivedMetrics {
        wacc,
        total_debt,
        roic,
        eva,
        price_to_fcf,
        revenue_growth: growth.revenue,
        eps_growth: growth.eps,
        fcf_growth: growth.fcf,
        cash_flow_ratio,
        debt_to_equity: solvency.debt_to_equity,
        debt_to_assets: solvency.debt_to_assets,
        interest_coverage: solvency.interest_coverage,
        cash_flow_to_debt: solvency.cash_flow_to_debt,
        net_debt_to_ebitda: solvency.net_debt_to_ebitda,
    }
}

/// Shorthand for [`FundamentalAnalysisEngine::analyze`] with default parameters.
pub fn analyze(snapshot: &RawSnapshot) -> CompanyAnalysis {
    CompanyAnalysis::from_snapshot(snapshot, compute(snapshot))
}
