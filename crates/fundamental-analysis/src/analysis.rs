use analysis_core::{Identity, MarketData, ProviderRatios, RawSnapshot, Ticker};
use serde::{Deserialize, Serialize};

use crate::growth::GrowthProfile;
use crate::liquidity::LiquidityStatus;
use crate::metrics::DerivedMetrics;
use crate::returns::ValueCreation;
use crate::solvency::{SolvencyAssessment, SolvencyRatios};

/// Everything the presentation layer needs for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub ticker: Ticker,
    pub identity: Identity,
    pub market: MarketData,
    /// Provider ratios, unchanged
    pub ratios: ProviderRatios,
    pub metrics: DerivedMetrics,
    pub solvency: SolvencyAssessment,
    pub liquidity: LiquidityStatus,
    pub value_creation: ValueCreation,
    pub growth: GrowthProfile,
}

impl CompanyAnalysis {
    pub fn from_snapshot(snapshot: &RawSnapshot, metrics: DerivedMetrics) -> Self {
        let solvency = SolvencyAssessment::assess(&SolvencyRatios {
            debt_to_equity: metrics.debt_to_equity,
            debt_to_assets: metrics.debt_to_assets,
            interest_coverage: metrics.interest_coverage,
            cash_flow_to_debt: metrics.cash_flow_to_debt,
            net_debt_to_ebitda: metrics.net_debt_to_ebitda,
        });
        let liquidity = LiquidityStatus::classify(
            snapshot.ratios.current_ratio,
            snapshot.ratios.quick_ratio,
            snapshot.ratios.cash_ratio,
            metrics.cash_flow_ratio,
        );
        let value_creation = ValueCreation::classify(metrics.roic, metrics.wacc);
        let growth = GrowthProfile::classify(metrics.revenue_growth, metrics.eps_growth, metrics.fcf_growth);

        Self {
            ticker: snapshot.ticker.clone(),
            identity: snapshot.identity.clone(),
            market: snapshot.market.clone(),
            ratios: snapshot.ratios.clone(),
            metrics,
            solvency,
            liquidity,
            value_creation,
            growth,
        }
    }

    pub fn display_name(&self) -> &str {
        self.identity.name.as_deref().unwrap_or_else(|| self.ticker.as_str())
    }

    /// ROIC minus WACC, when both are known
    pub fn value_spread(&self) -> Option<f64> {
        self.metrics.eva
    }
}
