use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};

/// Names of every derived indicator, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Wacc,
    TotalDebt,
    Roic,
    Eva,
    PriceToFcf,
    RevenueGrowth,
    EpsGrowth,
    FcfGrowth,
    CashFlowRatio,
    DebtToEquity,
    DebtToAssets,
    InterestCoverage,
    CashFlowToDebt,
    NetDebtToEbitda,
}

impl Indicator {
    pub const ALL: [Indicator; 14] = [
        Indicator::Wacc,
        Indicator::TotalDebt,
        Indicator::Roic,
        Indicator::Eva,
        Indicator::PriceToFcf,
        Indicator::RevenueGrowth,
        Indicator::EpsGrowth,
        Indicator::FcfGrowth,
        Indicator::CashFlowRatio,
        Indicator::DebtToEquity,
        Indicator::DebtToAssets,
        Indicator::InterestCoverage,
        Indicator::CashFlowToDebt,
        Indicator::NetDebtToEbitda,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Wacc => "WACC",
            Indicator::TotalDebt => "Total Debt",
            Indicator::Roic => "ROIC",
            Indicator::Eva => "EVA",
            Indicator::PriceToFcf => "P/FCF",
            Indicator::RevenueGrowth => "Revenue Growth",
            Indicator::EpsGrowth => "EPS Growth",
            Indicator::FcfGrowth => "FCF Growth",
            Indicator::CashFlowRatio => "Cash Flow Ratio",
            Indicator::DebtToEquity => "Debt-to-Equity",
            Indicator::DebtToAssets => "Debt-to-Assets",
            Indicator::InterestCoverage => "Interest Coverage",
            Indicator::CashFlowToDebt => "Cash Flow to Debt",
            Indicator::NetDebtToEbitda => "Net Debt to EBITDA",
        }
    }

    /// Whether the value is a rate that reads best as a percentage
    pub fn is_rate(&self) -> bool {
        matches!(
            self,
            Indicator::Wacc
                | Indicator::Roic
                | Indicator::Eva
                | Indicator::RevenueGrowth
                | Indicator::EpsGrowth
                | Indicator::FcfGrowth
        )
    }
}

/// Derived indicators for one company. `None` means unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub wacc: Option<f64>,
    pub total_debt: Option<f64>,
    pub roic: Option<f64>,
    pub eva: Option<f64>,
    pub price_to_fcf: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub eps_growth: Option<f64>,
    pub fcf_growth: Option<f64>,
    pub cash_flow_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub debt_to_assets: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub cash_flow_to_debt: Option<f64>,
    pub net_debt_to_ebitda: Option<f64>,
}

impl DerivedMetrics {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Wacc => self.wacc,
            Indicator::TotalDebt => self.total_debt,
            Indicator::Roic => self.roic,
            Indicator::Eva => self.eva,
            Indicator::PriceToFcf => self.price_to_fcf,
            Indicator::RevenueGrowth => self.revenue_growth,
            Indicator::EpsGrowth => self.eps_growth,
            Indicator::FcfGrowth => self.fcf_growth,
            Indicator::CashFlowRatio => self.cash_flow_ratio,
            Indicator::DebtToEquity => self.debt_to_equity,
            Indicator::DebtToAssets => self.debt_to_assets,
            Indicator::InterestCoverage => self.interest_coverage,
            Indicator::CashFlowToDebt => self.cash_flow_to_debt,
            Indicator::NetDebtToEbitda => self.net_debt_to_ebitda,
        }
    }

    /// Flat indicator mapping; every indicator is present.
    pub fn entries(&self) -> Vec<(Indicator, Option<f64>)> {
        Indicator::ALL.iter().map(|&i| (i, self.get(i))).collect()
    }
}

/// `numerator / denominator`, failing when either side is missing or the
/// denominator is zero.
pub(crate) fn divide(
    numerator: Option<f64>,
    denominator: Option<f64>,
    numerator_name: &str,
    denominator_name: &str,
) -> Result<f64, AnalysisError> {
    let n = numerator.ok_or_else(|| AnalysisError::missing(numerator_name))?;
    let d = denominator.ok_or_else(|| AnalysisError::missing(denominator_name))?;
    if d == 0.0 {
        return Err(AnalysisError::zero_denominator(denominator_name));
    }
    Ok(n / d)
}

/// Collapse a computation step into an indicator value. Errors and
/// non-finite results both become unavailable.
pub(crate) fn resolve(indicator: Indicator, result: Result<f64, AnalysisError>) -> Option<f64> {
    match result {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            tracing::debug!("{} unavailable: non-finite result {}", indicator.label(), value);
            None
        }
        Err(e) => {
            tracing::debug!("{} unavailable: {}", indicator.label(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_cover_every_indicator() {
        let metrics = DerivedMetrics {
            wacc: Some(0.08),
            ..Default::default()
        };
        let entries = metrics.entries();
        assert_eq!(entries.len(), Indicator::ALL.len());
        assert_eq!(entries[0], (Indicator::Wacc, Some(0.08)));
        assert!(entries[1..].iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_divide_rejects_zero_and_missing() {
        assert_eq!(divide(Some(6.0), Some(3.0), "a", "b"), Ok(2.0));
        assert!(matches!(
            divide(Some(1.0), Some(0.0), "a", "b"),
            Err(AnalysisError::MissingOrInvalidInput(_))
        ));
        assert!(divide(None, Some(1.0), "a", "b").is_err());
        assert!(divide(Some(1.0), None, "a", "b").is_err());
    }

    #[test]
    fn test_resolve_filters_non_finite() {
        assert_eq!(resolve(Indicator::Roic, Ok(0.12)), Some(0.12));
        assert_eq!(resolve(Indicator::Roic, Ok(f64::INFINITY)), None);
        assert_eq!(resolve(Indicator::Roic, Ok(f64::NAN)), None);
        assert_eq!(resolve(Indicator::Roic, Err(AnalysisError::missing("EBIT"))), None);
    }
}
