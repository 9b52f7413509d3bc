//! Compound annual growth over statement histories.

use analysis_core::{AnalysisError, History, HISTORY_DEPTH};
use serde::{Deserialize, Serialize};

use crate::metrics::{resolve, Indicator};

/// CAGR of a most-recent-first series. Missing entries are dropped before
/// counting periods; at most [`HISTORY_DEPTH`] usable values are considered.
pub fn cagr(series: &[Option<f64>]) -> Result<f64, AnalysisError> {
    let values: Vec<f64> = series
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .take(HISTORY_DEPTH)
        .collect();

    if values.len() < 2 {
        return Err(AnalysisError::MissingOrInvalidInput(format!(
            "need at least 2 periods, found {}",
            values.len()
        )));
    }

    let periods = (values.len() - 1) as f64;
    let oldest = values[values.len() - 1];
    let latest = values[0];
    if oldest == 0.0 {
        return Err(AnalysisError::zero_denominator("oldest period"));
    }

    let ratio = latest / oldest;
    if ratio < 0.0 && periods > 1.0 {
        return Err(AnalysisError::MissingOrInvalidInput(format!(
            "negative growth base {:.4} over {} periods",
            ratio, periods
        )));
    }

    Ok(ratio.powf(1.0 / periods) - 1.0)
}

/// [`cagr`] with failures folded to unavailable
pub fn historical_growth(series: &[Option<f64>]) -> Option<f64> {
    cagr(series).ok().filter(|g| g.is_finite())
}

/// Free-cash-flow growth, falling back to operating cash flow only when the
/// dedicated series yields nothing.
pub fn fcf_growth(history: &History) -> Option<f64> {
    historical_growth(&history.free_cash_flow).or_else(|| {
        tracing::debug!("FCF history unusable, falling back to operating cash flow");
        historical_growth(&history.operating_cash_flow)
    })
}

/// Revenue, EPS (net income proxy) and FCF growth rates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthRates {
    pub revenue: Option<f64>,
    pub eps: Option<f64>,
    pub fcf: Option<f64>,
}

pub fn growth_rates(history: &History) -> GrowthRates {
    GrowthRates {
        revenue: resolve(Indicator::RevenueGrowth, cagr(&history.total_revenue)),
        eps: resolve(Indicator::EpsGrowth, cagr(&history.net_income)),
        fcf: fcf_growth(history),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthProfile {
    /// Revenue, EPS and FCF all growing
    Consistent,
    /// Revenue and EPS growing; FCF not (or unknown)
    Partial,
    NegativeInSome,
    /// Every rate known, none negative, but not all positive either
    NoClearTrend,
    Unavailable,
}

impl GrowthProfile {
    pub fn classify(revenue: Option<f64>, eps: Option<f64>, fcf: Option<f64>) -> Self {
        let positive = |g: Option<f64>| g.is_some_and(|v| v > 0.0);

        if positive(revenue) && positive(eps) && positive(fcf) {
            GrowthProfile::Consistent
        } else if positive(revenue) && positive(eps) {
            GrowthProfile::Partial
        } else if [revenue, eps, fcf].iter().flatten().any(|&g| g < 0.0) {
            GrowthProfile::NegativeInSome
        } else if revenue.is_none() || eps.is_none() || fcf.is_none() {
            GrowthProfile::Unavailable
        } else {
            GrowthProfile::NoClearTrend
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            GrowthProfile::Consistent => "Consistent growth",
            GrowthProfile::Partial => "Partial growth",
            GrowthProfile::NegativeInSome => "Negative in some metrics",
            GrowthProfile::NoClearTrend => "No clear trend",
            GrowthProfile::Unavailable => "Unavailable",
        }
    }
}
