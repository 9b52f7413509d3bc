use analysis_core::{AnalysisError, CashFlow, MarketData};

use crate::metrics::divide;

/// Price over operating cash flow per share
pub fn price_to_fcf(market: &MarketData, cash_flow: &CashFlow) -> Result<f64, AnalysisError> {
    let price = market.price.ok_or_else(|| AnalysisError::missing("price"))?;
    if cash_flow.operating_cash_flow == Some(0.0) {
        return Err(AnalysisError::zero_denominator("operating cash flow"));
    }
    let per_share = divide(
        cash_flow.operating_cash_flow,
        market.shares_outstanding,
        "operating cash flow",
        "shares outstanding",
    )?;
    Ok(price / per_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn inputs(price: Option<f64>, shares: Option<f64>, ocf: Option<f64>) -> (MarketData, CashFlow) {
        (
            MarketData { price, shares_outstanding: shares, beta: None },
            CashFlow { operating_cash_flow: ocf },
        )
    }

    #[test]
    fn test_price_to_fcf() {
        let (m, c) = inputs(Some(50.0), Some(100.0), Some(1000.0));
        assert_abs_diff_eq!(price_to_fcf(&m, &c).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_price_to_fcf_degenerate_inputs() {
        for (price, shares, ocf) in [
            (None, Some(100.0), Some(1000.0)),
            (Some(50.0), None, Some(1000.0)),
            (Some(50.0), Some(0.0), Some(1000.0)),
            (Some(50.0), Some(100.0), None),
            (Some(50.0), Some(100.0), Some(0.0)),
        ] {
            let (m, c) = inputs(price, shares, ocf);
            assert!(price_to_fcf(&m, &c).is_err(), "{:?}", (price, shares, ocf));
        }
    }
}
