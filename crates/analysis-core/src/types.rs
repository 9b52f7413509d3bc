use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Ticker;

/// Number of trailing statement periods kept for growth calculations.
pub const HISTORY_DEPTH: usize = 4;

/// Descriptive company fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

/// Quote-level market data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub price: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub beta: Option<f64>,
}

/// Ratios reported directly by the provider. Passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRatios {
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    /// Annual dividend per share.
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub long_term_debt_to_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub operating_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub cash_ratio: Option<f64>,
}

/// Most recent balance sheet line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub long_term_debt: Option<f64>,
    pub short_term_debt: Option<f64>,
    pub total_stockholder_equity: Option<f64>,
    pub total_current_liabilities: Option<f64>,
    pub total_assets: Option<f64>,
    pub cash: Option<f64>,
}

/// Most recent income statement line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub ebit: Option<f64>,
    pub interest_expense: Option<f64>,
}

/// Most recent cash flow line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub operating_cash_flow: Option<f64>,
}

/// Statement histories, most recent period first, at most [`HISTORY_DEPTH`] entries.
/// Individual periods may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub total_revenue: Vec<Option<f64>>,
    pub net_income: Vec<Option<f64>>,
    pub free_cash_flow: Vec<Option<f64>>,
    pub operating_cash_flow: Vec<Option<f64>>,
}

/// Raw per-company financial snapshot as delivered by the retrieval layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub ticker: Ticker,
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub market: MarketData,
    #[serde(default)]
    pub ratios: ProviderRatios,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub income: IncomeStatement,
    #[serde(default)]
    pub cash_flow: CashFlow,
    #[serde(default)]
    pub history: History,
}

impl RawSnapshot {
    /// Empty snapshot for `ticker`; every figure unavailable.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            as_of: Utc::now(),
            identity: Identity::default(),
            market: MarketData::default(),
            ratios: ProviderRatios::default(),
            balance_sheet: BalanceSheet::default(),
            income: IncomeStatement::default(),
            cash_flow: CashFlow::default(),
            history: History::default(),
        }
    }

    /// Company name, falling back to the ticker
    pub fn display_name(&self) -> &str {
        self.identity.name.as_deref().unwrap_or_else(|| self.ticker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot_is_empty() {
        let snapshot = RawSnapshot::new(Ticker::parse("aapl").unwrap());
        assert_eq!(snapshot.ticker.as_str(), "AAPL");
        assert!(snapshot.market.price.is_none());
        assert!(snapshot.history.total_revenue.is_empty());
        assert_eq!(snapshot.display_name(), "AAPL");
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_groups() {
        let snapshot: RawSnapshot = serde_json::from_value(serde_json::json!({
            "ticker": "msft",
            "as_of": "2024-01-02T00:00:00Z",
            "market": { "price": 410.5 }
        }))
        .unwrap();
        assert_eq!(snapshot.ticker.as_str(), "MSFT");
        assert_eq!(snapshot.market.price, Some(410.5));
        assert_eq!(snapshot.balance_sheet, BalanceSheet::default());
    }
}
