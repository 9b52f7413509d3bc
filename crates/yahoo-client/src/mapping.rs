//! quoteSummary payload -> [`RawSnapshot`].
//!
//! Yahoo wraps most numbers as `{ "raw": 123.0, "fmt": "123" }`; an empty
//! object `{}` means the figure is not reported.

use analysis_core::{
    AnalysisError, BalanceSheet, CashFlow, History, Identity, IncomeStatement, MarketData, ProviderRatios,
    RawSnapshot, Ticker, HISTORY_DEPTH,
};
use chrono::Utc;
use serde_json::Value;

/// Numeric value of `field` in `object`, unwrapping `{ "raw": .. }`.
fn raw(object: &Value, field: &str) -> Option<f64> {
    let value = object.get(field)?;
    value
        .get("raw")
        .and_then(|v| v.as_f64())
        .or_else(|| value.as_f64())
}

fn text(object: &Value, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Statement entries of a history module, most recent first
fn statements<'a>(result: &'a Value, module: &str, list: &str) -> &'a [Value] {
    result
        .get(module)
        .and_then(|m| m.get(list))
        .and_then(|v| v.as_array())
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

fn series(statements: &[Value], field: &str) -> Vec<Option<f64>> {
    statements.iter().take(HISTORY_DEPTH).map(|s| raw(s, field)).collect()
}

pub fn snapshot_from_quote_summary(ticker: &Ticker, payload: &Value) -> Result<RawSnapshot, AnalysisError> {
    let summary = payload
        .get("quoteSummary")
        .ok_or_else(|| AnalysisError::ParseError("missing quoteSummary".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        return Err(AnalysisError::NotFound(format!("{}: {}", ticker, description)));
    }

    let result = summary
        .get("result")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .ok_or_else(|| AnalysisError::NotFound(format!("no quoteSummary result for {}", ticker)))?;

    let empty = Value::Null;
    let price = result.get("price").unwrap_or(&empty);
    let detail = result.get("summaryDetail").unwrap_or(&empty);
    let stats = result.get("defaultKeyStatistics").unwrap_or(&empty);
    let financial = result.get("financialData").unwrap_or(&empty);
    let profile = result.get("assetProfile").unwrap_or(&empty);

    let balance_statements = statements(result, "balanceSheetHistory", "balanceSheetStatements");
    let income_statements = statements(result, "incomeStatementHistory", "incomeStatementHistory");
    let cash_statements = statements(result, "cashflowStatementHistory", "cashflowStatements");

    let latest_balance = balance_statements.first().unwrap_or(&empty);
    let latest_income = income_statements.first().unwrap_or(&empty);
    let latest_cash = cash_statements.first().unwrap_or(&empty);

    let balance_sheet = BalanceSheet {
        long_term_debt: raw(latest_balance, "longTermDebt"),
        short_term_debt: raw(latest_balance, "shortLongTermDebt"),
        total_stockholder_equity: raw(latest_balance, "totalStockholderEquity"),
        total_current_liabilities: raw(latest_balance, "totalCurrentLiabilities"),
        total_assets: raw(latest_balance, "totalAssets"),
        cash: raw(latest_balance, "cash"),
    };

    // Provider omits these two ratios for most tickers; derive them from the
    // balance sheet when missing.
    let cash_ratio = raw(financial, "cashRatio").or_else(|| {
        match (balance_sheet.cash, balance_sheet.total_current_liabilities) {
            (Some(cash), Some(liabilities)) if liabilities != 0.0 => Some(cash / liabilities),
            _ => None,
        }
    });
    let long_term_debt_to_equity = raw(stats, "longTermDebtEquity").or_else(|| {
        match (balance_sheet.long_term_debt, balance_sheet.total_stockholder_equity) {
            (Some(debt), Some(equity)) if equity != 0.0 => Some(debt / equity),
            _ => None,
        }
    });

    let operating_cash_flow: Vec<Option<f64>> = series(cash_statements, "totalCashFromOperatingActivities");
    let capital_expenditures = series(cash_statements, "capitalExpenditures");
    let free_cash_flow = operating_cash_flow
        .iter()
        .zip(capital_expenditures.iter())
        .map(|(ocf, capex)| Some((*ocf)? + (*capex)?))
        .collect();

    Ok(RawSnapshot {
        ticker: ticker.clone(),
        as_of: Utc::now(),
        identity: Identity {
            name: text(price, "longName").or_else(|| text(price, "shortName")),
            sector: text(profile, "sector"),
            industry: text(profile, "industry"),
            country: text(profile, "country"),
        },
        market: MarketData {
            price: raw(financial, "currentPrice").or_else(|| raw(price, "regularMarketPrice")),
            shares_outstanding: raw(stats, "sharesOutstanding"),
            beta: raw(detail, "beta").or_else(|| raw(stats, "beta")),
        },
        ratios: ProviderRatios {
            trailing_pe: raw(detail, "trailingPE"),
            price_to_book: raw(stats, "priceToBook"),
            dividend_rate: raw(detail, "dividendRate"),
            dividend_yield: raw(detail, "dividendYield"),
            payout_ratio: raw(detail, "payoutRatio"),
            return_on_assets: raw(financial, "returnOnAssets"),
            return_on_equity: raw(financial, "returnOnEquity"),
            current_ratio: raw(financial, "currentRatio"),
            quick_ratio: raw(financial, "quickRatio"),
            long_term_debt_to_equity,
            debt_to_equity: raw(financial, "debtToEquity"),
            operating_margin: raw(financial, "operatingMargins"),
            net_margin: raw(financial, "profitMargins"),
            cash_ratio,
        },
        balance_sheet,
        income: IncomeStatement {
            ebit: raw(latest_income, "ebit"),
            // reported as a negative outflow
            interest_expense: raw(latest_income, "interestExpense").map(f64::abs),
        },
        cash_flow: CashFlow {
            operating_cash_flow: raw(latest_cash, "totalCashFromOperatingActivities"),
        },
        history: History {
            total_revenue: series(income_statements, "totalRevenue"),
            net_income: series(income_statements, "netIncome"),
            free_cash_flow,
            operating_cash_flow,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    fn payload() -> Value {
        json!({
            "quoteSummary": {
                "error": null,
                "result": [{
                    "price": {
                        "longName": "Apple Inc.",
                        "regularMarketPrice": { "raw": 189.0, "fmt": "189.00" }
                    },
                    "assetProfile": {
                        "sector": "Technology",
                        "industry": "Consumer Electronics",
                        "country": "United States"
                    },
                    "summaryDetail": {
                        "beta": { "raw": 1.29 },
                        "trailingPE": { "raw": 29.5 },
                        "dividendRate": { "raw": 0.96 },
                        "dividendYield": { "raw": 0.0051 },
                        "payoutRatio": {}
                    },
                    "defaultKeyStatistics": {
                        "sharesOutstanding": { "raw": 15550061000.0 },
                        "priceToBook": { "raw": 47.1 }
                    },
                    "financialData": {
                        "currentPrice": { "raw": 190.5 },
                        "returnOnEquity": { "raw": 1.47 },
                        "currentRatio": { "raw": 0.99 },
                        "quickRatio": { "raw": 0.84 },
                        "debtToEquity": { "raw": 181.3 },
                        "profitMargins": { "raw": 0.26 }
                    },
                    "balanceSheetHistory": {
                        "balanceSheetStatements": [
                            {
                                "longTermDebt": { "raw": 95000.0 },
                                "shortLongTermDebt": { "raw": 10000.0 },
                                "totalStockholderEquity": { "raw": 62000.0 },
                                "totalCurrentLiabilities": { "raw": 145000.0 },
                                "totalAssets": { "raw": 352000.0 },
                                "cash": { "raw": 29000.0 }
                            }
                        ]
                    },
                    "incomeStatementHistory": {
                        "incomeStatementHistory": [
                            { "totalRevenue": { "raw": 383.0 }, "netIncome": { "raw": 97.0 },
                              "ebit": { "raw": 114000.0 }, "interestExpense": { "raw": -3900.0 } },
                            { "totalRevenue": { "raw": 394.0 }, "netIncome": { "raw": 99.8 } },
                            { "totalRevenue": { "raw": 365.0 }, "netIncome": {} },
                            { "totalRevenue": { "raw": 274.0 }, "netIncome": { "raw": 57.4 } }
                        ]
                    },
                    "cashflowStatementHistory": {
                        "cashflowStatements": [
                            { "totalCashFromOperatingActivities": { "raw": 110000.0 },
                              "capitalExpenditures": { "raw": -11000.0 } },
                            { "totalCashFromOperatingActivities": { "raw": 122000.0 } }
                        ]
                    }
                }]
            }
        })
    }

    #[test]
    fn test_maps_identity_and_market() {
        let s = snapshot_from_quote_summary(&ticker(), &payload()).unwrap();
        assert_eq!(s.ticker.as_str(), "AAPL");
        assert_eq!(s.identity.name.as_deref(), Some("Apple Inc."));
        assert_eq!(s.identity.sector.as_deref(), Some("Technology"));
        assert_eq!(s.identity.country.as_deref(), Some("United States"));
        // financialData price wins over the quote price
        assert_eq!(s.market.price, Some(190.5));
        assert_eq!(s.market.shares_outstanding, Some(15550061000.0));
        assert_eq!(s.market.beta, Some(1.29));
    }

    #[test]
    fn test_maps_ratios_and_fallbacks() {
        let s = snapshot_from_quote_summary(&ticker(), &payload()).unwrap();
        assert_eq!(s.ratios.trailing_pe, Some(29.5));
        assert_eq!(s.ratios.price_to_book, Some(47.1));
        assert_eq!(s.ratios.payout_ratio, None);
        assert_eq!(s.ratios.net_margin, Some(0.26));
        assert_eq!(s.ratios.cash_ratio, Some(29000.0 / 145000.0));
        assert_eq!(s.ratios.long_term_debt_to_equity, Some(95000.0 / 62000.0));
    }

    #[test]
    fn test_maps_statements() {
        let s = snapshot_from_quote_summary(&ticker(), &payload()).unwrap();
        assert_eq!(s.balance_sheet.long_term_debt, Some(95000.0));
        assert_eq!(s.balance_sheet.short_term_debt, Some(10000.0));
        assert_eq!(s.income.ebit, Some(114000.0));
        assert_eq!(s.income.interest_expense, Some(3900.0));
        assert_eq!(s.cash_flow.operating_cash_flow, Some(110000.0));
        assert_eq!(
            s.history.total_revenue,
            vec![Some(383.0), Some(394.0), Some(365.0), Some(274.0)]
        );
        assert_eq!(s.history.net_income, vec![Some(97.0), Some(99.8), None, Some(57.4)]);
        assert_eq!(s.history.operating_cash_flow, vec![Some(110000.0), Some(122000.0)]);
        assert_eq!(s.history.free_cash_flow, vec![Some(99000.0), None]);
    }

    #[test]
    fn test_missing_modules_yield_empty_groups() {
        let payload = json!({ "quoteSummary": { "result": [{ "price": { "shortName": "Tiny" } }], "error": null } });
        let s = snapshot_from_quote_summary(&ticker(), &payload).unwrap();
        assert_eq!(s.identity.name.as_deref(), Some("Tiny"));
        assert_eq!(s.balance_sheet, BalanceSheet::default());
        assert!(s.history.total_revenue.is_empty());
    }

    #[test]
    fn test_provider_error_is_not_found() {
        let payload = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for ticker symbol: ZZZZ" }
            }
        });
        let err = snapshot_from_quote_summary(&ticker(), &payload).unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));

        let empty = json!({ "quoteSummary": { "result": [], "error": null } });
        assert!(matches!(
            snapshot_from_quote_summary(&ticker(), &empty),
            Err(AnalysisError::NotFound(_))
        ));
        assert!(matches!(
            snapshot_from_quote_summary(&ticker(), &json!({})),
            Err(AnalysisError::ParseError(_))
        ));
    }
}
