#[cfg(test)]
mod engine_tests {
    use crate::*;
    use analysis_core::{
        BalanceSheet, CashFlow, History, IncomeStatement, MarketData, ProviderRatios, RawSnapshot, Ticker,
    };
    use approx::assert_abs_diff_eq;

    fn snapshot(symbol: &str) -> RawSnapshot {
        RawSnapshot::new(Ticker::parse(symbol).unwrap())
    }

    /// A fully populated, healthy company
    fn sample_company() -> RawSnapshot {
        let mut s = snapshot("acme");
        s.identity.name = Some("Acme Corp".to_string());
        s.market = MarketData {
            price: Some(50.0),
            shares_outstanding: Some(100.0),
            beta: Some(1.0),
        };
        s.ratios = ProviderRatios {
            trailing_pe: Some(18.0),
            current_ratio: Some(2.0),
            quick_ratio: Some(1.5),
            cash_ratio: Some(0.6),
            ..Default::default()
        };
        s.balance_sheet = BalanceSheet {
            long_term_debt: Some(800.0),
            short_term_debt: Some(200.0),
            total_stockholder_equity: Some(4000.0),
            total_current_liabilities: Some(1000.0),
            total_assets: Some(6000.0),
            cash: Some(300.0),
        };
        s.income = IncomeStatement {
            ebit: Some(750.0),
            interest_expense: Some(50.0),
        };
        s.cash_flow = CashFlow {
            operating_cash_flow: Some(600.0),
        };
        s.history = History {
            total_revenue: vec![Some(1331.0), Some(1210.0), Some(1100.0), Some(1000.0)],
            net_income: vec![Some(120.0), Some(100.0)],
            free_cash_flow: vec![Some(450.0), Some(400.0), Some(360.0)],
            operating_cash_flow: vec![Some(600.0), Some(500.0)],
        };
        s
    }

    #[test]
    fn test_full_snapshot() {
        let m = compute(&sample_company());

        // E = 5000, D = 1000, Re = 0.085
        let expected_wacc = (5000.0 / 6000.0) * 0.085 + (1000.0 / 6000.0) * 0.055 * 0.79;
        assert_abs_diff_eq!(m.wacc.unwrap(), expected_wacc, epsilon = 1e-12);
        assert_eq!(m.total_debt, Some(1000.0));
        assert_abs_diff_eq!(m.roic.unwrap(), 0.15, epsilon = 1e-12);
        assert_abs_diff_eq!(m.eva.unwrap(), 0.15 - expected_wacc, epsilon = 1e-12);
        assert_abs_diff_eq!(m.price_to_fcf.unwrap(), 50.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.revenue_growth.unwrap(), 0.10, epsilon = 1e-9);
        assert_abs_diff_eq!(m.eps_growth.unwrap(), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(m.fcf_growth.unwrap(), (450.0f64 / 360.0).sqrt() - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.cash_flow_ratio.unwrap(), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(m.debt_to_equity.unwrap(), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(m.debt_to_assets.unwrap(), 1000.0 / 6000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.interest_coverage.unwrap(), 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.cash_flow_to_debt.unwrap(), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(m.net_debt_to_ebitda.unwrap(), 700.0 / 750.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_snapshot_classifications() {
        let a = analyze(&sample_company());
        assert_eq!(a.display_name(), "Acme Corp");
        assert_eq!(a.solvency.status, SolvencyStatus::Healthy);
        assert_eq!(a.liquidity, LiquidityStatus::Excellent);
        assert_eq!(a.value_creation, ValueCreation::CreatesValue);
        assert_eq!(a.growth, GrowthProfile::Consistent);
        assert_eq!(a.ratios.trailing_pe, Some(18.0));
        assert_eq!(a.value_spread(), a.metrics.eva);
    }

    #[test]
    fn test_empty_snapshot_is_complete_and_unavailable() {
        let m = compute(&snapshot("void"));
        let entries = m.entries();
        assert_eq!(entries.len(), Indicator::ALL.len());
        for (indicator, value) in entries {
            // both debt components missing -> zero, not unavailable
            let expected = if indicator == Indicator::TotalDebt { Some(0.0) } else { None };
            assert_eq!(value, expected, "{}", indicator.label());
        }

        let a = analyze(&snapshot("void"));
        assert_eq!(a.solvency.status, SolvencyStatus::Healthy);
        assert_eq!(a.liquidity, LiquidityStatus::InsufficientData);
        assert_eq!(a.value_creation, ValueCreation::InsufficientData);
        assert_eq!(a.growth, GrowthProfile::Unavailable);
    }

    #[test]
    fn test_missing_beta_blanks_wacc_only() {
        let mut s = sample_company();
        s.market.beta = None;
        let m = compute(&s);
        assert_eq!(m.wacc, None);
        assert_eq!(m.eva, None);
        assert_eq!(m.total_debt, Some(1000.0));
        assert!(m.roic.is_some());
        assert!(m.price_to_fcf.is_some());
    }

    #[test]
    fn test_all_equity_company() {
        let mut s = snapshot("zero");
        s.market = MarketData {
            price: Some(100.0),
            shares_outstanding: Some(10.0),
            beta: Some(1.2),
        };
        s.balance_sheet.long_term_debt = Some(0.0);
        s.balance_sheet.short_term_debt = Some(0.0);
        let m = compute(&s);
        assert_abs_diff_eq!(m.wacc.unwrap(), 0.0933, epsilon = 1e-12);
        assert_eq!(m.total_debt, Some(0.0));
    }

    #[test]
    fn test_malformed_debt_isolated_to_debt_dependents() {
        let mut s = sample_company();
        s.balance_sheet.long_term_debt = Some(f64::INFINITY);
        let m = compute(&s);
        assert_eq!(m.wacc, None);
        assert_eq!(m.total_debt, None);
        assert_eq!(m.roic, None);
        assert_eq!(m.debt_to_equity, None);
        assert_eq!(m.net_debt_to_ebitda, None);
        // unrelated indicators survive
        assert!(m.price_to_fcf.is_some());
        assert!(m.revenue_growth.is_some());
        assert!(m.cash_flow_ratio.is_some());
        assert!(m.interest_coverage.is_some());
    }

    #[test]
    fn test_moderate_debt_without_interest_expense() {
        let mut s = snapshot("mid");
        s.balance_sheet = BalanceSheet {
            long_term_debt: Some(40.0),
            total_stockholder_equity: Some(100.0),
            total_assets: Some(200.0),
            ..Default::default()
        };
        s.income.ebit = Some(10.0);
        s.cash_flow.operating_cash_flow = Some(4.0);
        let a = analyze(&s);
        assert_abs_diff_eq!(a.metrics.debt_to_equity.unwrap(), 0.4, epsilon = 1e-12);
        assert_eq!(a.metrics.interest_coverage, None);
        // 4 / 40 = 0.1 < 0.2 and (40 - 0) / 10 = 4 > 3
        assert_eq!(a.solvency.status, SolvencyStatus::Risky);
        let checks: Vec<SolvencyCheck> = a.solvency.alerts.iter().map(|a| a.check).collect();
        assert_eq!(checks, vec![SolvencyCheck::CashFlowToDebt, SolvencyCheck::NetDebtToEbitda]);
    }

    #[test]
    fn test_huge_inputs_never_produce_non_finite_values() {
        let mut s = sample_company();
        s.balance_sheet.long_term_debt = Some(1e308);
        s.balance_sheet.short_term_debt = Some(1e308);
        s.balance_sheet.total_stockholder_equity = Some(1.0);
        s.history.total_revenue = vec![Some(1e308), Some(1e-308)];
        let m = compute(&s);
        for (indicator, value) in m.entries() {
            assert!(value.map_or(true, f64::is_finite), "{} = {:?}", indicator.label(), value);
        }
        assert_eq!(m.total_debt, None);
        assert_eq!(m.wacc, None);
    }

    #[test]
    fn test_concerning_liquidity() {
        let mut s = sample_company();
        s.ratios.current_ratio = Some(0.8);
        assert_eq!(analyze(&s).liquidity, LiquidityStatus::Concerning);
    }

    #[test]
    fn test_fcf_growth_fallback() {
        let mut s = sample_company();
        s.history.free_cash_flow = vec![Some(450.0)];
        let m = compute(&s);
        assert_abs_diff_eq!(m.fcf_growth.unwrap(), 0.2, epsilon = 1e-12);

        s.history.operating_cash_flow = vec![None, Some(500.0)];
        assert_eq!(compute(&s).fcf_growth, None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let s = sample_company();
        let first = compute(&s);
        let second = compute(&s);
        assert_eq!(first, second);
        for ((_, a), (_, b)) in first.entries().iter().zip(second.entries().iter()) {
            assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
        }
    }

    #[test]
    fn test_engine_uses_its_params() {
        let engine = FundamentalAnalysisEngine::with_params(CostOfCapitalParams {
            risk_free_rate: 0.02,
            market_return: 0.07,
            tax_rate: 0.25,
            cost_of_debt: 0.04,
        });
        let m = engine.compute(&sample_company());
        let expected = (5000.0 / 6000.0) * 0.07 + (1000.0 / 6000.0) * 0.04 * 0.75;
        assert_abs_diff_eq!(m.wacc.unwrap(), expected, epsilon = 1e-12);
        assert_eq!(FundamentalAnalysisEngine::default().params(), &CostOfCapitalParams::default());
    }
}
