//! Terminal rendering of the five thematic views.

use analysis_orchestrator::CompanyRecord;
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use fundamental_analysis::{CompanyAnalysis, Indicator};

const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Summary,
    Debt,
    Value,
    Growth,
    Liquidity,
    All,
}

impl View {
    pub const THEMES: [View; 5] = [View::Summary, View::Debt, View::Value, View::Growth, View::Liquidity];

    pub fn to_label(&self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::Debt => "Debt Analysis",
            View::Value => "Value Creation",
            View::Growth => "Growth",
            View::Liquidity => "Liquidity",
            View::All => "All Views",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        View::from_str(name.trim(), true).ok()
    }
}

/// One table row: label plus a per-company cell formatter
type Row = (&'static str, fn(&CompanyAnalysis) -> String);

const SUMMARY_ROWS: &[Row] = &[
    ("Company", |a| a.display_name().to_string()),
    ("Sector", |a| text(a.identity.sector.as_deref())),
    ("Industry", |a| text(a.identity.industry.as_deref())),
    ("Country", |a| text(a.identity.country.as_deref())),
    ("Price", |a| num(a.market.price)),
    ("P/E", |a| num(a.ratios.trailing_pe)),
    ("P/B", |a| num(a.ratios.price_to_book)),
    ("P/FCF", |a| metric(a, Indicator::PriceToFcf)),
    ("Dividend Rate", |a| num(a.ratios.dividend_rate)),
    ("Dividend Yield", |a| pct(a.ratios.dividend_yield)),
    ("Payout Ratio", |a| num(a.ratios.payout_ratio)),
    ("ROA", |a| pct(a.ratios.return_on_assets)),
    ("ROE", |a| pct(a.ratios.return_on_equity)),
    ("Current Ratio", |a| num(a.ratios.current_ratio)),
    ("Quick Ratio", |a| num(a.ratios.quick_ratio)),
    ("LT Debt/Equity", |a| num(a.ratios.long_term_debt_to_equity)),
    ("Debt/Equity", |a| num(a.ratios.debt_to_equity)),
    ("Operating Margin", |a| pct(a.ratios.operating_margin)),
    ("Profit Margin", |a| pct(a.ratios.net_margin)),
    ("WACC", |a| metric(a, Indicator::Wacc)),
    ("ROIC", |a| metric(a, Indicator::Roic)),
    ("EVA", |a| metric(a, Indicator::Eva)),
];

const DEBT_ROWS: &[Row] = &[
    ("Total Debt", |a| metric(a, Indicator::TotalDebt)),
    ("Debt/Equity", |a| metric(a, Indicator::DebtToEquity)),
    ("Debt/Assets", |a| metric(a, Indicator::DebtToAssets)),
    ("Interest Coverage", |a| metric(a, Indicator::InterestCoverage)),
    ("Cash Flow/Debt", |a| metric(a, Indicator::CashFlowToDebt)),
    ("Net Debt/EBITDA", |a| metric(a, Indicator::NetDebtToEbitda)),
    ("Verdict", |a| a.solvency.to_label().to_string()),
];

const VALUE_ROWS: &[Row] = &[
    ("WACC", |a| metric(a, Indicator::Wacc)),
    ("ROIC", |a| metric(a, Indicator::Roic)),
    ("EVA", |a| metric(a, Indicator::Eva)),
    ("Spread (ROIC - WACC)", |a| pct(a.value_spread())),
    ("Verdict", |a| a.value_creation.to_label().to_string()),
];

const GROWTH_ROWS: &[Row] = &[
    ("Revenue CAGR", |a| metric(a, Indicator::RevenueGrowth)),
    ("EPS CAGR", |a| metric(a, Indicator::EpsGrowth)),
    ("FCF CAGR", |a| metric(a, Indicator::FcfGrowth)),
    ("Profile", |a| a.growth.to_label().to_string()),
];

const LIQUIDITY_ROWS: &[Row] = &[
    ("Current Ratio", |a| num(a.ratios.current_ratio)),
    ("Quick Ratio", |a| num(a.ratios.quick_ratio)),
    ("Cash Ratio", |a| num(a.ratios.cash_ratio)),
    ("Cash Flow Ratio", |a| metric(a, Indicator::CashFlowRatio)),
    ("Verdict", |a| a.liquidity.to_label().to_string()),
];

/// Derived indicator, as a percentage when it is a rate
pub fn metric(analysis: &CompanyAnalysis, indicator: Indicator) -> String {
    let value = analysis.metrics.get(indicator);
    if indicator.is_rate() {
        pct(value)
    } else {
        num(value)
    }
}

/// Fraction rendered as a percentage with two decimals
pub fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => MISSING.to_string(),
    }
}

pub fn num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => MISSING.to_string(),
    }
}

pub fn text(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Render a view over every successfully analyzed company. Failed tickers are
/// listed once, after the tables.
pub fn render<'a, I>(view: View, records: I) -> String
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let records: Vec<&CompanyRecord> = records.into_iter().collect();
    let analyses: Vec<&CompanyAnalysis> = records.iter().filter_map(|r| r.analysis()).collect();

    let mut out = String::new();
    if analyses.is_empty() {
        out.push_str("No companies analyzed yet.\n");
    } else {
        let views: &[View] = if view == View::All { &View::THEMES } else { std::slice::from_ref(&view) };
        for &v in views {
            out.push_str(&render_view(v, &analyses));
        }
    }

    if let Some(failures) = render_failures(&records) {
        out.push_str(&failures);
    }
    out
}

fn render_view(view: View, analyses: &[&CompanyAnalysis]) -> String {
    let rows = match view {
        View::Summary => SUMMARY_ROWS,
        View::Debt => DEBT_ROWS,
        View::Value => VALUE_ROWS,
        View::Growth => GROWTH_ROWS,
        View::Liquidity => LIQUIDITY_ROWS,
        View::All => return String::new(),
    };

    let mut out = format!("\n== {} ==\n{}\n", view.to_label(), metric_table(rows, analyses));

    if view == View::Debt {
        for analysis in analyses {
            for alert in &analysis.solvency.alerts {
                out.push_str(&format!(
                    "  ! {}: {} (observed {:.2})\n",
                    analysis.ticker,
                    alert.check.description(),
                    alert.value
                ));
            }
        }
    }
    out
}

/// Metrics down the side, one column per company
fn metric_table(rows: &[Row], analyses: &[&CompanyAnalysis]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Metric")];
    header.extend(analyses.iter().map(|a| Cell::new(a.ticker.as_str())));
    table.set_header(header);

    for (label, cell) in rows {
        let mut row = vec![Cell::new(label)];
        row.extend(
            analyses
                .iter()
                .map(|a| Cell::new(cell(a)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    table
}

fn render_failures(records: &[&CompanyRecord]) -> Option<String> {
    let lines: Vec<String> = records
        .iter()
        .filter_map(|r| match r {
            CompanyRecord::Failed { ticker, error } => Some(format!("  {}: {}\n", ticker, error)),
            CompanyRecord::Analyzed(_) => None,
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(format!("\nCould not retrieve data for:\n{}", lines.concat()))
}
