use anyhow::{Context, Result};
use fundamental_analysis::CostOfCapitalParams;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const MIN_TICKERS: usize = 5;
pub const MAX_TICKERS: usize = 50;
pub const MIN_DELAY_SECS: f64 = 1.0;
pub const MAX_DELAY_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub max_tickers: usize,         // 15
    pub request_delay_secs: f64,    // 2.5
    pub cache_ttl_secs: i64,        // 21600 (6 hours)
    pub request_timeout_secs: u64,  // 30

    // Cost of capital
    pub risk_free_rate: f64,        // 0.0435
    pub market_return: f64,         // 0.085
    pub tax_rate: f64,              // 0.21
    pub cost_of_debt: f64,          // 0.055
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let params = CostOfCapitalParams::default();
        Self {
            max_tickers: 15,
            request_delay_secs: 2.5,
            cache_ttl_secs: 6 * 60 * 60,
            request_timeout_secs: 30,
            risk_free_rate: params.risk_free_rate,
            market_return: params.market_return,
            tax_rate: params.tax_rate,
            cost_of_debt: params.cost_of_debt,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_tickers: parse_or(&lookup, "DASHBOARD_MAX_TICKERS", defaults.max_tickers)?,
            request_delay_secs: parse_or(&lookup, "DASHBOARD_REQUEST_DELAY_SECS", defaults.request_delay_secs)?,
            cache_ttl_secs: parse_or(&lookup, "DASHBOARD_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            request_timeout_secs: parse_or(&lookup, "YAHOO_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            risk_free_rate: parse_or(&lookup, "DASHBOARD_RISK_FREE_RATE", defaults.risk_free_rate)?,
            market_return: parse_or(&lookup, "DASHBOARD_MARKET_RETURN", defaults.market_return)?,
            tax_rate: parse_or(&lookup, "DASHBOARD_TAX_RATE", defaults.tax_rate)?,
            cost_of_debt: parse_or(&lookup, "DASHBOARD_COST_OF_DEBT", defaults.cost_of_debt)?,
        };

        if config.cache_ttl_secs < 0 {
            anyhow::bail!("DASHBOARD_CACHE_TTL_SECS must not be negative");
        }

        Ok(config.clamped())
    }

    /// Command-line overrides, applied after the environment
    pub fn with_overrides(mut self, max_tickers: Option<usize>, delay_secs: Option<f64>) -> Self {
        if let Some(max) = max_tickers {
            self.max_tickers = max;
        }
        if let Some(delay) = delay_secs {
            self.request_delay_secs = delay;
        }
        self.clamped()
    }

    fn clamped(mut self) -> Self {
        self.max_tickers = self.max_tickers.clamp(MIN_TICKERS, MAX_TICKERS);
        self.request_delay_secs = if self.request_delay_secs.is_finite() {
            self.request_delay_secs.clamp(MIN_DELAY_SECS, MAX_DELAY_SECS)
        } else {
            MIN_DELAY_SECS
        };
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs)
    }

    pub fn cost_of_capital(&self) -> CostOfCapitalParams {
        CostOfCapitalParams {
            risk_free_rate: self.risk_free_rate,
            market_return: self.market_return,
            tax_rate: self.tax_rate,
            cost_of_debt: self.cost_of_debt,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
