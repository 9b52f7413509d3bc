use analysis_core::{AnalysisError, RawSnapshot, SnapshotProvider, Ticker};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub mod mapping;

pub use mapping::snapshot_from_quote_summary;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// quoteSummary modules needed to fill a [`RawSnapshot`]
const MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile,\
balanceSheetHistory,incomeStatementHistory,cashflowStatementHistory";

const MAX_ATTEMPTS: u32 = 3;
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

/// Wait before the next attempt after a 429; none once attempts are spent.
fn rate_limit_backoff(attempt: u32) -> Option<Duration> {
    (attempt < MAX_ATTEMPTS).then_some(RATE_LIMIT_BACKOFF)
}

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    /// Session crumb paired with the cookie jar; fetched lazily.
    crumb: Arc<Mutex<Option<String>>>,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(Self {
            client,
            crumb: Arc::new(Mutex::new(None)),
        })
    }

    /// Return the cached crumb, or establish a session and fetch a new one.
    async fn crumb(&self, refresh: bool) -> Result<String, AnalysisError> {
        let mut guard = self.crumb.lock().await;
        if !refresh {
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        // fc.yahoo.com answers 404 but sets the session cookie
        if let Err(e) = self.client.get(COOKIE_URL).send().await {
            tracing::debug!("Yahoo cookie request failed: {}", e);
        }

        let response = self
            .client
            .get(CRUMB_URL)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "crumb request failed with HTTP {}",
                response.status()
            )));
        }
        let crumb = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?
            .trim()
            .to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(AnalysisError::ApiError("Yahoo returned an invalid crumb".to_string()));
        }

        tracing::debug!("Obtained Yahoo crumb");
        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    /// GET with 429 back-off and a single crumb refresh on 401/403.
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, AnalysisError> {
        let mut refresh_crumb = false;

        for attempt in 1..=MAX_ATTEMPTS {
            let crumb = self.crumb(refresh_crumb).await?;
            let response = self
                .client
                .get(url)
                .query(&[("modules", MODULES), ("crumb", crumb.as_str())])
                .send()
                .await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => match rate_limit_backoff(attempt) {
                    Some(backoff) => {
                        tracing::warn!(
                            "Yahoo 429 rate limited, waiting {}s before retry {}/{}",
                            backoff.as_secs(),
                            attempt,
                            MAX_ATTEMPTS
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    None => tracing::warn!("Yahoo 429 rate limited on final attempt {}", attempt),
                },
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if !refresh_crumb => {
                    tracing::warn!("Yahoo rejected crumb (HTTP {}), refreshing session", response.status());
                    refresh_crumb = true;
                }
                _ => return Ok(response),
            }
        }

        Err(AnalysisError::ApiError(format!(
            "Yahoo request failed after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    /// Raw quoteSummary payload for `ticker`
    pub async fn get_quote_summary(&self, ticker: &Ticker) -> Result<serde_json::Value, AnalysisError> {
        let url = format!("{}/{}", QUOTE_SUMMARY_URL, ticker);
        let response = self.send_request(&url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AnalysisError::NotFound(format!("no Yahoo data for {}", ticker)));
        }
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(e.to_string()))
    }

    /// Fetch and map a snapshot for `ticker`
    pub async fn get_snapshot(&self, ticker: &Ticker) -> Result<RawSnapshot, AnalysisError> {
        tracing::info!("Fetching Yahoo fundamentals for {}", ticker);
        let payload = self.get_quote_summary(ticker).await?;
        snapshot_from_quote_summary(ticker, &payload)
    }
}

#[async_trait]
impl SnapshotProvider for YahooFinanceClient {
    async fn fetch_snapshot(&self, ticker: &Ticker) -> Result<RawSnapshot, AnalysisError> {
        self.get_snapshot(ticker).await
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
