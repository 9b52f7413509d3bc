use analysis_core::{AnalysisError, RawSnapshot, SnapshotProvider, Ticker};
use fundamental_analysis::{CompanyAnalysis, FundamentalAnalysisEngine};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::SnapshotCache;
use crate::input::parse_ticker_input;

/// Bounds for the batch loop
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_tickers: usize,
    /// Pause between two provider requests
    pub request_delay: Duration,
    pub cache_ttl: chrono::Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tickers: 15,
            request_delay: Duration::from_millis(2500),
            cache_ttl: chrono::Duration::hours(6),
        }
    }
}

/// Per-ticker outcome kept by the session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompanyRecord {
    Analyzed(CompanyAnalysis),
    Failed { ticker: Ticker, error: String },
}

impl CompanyRecord {
    pub fn ticker(&self) -> &Ticker {
        match self {
            CompanyRecord::Analyzed(analysis) => &analysis.ticker,
            CompanyRecord::Failed { ticker, .. } => ticker,
        }
    }

    pub fn analysis(&self) -> Option<&CompanyAnalysis> {
        match self {
            CompanyRecord::Analyzed(analysis) => Some(analysis),
            CompanyRecord::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// 1-based position within the batch
    pub index: usize,
    pub total: usize,
    pub ticker: Ticker,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub requested: usize,
    /// Already analyzed earlier in the session
    pub skipped: usize,
    pub analyzed: usize,
    pub failed: usize,
}

/// Accumulates company analyses across batches, in first-seen order.
pub struct AnalysisSession {
    provider: Arc<dyn SnapshotProvider>,
    engine: FundamentalAnalysisEngine,
    cache: SnapshotCache,
    config: SessionConfig,
    records: Vec<CompanyRecord>,
    index: HashMap<Ticker, usize>,
}

impl AnalysisSession {
    pub fn new(provider: Arc<dyn SnapshotProvider>, engine: FundamentalAnalysisEngine, config: SessionConfig) -> Self {
        Self {
            provider,
            engine,
            cache: SnapshotCache::new(config.cache_ttl),
            config,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn records(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter()
    }

    /// Successfully analyzed companies, in session order
    pub fn analyses(&self) -> impl Iterator<Item = &CompanyAnalysis> {
        self.records.iter().filter_map(CompanyRecord::analysis)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cached_snapshots(&self) -> usize {
        self.cache.len()
    }

    /// Drop every result and cached snapshot
    pub fn clear(&mut self) {
        tracing::info!("Clearing session ({} records, {} cached snapshots)", self.records.len(), self.cache.len());
        self.records.clear();
        self.index.clear();
        self.cache.clear();
    }

    /// Parse a comma-separated list and analyze it
    pub async fn analyze_input<F>(&mut self, input: &str, on_progress: F) -> BatchSummary
    where
        F: FnMut(&BatchProgress),
    {
        let tickers = parse_ticker_input(input, self.config.max_tickers);
        self.analyze_batch(&tickers, on_progress).await
    }

    /// Analyze every ticker not already analyzed in this session, one at a
    /// time, pausing between provider requests.
    pub async fn analyze_batch<F>(&mut self, tickers: &[Ticker], mut on_progress: F) -> BatchSummary
    where
        F: FnMut(&BatchProgress),
    {
        let mut summary = BatchSummary {
            requested: tickers.len(),
            ..Default::default()
        };

        let mut unique: Vec<Ticker> = Vec::new();
        for ticker in tickers {
            if !unique.contains(ticker) {
                unique.push(ticker.clone());
            }
        }
        unique.truncate(self.config.max_tickers);

        let pending: Vec<Ticker> = unique
            .iter()
            .filter(|t| !matches!(self.record(t), Some(CompanyRecord::Analyzed(_))))
            .cloned()
            .collect();
        summary.skipped = unique.len() - pending.len();

        tracing::info!(
            "Analyzing {} new tickers ({} already in session)",
            pending.len(),
            summary.skipped
        );

        let total = pending.len();
        for (i, ticker) in pending.into_iter().enumerate() {
            on_progress(&BatchProgress {
                index: i + 1,
                total,
                ticker: ticker.clone(),
            });

            let (result, fetched) = self.snapshot(&ticker).await;
            let record = match result {
                Ok(snapshot) => {
                    tracing::info!("Analyzing {} ({})", ticker, snapshot.display_name());
                    summary.analyzed += 1;
                    CompanyRecord::Analyzed(self.engine.analyze(&snapshot))
                }
                Err(e) => {
                    tracing::warn!("Failed to retrieve {}: {}", ticker, e);
                    summary.failed += 1;
                    CompanyRecord::Failed {
                        ticker: ticker.clone(),
                        error: e.to_string(),
                    }
                }
            };
            self.store(record);

            if fetched && i + 1 < total && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        summary
    }

    fn record(&self, ticker: &Ticker) -> Option<&CompanyRecord> {
        self.index.get(ticker).map(|&i| &self.records[i])
    }

    fn store(&mut self, record: CompanyRecord) {
        match self.index.get(record.ticker()) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.ticker().clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Cached snapshot or a fresh provider fetch. The flag tells whether the
    /// provider was called.
    async fn snapshot(&self, ticker: &Ticker) -> (Result<RawSnapshot, AnalysisError>, bool) {
        if let Some(snapshot) = self.cache.get(ticker) {
            tracing::debug!("Snapshot cache hit for {}", ticker);
            return (Ok(snapshot), false);
        }

        tracing::debug!("Fetching {} from {}", ticker, self.provider.name());
        let result = self.provider.fetch_snapshot(ticker).await;
        if let Ok(snapshot) = &result {
            self.cache.insert(snapshot.clone());
        }
        (result, true)
    }
}
