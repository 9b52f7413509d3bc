use async_trait::async_trait;
use crate::{AnalysisError, RawSnapshot, Ticker};

/// Source of per-company financial snapshots (the external market-data provider).
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch_snapshot(&self, ticker: &Ticker) -> Result<RawSnapshot, AnalysisError>;

    /// Short provider name used in logs.
    fn name(&self) -> &'static str {
        "unknown"
    }
}
