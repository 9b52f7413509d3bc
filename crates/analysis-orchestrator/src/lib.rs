pub mod cache;
pub mod input;
pub mod session;

pub use cache::SnapshotCache;
pub use input::parse_ticker_input;
pub use session::{AnalysisSession, BatchProgress, BatchSummary, CompanyRecord, SessionConfig};
