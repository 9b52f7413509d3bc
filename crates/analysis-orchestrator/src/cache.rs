use analysis_core::{RawSnapshot, Ticker};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Time-bounded snapshot memo keyed by ticker
pub struct SnapshotCache {
    entries: DashMap<Ticker, CacheEntry<RawSnapshot>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fresh entry for `ticker`, if any. Expired entries are evicted.
    pub fn get(&self, ticker: &Ticker) -> Option<RawSnapshot> {
        {
            let entry = self.entries.get(ticker)?;
            if Utc::now() - entry.cached_at < self.ttl {
                return Some(entry.data.clone());
            }
        }

        // read guard released above; removing while holding it would deadlock
        tracing::debug!("Snapshot cache entry for {} expired", ticker);
        self.entries.remove(ticker);
        None
    }

    pub fn insert(&self, snapshot: RawSnapshot) {
        self.entries.insert(
            snapshot.ticker.clone(),
            CacheEntry {
                data: snapshot,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(symbol: &str, price: f64) -> RawSnapshot {
        let mut s = RawSnapshot::new(Ticker::parse(symbol).unwrap());
        s.market.price = Some(price);
        s
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = SnapshotCache::new(Duration::hours(6));
        cache.insert(snapshot("AAPL", 190.0));
        let hit = cache.get(&Ticker::parse("aapl").unwrap()).unwrap();
        assert_eq!(hit.market.price, Some(190.0));
        assert!(cache.get(&Ticker::parse("MSFT").unwrap()).is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = SnapshotCache::new(Duration::zero());
        cache.insert(snapshot("AAPL", 190.0));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&Ticker::parse("AAPL").unwrap()).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces_and_clear_empties() {
        let cache = SnapshotCache::new(Duration::hours(1));
        cache.insert(snapshot("AAPL", 190.0));
        cache.insert(snapshot("AAPL", 191.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&Ticker::parse("AAPL").unwrap()).unwrap().market.price, Some(191.0));
        cache.clear();
        assert!(cache.is_empty());
    }
}
