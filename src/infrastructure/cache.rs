use crate::domain::ports::TransactionSource;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// How long a customer's slice stays cached unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

struct CacheEntry {
    transactions: Vec<Transaction>,
    stored_at: Instant,
}

/// Read-through cache in front of another [`TransactionSource`].
///
/// A hit returns the cached slice for the customer. A miss, an expired entry,
/// or a cached empty slice goes to the inner source and caches what it returns.
pub struct ReadThroughCache<S> {
    inner: S,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl<S: TransactionSource> ReadThroughCache<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Drops the cached slice of `customer_id`, if any.
    pub async fn invalidate(&self, customer_id: &str) {
        self.entries.write().await.remove(customer_id);
    }

    async fn lookup(&self, customer_id: &str) -> Option<Vec<Transaction>> {
        let entries = self.entries.read().await;
        let entry = entries.get(customer_id)?;
        if entry.stored_at.elapsed() >= self.ttl || entry.transactions.is_empty() {
            return None;
        }
        Some(entry.transactions.clone())
    }
}

#[async_trait]
impl<S: TransactionSource> TransactionSource for ReadThroughCache<S> {
    async fn get_transactions(&self, customer_id: &str) -> Result<Vec<Transaction>> {
        if let Some(hit) = self.lookup(customer_id).await {
            debug!(customer = customer_id, size = hit.len(), "cache hit");
            return Ok(hit);
        }

        debug!(customer = customer_id, "cache miss");
        let transactions = self.inner.get_transactions(customer_id).await?;
        self.entries.write().await.insert(
            customer_id.to_owned(),
            CacheEntry {
                transactions: transactions.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryTransactionStore;
    use crate::test_support::tx;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingSource {
        store: InMemoryTransactionStore,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TransactionSource for CountingSource {
        async fn get_transactions(&self, customer_id: &str) -> Result<Vec<Transaction>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.store.get_transactions(customer_id).await
        }
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let source = CountingSource::default();
        source.store.insert(tx("Monitor", "Computers", 1, 199.99)).await;
        let calls = Arc::clone(&source.calls);
        let cache = ReadThroughCache::new(source.clone());

        let first = cache.get_transactions("CUST1").await.unwrap();
        source.store.insert(tx("Webcam", "Electronics", 1, 89.99)).await;
        let second = cache.get_transactions("CUST1").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = CountingSource::default();
        source.store.insert(tx("Monitor", "Computers", 1, 199.99)).await;
        let cache = ReadThroughCache::new(source.clone());

        cache.get_transactions("CUST1").await.unwrap();
        source.store.insert(tx("Webcam", "Electronics", 1, 89.99)).await;
        cache.invalidate("CUST1").await;

        assert_eq!(cache.get_transactions("CUST1").await.unwrap().len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_reloaded() {
        let source = CountingSource::default();
        source.store.insert(tx("Monitor", "Computers", 1, 199.99)).await;
        let cache = ReadThroughCache::with_ttl(source.clone(), Duration::ZERO);

        cache.get_transactions("CUST1").await.unwrap();
        cache.get_transactions("CUST1").await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_results_are_not_served_from_cache() {
        let source = CountingSource::default();
        let cache = ReadThroughCache::new(source.clone());

        assert!(cache.get_transactions("CUST1").await.unwrap().is_empty());
        source.store.insert(tx("Monitor", "Computers", 1, 199.99)).await;
        assert_eq!(cache.get_transactions("CUST1").await.unwrap().len(), 1);
    }
}
