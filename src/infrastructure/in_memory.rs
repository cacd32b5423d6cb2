use crate::domain::ports::TransactionSource;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Transaction source over records held in memory, in insertion order.
///
/// Clones share the same `Arc<RwLock<Vec<Transaction>>>`, so a loader can keep
/// appending while the pipeline reads through another handle.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tx: Transaction) {
        self.transactions.write().await.push(tx);
    }

    pub async fn extend(&self, txs: impl IntoIterator<Item = Transaction>) {
        self.transactions.write().await.extend(txs);
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TransactionSource for InMemoryTransactionStore {
    async fn get_transactions(&self, customer_id: &str) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|tx| customer_id.is_empty() || tx.customer_id == customer_id)
            .cloned()
            .collect())
    }
}
