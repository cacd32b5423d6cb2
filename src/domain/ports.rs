use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;

/// Supplies the ordered transaction sequence the pipeline runs over.
///
/// Adapters may be backed by a database, a file, or a cache; the pipeline only
/// ever sees the materialized sequence.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Returns the transactions of `customer_id` in source order.
    ///
    /// An empty `customer_id` selects every transaction.
    async fn get_transactions(&self, customer_id: &str) -> Result<Vec<Transaction>>;
}

pub type TransactionSourceBox = Box<dyn TransactionSource>;
