use crate::domain::transaction::Transaction;

/// Returns, in input order, the transactions whose product name starts with
/// `prefix`.
///
/// The match is byte-wise; an empty prefix keeps everything.
pub fn filter_by_prefix(transactions: &[Transaction], prefix: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.product_name.starts_with(prefix))
        .cloned()
        .collect()
}
