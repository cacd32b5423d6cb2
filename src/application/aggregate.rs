use crate::domain::transaction::{AggregatedTransaction, Transaction};
use std::collections::HashMap;

/// Rolls `transactions` up by category.
///
/// Output order is unspecified; callers must treat the result as a multiset.
pub fn aggregate(transactions: &[Transaction]) -> Vec<AggregatedTransaction> {
    aggregate_by_category(transactions).into_values().collect()
}

/// Rolls `transactions` up by category, keeping the category-keyed map.
pub fn aggregate_by_category(transactions: &[Transaction]) -> HashMap<String, AggregatedTransaction> {
    let mut rollups: HashMap<String, AggregatedTransaction> = HashMap::new();
    for tx in transactions {
        let next = match rollups.get(&tx.category) {
            Some(current) => current.with_transaction(tx),
            None => AggregatedTransaction::empty(tx.category.as_str()).with_transaction(tx),
        };
        rollups.insert(tx.category.clone(), next);
    }
    rollups
}

/// Folds partial rollups into a single category-keyed map.
///
/// Summation is commutative and associative, so the result does not depend on
/// the order in which partials arrive (up to floating-point rounding of
/// `total_amount`).
#[derive(Debug, Default)]
pub struct Merger {
    merged: HashMap<String, AggregatedTransaction>,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb<'a, I>(&mut self, partials: I)
    where
        I: IntoIterator<Item = &'a AggregatedTransaction>,
    {
        for partial in partials {
            let next = match self.merged.get(&partial.category) {
                Some(current) => current.merged(partial),
                None => AggregatedTransaction::empty(partial.category.as_str()).merged(partial),
            };
            self.merged.insert(partial.category.clone(), next);
        }
    }

    pub fn finish(self) -> HashMap<String, AggregatedTransaction> {
        self.merged
    }
}

/// Sum of `total_amount` over `transactions`.
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.total_amount).sum()
}
