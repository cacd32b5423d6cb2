use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker prepended to every category label in the final report.
pub const PROCESSED_PREFIX: &str = "Processed_";

/// A single commerce transaction as supplied by a `TransactionSource`.
///
/// Records are never mutated by the pipeline; every stage works on clones or
/// borrows of the values handed to it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
}

/// Per-category rollup of a set of transactions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AggregatedTransaction {
    pub category: String,
    pub total_quantity: u64,
    pub total_amount: f64,
    pub count: u64,
}

impl AggregatedTransaction {
    /// An empty rollup for `category`.
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            total_quantity: 0,
            total_amount: 0.0,
            count: 0,
        }
    }

    /// Returns a new rollup with `tx` accounted for.
    pub fn with_transaction(&self, tx: &Transaction) -> Self {
        Self {
            category: self.category.clone(),
            total_quantity: self.total_quantity + u64::from(tx.quantity),
            total_amount: self.total_amount + tx.total_amount,
            count: self.count + 1,
        }
    }

    /// Returns a new rollup combining `self` and `other`.
    ///
    /// Both sides are expected to share a category; the result keeps `self`'s.
    pub fn merged(&self, other: &AggregatedTransaction) -> Self {
        Self {
            category: self.category.clone(),
            total_quantity: self.total_quantity + other.total_quantity,
            total_amount: self.total_amount + other.total_amount,
            count: self.count + other.count,
        }
    }
}

/// A row of the final report.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProcessedTransaction {
    pub category: String,
    pub total_sales: f64,
    pub avg_quantity: f64,
}

impl From<&AggregatedTransaction> for ProcessedTransaction {
    fn from(agg: &AggregatedTransaction) -> Self {
        Self {
            category: format!("{PROCESSED_PREFIX}{}", agg.category),
            total_sales: agg.total_amount,
            // NaN for an empty rollup; merged rollups always have count >= 1
            avg_quantity: agg.total_quantity as f64 / agg.count as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(category: &str, quantity: u32, total_amount: f64) -> Transaction {
        Transaction {
            transaction_id: "TXN0".to_string(),
            timestamp: Utc::now(),
            customer_id: "CUST0".to_string(),
            product_name: "USB Cable".to_string(),
            category: category.to_string(),
            quantity,
            unit_price: 5.99,
            total_amount,
            payment_method: "PayPal".to_string(),
        }
    }

    #[test]
    fn test_with_transaction_returns_new_rollup() {
        let empty = AggregatedTransaction::empty("A");
        let one = empty.with_transaction(&tx("A", 2, 20.0));

        assert_eq!(empty.count, 0);
        assert_eq!(one.total_quantity, 2);
        assert_eq!(one.total_amount, 20.0);
        assert_eq!(one.count, 1);
    }

    #[test]
    fn test_merged_sums_every_field() {
        let a = AggregatedTransaction {
            category: "A".to_string(),
            total_quantity: 3,
            total_amount: 30.0,
            count: 2,
        };
        let b = AggregatedTransaction {
            category: "A".to_string(),
            total_quantity: 4,
            total_amount: 12.5,
            count: 1,
        };

        let merged = a.merged(&b);
        assert_eq!(merged.total_quantity, 7);
        assert_eq!(merged.total_amount, 42.5);
        assert_eq!(merged.count, 3);
    }

    #[test]
    fn test_processed_from_aggregate() {
        let agg = AggregatedTransaction {
            category: "B".to_string(),
            total_quantity: 7,
            total_amount: 70.0,
            count: 2,
        };

        let processed = ProcessedTransaction::from(&agg);
        assert_eq!(processed.category, "Processed_B");
        assert_eq!(processed.total_sales, 70.0);
        assert_eq!(processed.avg_quantity, 3.5);
    }

    #[test]
    fn test_processed_from_empty_aggregate_is_nan() {
        let processed = ProcessedTransaction::from(&AggregatedTransaction::empty("Z"));
        assert!(processed.avg_quantity.is_nan());
    }

    #[test]
    fn test_transaction_json_field_names() {
        let json = serde_json::to_value(tx("A", 1, 1.0)).unwrap();
        assert!(json.get("transactionID").is_some());
        assert!(json.get("customerID").is_some());
        assert!(json.get("productName").is_some());
        assert!(json.get("totalAmount").is_some());
    }
}
