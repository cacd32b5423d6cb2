use crate::domain::transaction::Transaction;
use chrono::{TimeZone, Utc};

/// Builds a transaction with only the fields the pipeline looks at varying.
pub fn tx(product_name: &str, category: &str, quantity: u32, total_amount: f64) -> Transaction {
    Transaction {
        transaction_id: format!("TXN-{product_name}-{category}-{quantity}"),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        customer_id: "CUST1".to_string(),
        product_name: product_name.to_string(),
        category: category.to_string(),
        quantity,
        unit_price: if quantity == 0 {
            0.0
        } else {
            total_amount / f64::from(quantity)
        },
        total_amount,
        payment_method: "Credit Card".to_string(),
    }
}

/// The five-record scenario with categories A, B and C.
pub fn abc_scenario() -> Vec<Transaction> {
    vec![
        tx("Widget", "A", 2, 20.0),
        tx("Widget", "B", 3, 30.0),
        tx("Widget", "A", 1, 10.0),
        tx("Widget", "B", 4, 40.0),
        tx("Widget", "C", 5, 50.0),
    ]
}
