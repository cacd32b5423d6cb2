#![allow(dead_code)]

use std::io::Error;
use std::path::Path;
use txpipe::domain::transaction::Transaction;

pub const HEADER: [&str; 9] = [
    "transactionID",
    "timestamp",
    "customerID",
    "productName",
    "category",
    "quantity",
    "unitPrice",
    "totalAmount",
    "paymentMethod",
];

/// Writes `(product, category, quantity, total)` rows for customer CUST1.
pub fn write_rows(path: &Path, rows: &[(&str, &str, u32, f64)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;

    for (i, (product, category, quantity, total)) in rows.iter().enumerate() {
        let unit_price = total / f64::from(*quantity);
        let record = [
            format!("TXN{i}"),
            "2024-05-01T12:00:00Z".to_string(),
            "CUST1".to_string(),
            product.to_string(),
            category.to_string(),
            quantity.to_string(),
            unit_price.to_string(),
            total.to_string(),
            "Credit Card".to_string(),
        ];
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// The five-record A/B/C scenario.
pub fn write_abc_scenario(path: &Path) -> Result<(), Error> {
    write_rows(
        path,
        &[
            ("Widget", "A", 2, 20.0),
            ("Widget", "B", 3, 30.0),
            ("Widget", "A", 1, 10.0),
            ("Widget", "B", 4, 40.0),
            ("Widget", "C", 5, 50.0),
        ],
    )
}

/// Transaction ids, sorted, for multiset comparisons.
pub fn sorted_ids(txs: &[Transaction]) -> Vec<String> {
    let mut ids: Vec<String> = txs.iter().map(|t| t.transaction_id.clone()).collect();
    ids.sort();
    ids
}
