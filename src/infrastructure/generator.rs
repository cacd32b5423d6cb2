use crate::domain::transaction::Transaction;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const PRODUCT_PREFIXES: &[&str] = &[
    "Wireless",
    "USB",
    "Gaming",
    "Portable",
    "Smart",
    "Professional",
    "High-Speed",
];
const PRODUCT_SUFFIXES: &[&str] = &[
    "Mouse",
    "Keyboard",
    "Cable",
    "Monitor",
    "Webcam",
    "Laptop",
    "Headphones",
    "Smartphone",
    "Tablet",
    "Printer",
];
const CATEGORIES: &[&str] = &["Electronics", "Computers", "Accessories", "Office"];
const UNIT_PRICES: &[f64] = &[
    29.99, 49.99, 5.99, 199.99, 89.99, 999.99, 99.99, 799.99, 299.99, 149.99,
];
const PAYMENT_METHODS: &[&str] = &["Credit Card", "PayPal", "Debit Card", "Bitcoin"];

/// Produces synthetic commerce transactions.
///
/// Product names combine a prefix ("USB", "Wireless", ...) with an item
/// ("Cable", "Mouse", ...), so prefix queries have realistic selectivity.
/// A seeded generator always yields the same sequence.
pub struct TransactionGenerator {
    rng: StdRng,
    customers: usize,
    next_id: u64,
    epoch: DateTime<Utc>,
}

impl TransactionGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            customers: 1,
            next_id: 0,
            epoch: Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default(),
        }
    }

    /// Spreads records over customers `CUST0..CUST{customers-1}`.
    pub fn with_customers(mut self, customers: usize) -> Self {
        self.customers = customers.max(1);
        self
    }

    pub fn next_transaction(&mut self) -> Transaction {
        let id = self.next_id;
        self.next_id += 1;

        let prefix = pick(&mut self.rng, PRODUCT_PREFIXES);
        let suffix = pick(&mut self.rng, PRODUCT_SUFFIXES);
        let unit_price = UNIT_PRICES.choose(&mut self.rng).copied().unwrap_or(0.0);
        let quantity: u32 = self.rng.gen_range(1..=5);
        let customer = self.rng.gen_range(0..self.customers);

        Transaction {
            transaction_id: format!("TXN{id}"),
            timestamp: self.epoch + Duration::seconds(id as i64),
            customer_id: format!("CUST{customer}"),
            product_name: format!("{prefix} {suffix}"),
            category: pick(&mut self.rng, CATEGORIES).to_string(),
            quantity,
            unit_price,
            total_amount: f64::from(quantity) * unit_price,
            payment_method: pick(&mut self.rng, PAYMENT_METHODS).to_string(),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<Transaction> {
        (0..count).map(|_| self.next_transaction()).collect()
    }
}

fn pick<'a>(rng: &mut StdRng, choices: &[&'a str]) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}
