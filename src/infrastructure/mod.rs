//! Adapters behind the `TransactionSource` port.

pub mod cache;
pub mod generator;
pub mod in_memory;
