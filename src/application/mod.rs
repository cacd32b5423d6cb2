//! Application layer: the filter, aggregate and process stages in their
//! sequential and fan-out/fan-in forms, and the runner that chains them behind
//! a `TransactionSource`.

pub mod aggregate;
pub mod filter;
pub mod parallel;
pub mod partition;
pub mod pipeline;
pub mod prefix_tree;
pub mod process;
