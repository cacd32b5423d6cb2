//! Domain model shared by every pipeline stage, and the port through which
//! transactions enter the system.

pub mod aggregate;
pub mod money;
pub mod ports;
pub mod transaction;
